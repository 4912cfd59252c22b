use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::engine::hud::StatusEvent;
use crate::engine::splat::{LoadSplatEvent, SplatSession, SplatSource};
use crate::markers::MarkersChanged;
use crate::markers::store::{MarkerFile, MarkerStore};

/// Sibling convention: the marker file shares the splat's base name with a
/// `.json` extension, co-located with the splat asset.
pub fn sibling_marker_path(source: &SplatSource) -> String {
    match source {
        SplatSource::AssetPath(path) => swap_extension(path),
        SplatSource::LocalFile(path) => path
            .with_extension("json")
            .to_string_lossy()
            .into_owned(),
    }
}

/// File name for a marker export of the current splat.
pub fn export_file_name(source: &SplatSource) -> String {
    format!("{}.json", source.base_name())
}

fn swap_extension(path: &str) -> String {
    let (dir, name) = match path.rsplit_once('/') {
        Some((dir, name)) => (Some(dir), name),
        None => (None, path),
    };
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    match dir {
        Some(dir) => format!("{dir}/{stem}.json"),
        None => format!("{stem}.json"),
    }
}

/// In-flight sibling marker fetch, tagged with the session generation that
/// requested it. A response landing after another load is discarded instead
/// of applying stale markers onto the newer scene.
pub struct SiblingRequest {
    pub handle: Handle<MarkerFile>,
    pub generation: u64,
}

#[derive(Resource, Default)]
pub struct SiblingLoader {
    pub request: Option<SiblingRequest>,
}

/// Kicks off the sibling lookup for every splat load. Runs after the load
/// handler so the session already carries the new source and generation.
pub fn start_sibling_request(
    mut events: EventReader<LoadSplatEvent>,
    session: Res<SplatSession>,
    asset_server: Res<AssetServer>,
    mut sibling: ResMut<SiblingLoader>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let Some(source) = session.source.as_ref() else {
        return;
    };
    let path = sibling_marker_path(source);
    info!("Looking for sibling marker file at {path}");

    // Refetch rather than trust the cached copy; the file may have changed
    // between loads of the same scene.
    if sibling.request.is_some() {
        asset_server.reload(path.as_str());
    }
    sibling.request = Some(SiblingRequest {
        handle: asset_server.load(path.as_str()),
        generation: session.generation,
    });
}

/// Resolves the pending sibling fetch. Missing files are a silent miss;
/// stale responses are dropped by generation.
pub fn apply_sibling_markers(
    mut sibling: ResMut<SiblingLoader>,
    session: Res<SplatSession>,
    asset_server: Res<AssetServer>,
    files: Res<Assets<MarkerFile>>,
    mut store: ResMut<MarkerStore>,
    mut changed: EventWriter<MarkersChanged>,
    mut status: EventWriter<StatusEvent>,
) {
    let Some(request) = sibling.request.as_ref() else {
        return;
    };

    match asset_server.get_load_state(request.handle.id()) {
        Some(LoadState::Loaded) => {
            if let Some(file) = files.get(&request.handle) {
                if apply_sibling_response(request, &session, file, &mut store) {
                    changed.write_default();
                    info!("Applied {} sibling markers", store.len());
                    status.write(StatusEvent(format!("Loaded {} markers", store.len())));
                } else {
                    info!("Discarding stale sibling marker response");
                }
            }
            sibling.request = None;
        }
        Some(LoadState::Failed(_)) => {
            // Best-effort lookup; absence is expected for unannotated scenes
            info!("No sibling marker file found");
            sibling.request = None;
        }
        _ => {}
    }
}

/// Applies a completed sibling response unless another load superseded the
/// request; a stale response leaves the store untouched.
fn apply_sibling_response(
    request: &SiblingRequest,
    session: &SplatSession,
    file: &MarkerFile,
    store: &mut MarkerStore,
) -> bool {
    if request.generation != session.generation {
        return false;
    }
    store.replace_from_file(file);
    true
}
