use std::path::PathBuf;

use bevy::prelude::*;
use bevy_gaussian_splatting::{CloudSettings, PlanarGaussian3d, PlanarGaussian3dHandle};

use crate::engine::hud::StatusEvent;
use crate::engine::scene::SceneRig;
use crate::markers::MarkersChanged;
use crate::markers::store::MarkerStore;
use crate::tools::label_prompt::PromptState;

/// Where the current splat came from. Listing entries resolve through the
/// asset server relative to the asset root; picked files use their native
/// path directly.
#[derive(Clone, Debug, PartialEq)]
pub enum SplatSource {
    AssetPath(String),
    LocalFile(PathBuf),
}

impl SplatSource {
    /// The path handed to the asset server.
    pub fn asset_path(&self) -> String {
        match self {
            SplatSource::AssetPath(path) => path.clone(),
            SplatSource::LocalFile(path) => path.to_string_lossy().into_owned(),
        }
    }

    /// Final path segment, for status lines.
    pub fn file_name(&self) -> String {
        match self {
            SplatSource::AssetPath(path) => path
                .rsplit('/')
                .next()
                .unwrap_or(path.as_str())
                .to_string(),
            SplatSource::LocalFile(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        }
    }

    /// File name with the splat extension stripped. Export and sibling
    /// lookups both build on this.
    pub fn base_name(&self) -> String {
        let name = self.file_name();
        match name.rsplit_once('.') {
            Some((stem, _)) if !stem.is_empty() => stem.to_string(),
            _ => name,
        }
    }
}

/// The current splat load, reset wholesale on every load or reload.
/// `generation` distinguishes this load from superseded ones so late
/// sibling-marker responses can be dropped.
#[derive(Resource, Default)]
pub struct SplatSession {
    pub source: Option<SplatSource>,
    pub generation: u64,
    cloud: Option<Entity>,
}

impl SplatSession {
    pub fn is_loaded(&self) -> bool {
        self.source.is_some()
    }
}

#[derive(Event, Clone, Debug)]
pub struct LoadSplatEvent {
    pub source: SplatSource,
}

/// Drops the displayed cloud and every marker without loading a replacement.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ClearSplatEvent;

/// Replace the displayed cloud. Clears every marker, despawns the previous
/// cloud entity and bumps the session generation; the sibling marker lookup
/// keys off the same event.
pub fn handle_load_splat(
    mut events: EventReader<LoadSplatEvent>,
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut session: ResMut<SplatSession>,
    mut store: ResMut<MarkerStore>,
    mut markers_changed: EventWriter<MarkersChanged>,
    mut status: EventWriter<StatusEvent>,
    rigs: Query<Entity, With<SceneRig>>,
) {
    let Some(event) = events.read().last() else {
        return;
    };
    let Ok(rig) = rigs.single() else {
        return;
    };

    if let Some(previous) = session.cloud.take() {
        commands.entity(previous).despawn();
    }
    store.clear();
    markers_changed.write_default();

    let reloading = session.source.as_ref() == Some(&event.source);
    session.source = Some(event.source.clone());
    session.generation += 1;

    let path = event.source.asset_path();
    if reloading {
        // Force a refetch instead of serving the cached asset
        asset_server.reload(path.as_str());
    }
    let handle: Handle<PlanarGaussian3d> = asset_server.load(path.as_str());

    let cloud = commands
        .spawn((
            PlanarGaussian3dHandle(handle),
            CloudSettings::default(),
            Transform::IDENTITY,
            ChildOf(rig),
            Name::new("splat_cloud"),
        ))
        .id();
    session.cloud = Some(cloud);

    info!("Loading splat scene from {path}");
    status.write(StatusEvent(format!("Loading {}", event.source.file_name())));
}

pub fn handle_clear_splat(
    mut events: EventReader<ClearSplatEvent>,
    mut commands: Commands,
    mut session: ResMut<SplatSession>,
    mut store: ResMut<MarkerStore>,
    mut markers_changed: EventWriter<MarkersChanged>,
    mut status: EventWriter<StatusEvent>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    if let Some(cloud) = session.cloud.take() {
        commands.entity(cloud).despawn();
    }
    session.source = None;
    // Bump so an in-flight sibling response for the old scene is dropped
    session.generation += 1;
    store.clear();
    markers_changed.write_default();
    status.write(StatusEvent("Scene cleared".into()));
}

/// Ctrl+R reloads the current splat from its last-known source
pub fn reload_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    session: Res<SplatSession>,
    prompt: Res<PromptState>,
    mut loads: EventWriter<LoadSplatEvent>,
) {
    if prompt.is_active() {
        return;
    }
    let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    if !(ctrl && keyboard.just_pressed(KeyCode::KeyR)) {
        return;
    }
    let Some(source) = session.source.clone() else {
        return;
    };
    loads.write(LoadSplatEvent { source });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_name_strips_the_splat_extension() {
        let source = SplatSource::AssetPath("scenes/living_room.gcloud".into());
        assert_eq!(source.base_name(), "living_room");
        assert_eq!(source.file_name(), "living_room.gcloud");
    }

    #[test]
    fn base_name_of_extensionless_path_is_the_file_name() {
        let source = SplatSource::AssetPath("scenes/pointcloud".into());
        assert_eq!(source.base_name(), "pointcloud");
    }

    #[test]
    fn clear_event_resets_the_session_and_markers() {
        let mut app = App::new();
        app.add_event::<ClearSplatEvent>()
            .add_event::<MarkersChanged>()
            .add_event::<StatusEvent>()
            .init_resource::<MarkerStore>()
            .init_resource::<SplatSession>()
            .add_systems(Update, handle_clear_splat);

        app.world_mut()
            .resource_mut::<SplatSession>()
            .source = Some(SplatSource::AssetPath("scenes/a.ply".into()));
        app.world_mut()
            .resource_mut::<MarkerStore>()
            .add("Kitchen", Vec3::new(0.0, 9.9, 0.0));

        app.world_mut().send_event(ClearSplatEvent);
        app.update();

        assert!(!app.world().resource::<SplatSession>().is_loaded());
        assert!(app.world().resource::<MarkerStore>().is_empty());
    }

    #[test]
    fn local_file_paths_pass_through_to_the_asset_server() {
        let source = SplatSource::LocalFile(PathBuf::from("/data/scans/hall.ply"));
        assert_eq!(source.asset_path(), "/data/scans/hall.ply");
        assert_eq!(source.base_name(), "hall");
    }
}
