use bevy::prelude::*;

use crate::engine::hud::StatusEvent;
use crate::engine::splat::SplatSession;
use crate::io::AlertEvent;
use crate::io::marker_files::export_file_name;
use crate::markers::store::MarkerStore;
use crate::tools::label_prompt::PromptState;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::splat::SplatSource;

/// Requests a marker export through whatever delivery the platform has.
#[derive(Event, Clone, Copy, Debug, Default)]
pub struct ExportMarkersEvent;

/// Ctrl+S requests an export. The window eats the browser default, so no
/// native save dialog appears on wasm.
pub fn export_markers_shortcut(
    keyboard: Res<ButtonInput<KeyCode>>,
    prompt: Res<PromptState>,
    mut exports: EventWriter<ExportMarkersEvent>,
) {
    if prompt.is_active() {
        return;
    }
    let ctrl = keyboard.any_pressed([KeyCode::ControlLeft, KeyCode::ControlRight]);
    if ctrl && keyboard.just_pressed(KeyCode::KeyS) {
        exports.write_default();
    }
}

/// Serialises the store to `<splat-basename>.json`.
pub fn handle_export_markers(
    mut events: EventReader<ExportMarkersEvent>,
    session: Res<SplatSession>,
    store: Res<MarkerStore>,
    mut status: EventWriter<StatusEvent>,
    mut alerts: EventWriter<AlertEvent>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    // Without a splat there is no well-defined base name
    let Some(source) = session.source.as_ref() else {
        alerts.write(AlertEvent("No splat file loaded!".into()));
        return;
    };

    let file_name = export_file_name(source);
    let json = match serde_json::to_string_pretty(&store.to_file()) {
        Ok(json) => json,
        Err(err) => {
            error!("Failed to serialise markers: {err}");
            return;
        }
    };

    deliver_export(source, &file_name, &json);
    status.write(StatusEvent(format!(
        "Exported {} markers to {file_name}",
        store.len()
    )));
}

#[cfg(target_arch = "wasm32")]
fn deliver_export(_source: &crate::engine::splat::SplatSource, file_name: &str, json: &str) {
    trigger_download(file_name, json);
}

/// Native export lands next to a picked splat, or in the working directory
/// for listing-sourced scenes.
#[cfg(not(target_arch = "wasm32"))]
fn deliver_export(source: &SplatSource, file_name: &str, json: &str) {
    let path = match source {
        SplatSource::LocalFile(splat_path) => splat_path.with_file_name(file_name),
        SplatSource::AssetPath(_) => std::path::PathBuf::from(file_name),
    };
    match std::fs::write(&path, json) {
        Ok(()) => info!("Wrote marker file to {}", path.display()),
        Err(err) => error!("Failed to write marker file {}: {err}", path.display()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_without_a_splat_alerts_and_delivers_nothing() {
        let mut app = App::new();
        app.add_event::<ExportMarkersEvent>()
            .add_event::<StatusEvent>()
            .add_event::<AlertEvent>()
            .init_resource::<SplatSession>()
            .init_resource::<MarkerStore>()
            .add_systems(Update, handle_export_markers);

        app.world_mut().send_event(ExportMarkersEvent);
        app.update();

        let alerts = app.world().resource::<Events<AlertEvent>>();
        let messages: Vec<_> = alerts.iter_current_update_events().collect();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, "No splat file loaded!");
        // No delivery happened, so no success status either
        assert!(app.world().resource::<Events<StatusEvent>>().is_empty());
    }
}

/// Client-side download: a revocable blob URL behind a synthetic anchor click.
#[cfg(target_arch = "wasm32")]
fn trigger_download(file_name: &str, contents: &str) {
    use wasm_bindgen::{JsCast, JsValue};

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        error!("Document not available for download");
        return;
    };

    let parts = js_sys::Array::new();
    parts.push(&JsValue::from_str(contents));
    let options = web_sys::BlobPropertyBag::new();
    options.set_type("application/json");

    let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options) else {
        error!("Failed to build marker blob");
        return;
    };
    let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
        error!("Failed to create download URL");
        return;
    };

    if let Ok(anchor) = document
        .create_element("a")
        .map(|e| e.unchecked_into::<web_sys::HtmlAnchorElement>())
    {
        anchor.set_href(&url);
        anchor.set_download(file_name);
        anchor.click();
    }
    let _ = web_sys::Url::revoke_object_url(&url);
}
