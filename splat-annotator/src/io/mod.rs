//! Marker persistence and scene intake.
//!
//! Four routes in and out of the marker store:
//!
//! - sibling lookup: every splat load fetches `<base>.json` next to the
//!   splat and applies it if present;
//! - drag-and-drop: a dropped `.json` replaces the current marker set;
//! - export: Ctrl+S writes the store as `<base>.json` (download on wasm,
//!   file next to the splat on native);
//! - scene listing: a polled server index drives the scene panel, and
//!   Escape reaches the platform's file picker or panel toggle.

pub mod drop_import;
pub mod export;
pub mod file_dialog;
pub mod listing;
pub mod marker_files;

use bevy::prelude::*;

use crate::engine::splat::handle_load_splat;
use crate::tools::label_prompt::prompt_keyboard_input;

use drop_import::{ImportMarkersEvent, handle_marker_imports};
use export::{ExportMarkersEvent, export_markers_shortcut, handle_export_markers};
use listing::{
    apply_scene_listing, poll_scene_listing, request_initial_listing, scene_panel_buttons,
    setup_scene_panel, sync_scene_panel_visibility,
};
use marker_files::{SiblingLoader, apply_sibling_markers, start_sibling_request};

/// A message that must interrupt the user, e.g. a precondition failure.
/// Handlers emit this instead of calling the platform dialog directly.
#[derive(Event, Clone, Debug)]
pub struct AlertEvent(pub String);

pub fn show_alerts(mut events: EventReader<AlertEvent>) {
    for AlertEvent(message) in events.read() {
        alert(message);
    }
}

/// Blocking message box. The browser build uses `window.alert`, the native
/// build an rfd dialog.
pub fn alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = rfd::MessageDialog::new()
            .set_title("Splat Annotator")
            .set_description(message)
            .show();
    }
}

pub struct IoPlugin;

impl Plugin for IoPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SiblingLoader>()
            .add_event::<ImportMarkersEvent>()
            .add_event::<ExportMarkersEvent>()
            .add_event::<AlertEvent>()
            .add_systems(Startup, (setup_scene_panel, request_initial_listing))
            .add_systems(
                Update,
                (
                    start_sibling_request.after(handle_load_splat),
                    apply_sibling_markers,
                    export_markers_shortcut,
                    handle_export_markers.after(export_markers_shortcut),
                    handle_marker_imports,
                    poll_scene_listing,
                    apply_scene_listing,
                    scene_panel_buttons,
                    sync_scene_panel_visibility,
                    show_alerts,
                ),
            );

        #[cfg(not(target_arch = "wasm32"))]
        app.add_systems(
            Update,
            (
                drop_import::native_drop_intake,
                file_dialog::open_file_dialog_on_escape.before(prompt_keyboard_input),
            ),
        );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, drop_import::setup_drop_listener)
            .add_systems(
                Update,
                (
                    drop_import::drain_drop_queue.before(handle_marker_imports),
                    file_dialog::toggle_scene_panel_on_escape.before(prompt_keyboard_input),
                ),
            );
    }
}
