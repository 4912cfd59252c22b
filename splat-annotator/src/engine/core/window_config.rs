use bevy::prelude::*;
use bevy::window::PresentMode;

pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        // Default event handling stays on so the browser never sees Ctrl+S
        // (no native save dialog over the export shortcut).
        Window {
            title: "Splat Annotator".into(),
            canvas: Some("#bevy".into()),
            fit_canvas_to_parent: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Splat Annotator".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
