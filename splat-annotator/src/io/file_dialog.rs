use bevy::prelude::*;

use crate::tools::label_prompt::PromptState;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::splat::{LoadSplatEvent, SplatSource};

/// Escape opens a native file picker for a splat on disk. Skipped while the
/// label prompt is up; Escape belongs to the prompt then.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_file_dialog_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    prompt: Res<PromptState>,
    mut loads: EventWriter<LoadSplatEvent>,
) {
    use constants::listing::SPLAT_EXTENSIONS;

    if prompt.is_active() || !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Gaussian splat", SPLAT_EXTENSIONS)
        .pick_file()
    else {
        return;
    };
    loads.write(LoadSplatEvent {
        source: SplatSource::LocalFile(path),
    });
}

/// The browser build has no native picker; Escape toggles the scene panel
/// instead so the listing stays reachable.
#[cfg(target_arch = "wasm32")]
pub fn toggle_scene_panel_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    prompt: Res<PromptState>,
    mut state: ResMut<crate::io::listing::SceneListingState>,
) {
    if prompt.is_active() || !keyboard.just_pressed(KeyCode::Escape) {
        return;
    }
    state.panel_open = !state.panel_open;
}
