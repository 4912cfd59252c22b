//! Pointer and controller interaction for marker annotation.
//!
//! Three state machines share the primary button without owning it:
//!
//! - the click tracker classifies press runs (double-click opens the label
//!   prompt, triple-click reloads the splat);
//! - the drag machine claims presses that land on a marker pillar and moves
//!   the marker along the ground plane while orbit input is suspended;
//! - the VR classifier turns controller select/squeeze gestures into taps
//!   (markers) or rig grabs (scene translate/rotate).
//!
//! All three take time as an injected `Duration` so tests drive the clock
//! directly; no real timers are involved.
//!
//! ## Picking
//!
//! Marker selection uses oriented bounding box intersection:
//! - camera ray transformed into pillar-local space
//! - AABB slab method tests against half-extents
//! - closest hit pillar wins; the splat cloud is never a drag target

/// Multi-click run classification with an injected clock.
pub mod click_tracker;

/// Text entry overlay for naming a freshly placed marker.
pub mod label_prompt;

/// Drag state machine moving marker pillars along the ground plane.
pub mod marker_drag;

/// Ray intersection utilities: ground plane and pillar OBB tests.
pub mod picking;

/// Select/squeeze gesture classification for VR controllers.
pub mod vr_gestures;

use bevy::prelude::*;

use click_tracker::{ClickRun, classify_primary_clicks};
use label_prompt::{
    PromptState, prompt_button_system, prompt_keyboard_input, sync_prompt_ui, update_prompt_text,
};
use marker_drag::{DragState, begin_marker_drag, end_marker_drag, update_marker_drag};
use vr_gestures::{VrControllerEvent, VrGestures, apply_vr_gestures};

pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ClickRun>()
            .init_resource::<DragState>()
            .init_resource::<PromptState>()
            .init_resource::<VrGestures>()
            .add_event::<VrControllerEvent>()
            .add_systems(
                Update,
                (
                    // Drag claims the press before the click run sees it
                    begin_marker_drag,
                    update_marker_drag,
                    end_marker_drag,
                    classify_primary_clicks,
                    apply_vr_gestures,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    sync_prompt_ui,
                    update_prompt_text,
                    prompt_keyboard_input,
                    prompt_button_system,
                ),
            );
    }
}
