use std::time::Duration;

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use constants::gestures::{MULTI_CLICK_WINDOW, RELOAD_CLICK_RUN};
use constants::viewer::MARKER_HOVER_HEIGHT;

use crate::engine::scene::SceneRig;
use crate::engine::splat::{LoadSplatEvent, SplatSession};
use crate::tools::label_prompt::{PromptRoot, PromptState};
use crate::tools::marker_drag::DragState;
use crate::tools::picking::cursor_ground_hit;

/// Classification of one press within the current click run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickClass {
    Single,
    Double,
    Triple,
}

/// Rolling-window click run tracker. Time is injected as an elapsed
/// `Duration` so tests advance the clock themselves; there are no timers.
#[derive(Debug)]
pub struct ClickTracker {
    window: Duration,
    last_press: Option<Duration>,
    run: u32,
}

impl ClickTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_press: None,
            run: 0,
        }
    }

    /// Feed one primary-button press. A press more than `window` after the
    /// previous one starts a fresh run; a run of three resets after firing.
    pub fn register(&mut self, now: Duration) -> ClickClass {
        match self.last_press {
            Some(previous) if now.saturating_sub(previous) <= self.window => self.run += 1,
            _ => self.run = 1,
        }
        self.last_press = Some(now);

        if self.run >= RELOAD_CLICK_RUN {
            self.run = 0;
            self.last_press = None;
            ClickClass::Triple
        } else if self.run == 2 {
            ClickClass::Double
        } else {
            ClickClass::Single
        }
    }
}

#[derive(Resource)]
pub struct ClickRun(pub ClickTracker);

impl Default for ClickRun {
    fn default() -> Self {
        Self(ClickTracker::new(MULTI_CLICK_WINDOW))
    }
}

/// Routes primary clicks: a double-click on the ground plane opens the
/// label prompt, a triple-click reloads the current splat. With no splat
/// loaded both are no-ops. Presses keep feeding the run while the prompt
/// is open (the second click of a triple opens it), so the third click can
/// still dismiss-and-reload; only presses on the prompt UI itself are
/// excluded.
pub fn classify_primary_clicks(
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut run: ResMut<ClickRun>,
    session: Res<SplatSession>,
    drag: Res<DragState>,
    mut prompt: ResMut<PromptState>,
    mut loads: EventWriter<LoadSplatEvent>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    rigs: Query<&GlobalTransform, With<SceneRig>>,
    prompt_nodes: Query<&Interaction, With<PromptRoot>>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    // An OK/Cancel press must never count towards a reload run
    if prompt_nodes.iter().any(|i| *i != Interaction::None) {
        return;
    }

    match run.0.register(time.elapsed()) {
        ClickClass::Single => {}
        ClickClass::Double => {
            if prompt.is_active() || !session.is_loaded() || !matches!(*drag, DragState::Idle) {
                return;
            }
            let Ok(window) = windows.single() else {
                return;
            };
            let Some(cursor_pos) = window.cursor_position() else {
                return;
            };
            let Ok((camera, cam_xf)) = cameras.single() else {
                return;
            };
            let Ok(rig) = rigs.single() else {
                return;
            };
            let Some(hit) = cursor_ground_hit(camera, cam_xf, cursor_pos, rig) else {
                return;
            };
            prompt.open(Vec3::new(hit.x, MARKER_HOVER_HEIGHT, hit.z), cursor_pos);
        }
        ClickClass::Triple => {
            let Some(source) = session.source.clone() else {
                return;
            };
            prompt.dismiss();
            loads.write(LoadSplatEvent { source });
        }
    }
}
