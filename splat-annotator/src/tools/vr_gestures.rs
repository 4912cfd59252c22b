use std::time::Duration;

use bevy::prelude::*;

use constants::gestures::{
    VR_DOUBLE_TAP_LABEL, VR_DOUBLE_TAP_WINDOW, VR_TAP_LABEL, VR_TAP_MAX_DISPLACEMENT,
    VR_TAP_MAX_HOLD,
};
use constants::viewer::MARKER_HOVER_HEIGHT;

use crate::engine::scene::SceneRig;
use crate::engine::splat::SplatSession;
use crate::markers::MarkersChanged;
use crate::markers::store::MarkerStore;

/// Controller input as delivered by an XR backend. The classifier itself is
/// platform-neutral; anything able to report poses can feed it.
#[derive(Event, Clone, Debug)]
pub struct VrControllerEvent {
    pub control: VrControl,
    pub phase: VrPhase,
    pub position: Vec3,
    pub orientation: Quat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VrControl {
    Select,
    Squeeze,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VrPhase {
    Start,
    Move,
    End,
}

/// What a classified gesture asks the scene to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureAction {
    Tap(Vec3),
    DoubleTap(Vec3),
    Translate(Vec3),
    RotateYaw(f32),
}

#[derive(Debug)]
struct SelectTrack {
    started: Duration,
    start_position: Vec3,
    last_position: Vec3,
    dragging: bool,
}

#[derive(Debug)]
struct SqueezeTrack {
    last_orientation: Quat,
}

/// Select/squeeze gesture classifier with an injected clock. A select held
/// under the tap thresholds is a tap (two in quick succession a double-tap);
/// exceeding duration or displacement turns it into a grab that translates
/// the scene rig. Squeeze rotates the rig by the controller's yaw delta.
#[derive(Debug, Default)]
pub struct GestureClassifier {
    select: Option<SelectTrack>,
    squeeze: Option<SqueezeTrack>,
    last_tap: Option<Duration>,
}

impl GestureClassifier {
    pub fn handle(&mut self, event: &VrControllerEvent, now: Duration) -> Option<GestureAction> {
        match (event.control, event.phase) {
            (VrControl::Select, VrPhase::Start) => {
                self.select = Some(SelectTrack {
                    started: now,
                    start_position: event.position,
                    last_position: event.position,
                    dragging: false,
                });
                None
            }
            (VrControl::Select, VrPhase::Move) => {
                let track = self.select.as_mut()?;
                let held = now.saturating_sub(track.started);
                let displaced =
                    event.position.distance(track.start_position) > VR_TAP_MAX_DISPLACEMENT;
                if track.dragging || held > VR_TAP_MAX_HOLD || displaced {
                    track.dragging = true;
                    let delta = event.position - track.last_position;
                    track.last_position = event.position;
                    Some(GestureAction::Translate(delta))
                } else {
                    track.last_position = event.position;
                    None
                }
            }
            (VrControl::Select, VrPhase::End) => {
                let track = self.select.take()?;
                let held = now.saturating_sub(track.started);
                let displaced =
                    event.position.distance(track.start_position) > VR_TAP_MAX_DISPLACEMENT;
                if track.dragging || held > VR_TAP_MAX_HOLD || displaced {
                    self.last_tap = None;
                    return None;
                }
                match self.last_tap {
                    Some(previous)
                        if now.saturating_sub(previous) <= VR_DOUBLE_TAP_WINDOW =>
                    {
                        self.last_tap = None;
                        Some(GestureAction::DoubleTap(event.position))
                    }
                    _ => {
                        self.last_tap = Some(now);
                        Some(GestureAction::Tap(event.position))
                    }
                }
            }
            (VrControl::Squeeze, VrPhase::Start) => {
                self.squeeze = Some(SqueezeTrack {
                    last_orientation: event.orientation,
                });
                None
            }
            (VrControl::Squeeze, VrPhase::Move) => {
                let track = self.squeeze.as_mut()?;
                let delta = yaw_of(event.orientation) - yaw_of(track.last_orientation);
                track.last_orientation = event.orientation;
                Some(GestureAction::RotateYaw(delta))
            }
            (VrControl::Squeeze, VrPhase::End) => {
                self.squeeze = None;
                None
            }
        }
    }
}

fn yaw_of(orientation: Quat) -> f32 {
    orientation.to_euler(EulerRot::YXZ).0
}

#[derive(Resource, Default)]
pub struct VrGestures(pub GestureClassifier);

/// Applies classified gestures: taps place markers at the controller
/// position projected to the hover height, grabs move the scene rig and
/// squeezes spin it.
pub fn apply_vr_gestures(
    mut events: EventReader<VrControllerEvent>,
    time: Res<Time>,
    mut gestures: ResMut<VrGestures>,
    session: Res<SplatSession>,
    mut store: ResMut<MarkerStore>,
    mut changed: EventWriter<MarkersChanged>,
    mut rigs: Query<(&mut Transform, &GlobalTransform), With<SceneRig>>,
) {
    let now = time.elapsed();
    for event in events.read() {
        let Some(action) = gestures.0.handle(event, now) else {
            continue;
        };
        let Ok((mut rig_transform, rig_global)) = rigs.single_mut() else {
            continue;
        };
        match action {
            GestureAction::Tap(position) => {
                place_vr_marker(position, VR_TAP_LABEL, rig_global, &session, &mut store, &mut changed);
            }
            GestureAction::DoubleTap(position) => {
                place_vr_marker(
                    position,
                    VR_DOUBLE_TAP_LABEL,
                    rig_global,
                    &session,
                    &mut store,
                    &mut changed,
                );
            }
            GestureAction::Translate(delta) => {
                rig_transform.translation += delta;
            }
            GestureAction::RotateYaw(delta) => {
                rig_transform.rotate_y(delta);
            }
        }
    }
}

fn place_vr_marker(
    position: Vec3,
    label: &str,
    rig: &GlobalTransform,
    session: &SplatSession,
    store: &mut MarkerStore,
    changed: &mut EventWriter<MarkersChanged>,
) {
    if !session.is_loaded() {
        return;
    }
    let local = rig.affine().inverse().transform_point3(position);
    store.add(label, Vec3::new(local.x, MARKER_HOVER_HEIGHT, local.z));
    changed.write_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn select(phase: VrPhase, position: Vec3) -> VrControllerEvent {
        VrControllerEvent {
            control: VrControl::Select,
            phase,
            position,
            orientation: Quat::IDENTITY,
        }
    }

    fn squeeze(phase: VrPhase, orientation: Quat) -> VrControllerEvent {
        VrControllerEvent {
            control: VrControl::Squeeze,
            phase,
            position: Vec3::ZERO,
            orientation,
        }
    }

    #[test]
    fn quick_still_select_is_a_tap() {
        let mut classifier = GestureClassifier::default();
        assert_eq!(classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(0)), None);
        let action = classifier.handle(&select(VrPhase::End, Vec3::ZERO), ms(120));
        assert_eq!(action, Some(GestureAction::Tap(Vec3::ZERO)));
    }

    #[test]
    fn long_hold_becomes_a_grab() {
        let mut classifier = GestureClassifier::default();
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(0));
        let action = classifier.handle(&select(VrPhase::Move, Vec3::new(0.01, 0.0, 0.0)), ms(250));
        assert_eq!(
            action,
            Some(GestureAction::Translate(Vec3::new(0.01, 0.0, 0.0)))
        );
        // No tap fires on release of a grab
        assert_eq!(classifier.handle(&select(VrPhase::End, Vec3::new(0.01, 0.0, 0.0)), ms(300)), None);
    }

    #[test]
    fn displaced_select_becomes_a_grab_within_the_hold_window() {
        let mut classifier = GestureClassifier::default();
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(0));
        let action = classifier.handle(&select(VrPhase::Move, Vec3::new(0.2, 0.0, 0.0)), ms(50));
        assert!(matches!(action, Some(GestureAction::Translate(_))));
    }

    #[test]
    fn grab_translates_by_per_move_deltas() {
        let mut classifier = GestureClassifier::default();
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(0));
        classifier.handle(&select(VrPhase::Move, Vec3::new(0.2, 0.0, 0.0)), ms(50));
        let action = classifier.handle(&select(VrPhase::Move, Vec3::new(0.5, 0.0, 0.0)), ms(80));
        assert_eq!(
            action,
            Some(GestureAction::Translate(Vec3::new(0.3, 0.0, 0.0)))
        );
    }

    #[test]
    fn two_taps_inside_the_window_pair_into_a_double_tap() {
        let mut classifier = GestureClassifier::default();
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(0));
        assert!(matches!(
            classifier.handle(&select(VrPhase::End, Vec3::ZERO), ms(100)),
            Some(GestureAction::Tap(_))
        ));
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(200));
        assert!(matches!(
            classifier.handle(&select(VrPhase::End, Vec3::ZERO), ms(350)),
            Some(GestureAction::DoubleTap(_))
        ));
    }

    #[test]
    fn taps_spaced_past_the_window_stay_single() {
        let mut classifier = GestureClassifier::default();
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(0));
        classifier.handle(&select(VrPhase::End, Vec3::ZERO), ms(100));
        classifier.handle(&select(VrPhase::Start, Vec3::ZERO), ms(600));
        assert!(matches!(
            classifier.handle(&select(VrPhase::End, Vec3::ZERO), ms(700)),
            Some(GestureAction::Tap(_))
        ));
    }

    #[test]
    fn squeeze_reports_yaw_deltas() {
        let mut classifier = GestureClassifier::default();
        classifier.handle(&squeeze(VrPhase::Start, Quat::IDENTITY), ms(0));
        let action = classifier.handle(
            &squeeze(VrPhase::Move, Quat::from_rotation_y(0.25)),
            ms(100),
        );
        match action {
            Some(GestureAction::RotateYaw(delta)) => assert!((delta - 0.25).abs() < 1e-4),
            other => panic!("expected a yaw rotation, got {other:?}"),
        }
    }

    #[test]
    fn move_without_a_start_is_ignored() {
        let mut classifier = GestureClassifier::default();
        assert_eq!(classifier.handle(&select(VrPhase::Move, Vec3::ZERO), ms(10)), None);
        assert_eq!(classifier.handle(&squeeze(VrPhase::Move, Quat::IDENTITY), ms(10)), None);
    }
}
