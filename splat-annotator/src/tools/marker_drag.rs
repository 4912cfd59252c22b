use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use constants::viewer::{MARKER_PILLAR_HEIGHT, MARKER_PILLAR_RADIUS};

use crate::engine::camera::OrbitCamera;
use crate::engine::scene::SceneRig;
use crate::markers::store::MarkerStore;
use crate::markers::visuals::{MarkerIndex, MarkerPillar};
use crate::tools::label_prompt::PromptState;
use crate::tools::picking::{cursor_ground_hit, ray_hits_obb, ray_to_rig_space};

/// Marker drag state machine. Only marker pillars are drag targets; the
/// splat cloud itself is never picked.
#[derive(Resource, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        pillar: Entity,
        index: usize,
        grab_offset: Vec3,
    },
}

fn pillar_pick_size() -> Vec3 {
    Vec3::new(
        MARKER_PILLAR_RADIUS * 2.0,
        MARKER_PILLAR_HEIGHT,
        MARKER_PILLAR_RADIUS * 2.0,
    )
}

/// Idle + left press on a pillar starts a drag and suspends orbit input.
pub fn begin_marker_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    rigs: Query<&GlobalTransform, With<SceneRig>>,
    pillars: Query<(Entity, &Transform, &GlobalTransform, &MarkerIndex), With<MarkerPillar>>,
    prompt: Res<PromptState>,
    mut drag: ResMut<DragState>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if !buttons.just_pressed(MouseButton::Left) || prompt.is_active() {
        return;
    }
    if !matches!(*drag, DragState::Idle) {
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
    let Ok(ray) = camera.viewport_to_world(cam_xf, cursor_pos) else {
        return;
    };
    let Ok(rig) = rigs.single() else {
        return;
    };

    let origin = ray.origin;
    let dir = ray.direction.as_vec3();

    let mut best: Option<(Entity, usize, &Transform, f32)> = None;
    for (entity, transform, global, MarkerIndex(index)) in &pillars {
        if let Some(t) = ray_hits_obb(origin, dir, global, pillar_pick_size()) {
            if t > 0.0 && best.map_or(true, |(_, _, _, best_t)| t < best_t) {
                best = Some((entity, *index, transform, t));
            }
        }
    }
    let Some((pillar, index, transform, t)) = best else {
        return;
    };

    // Grab offset in rig space keeps the pillar from snapping under the cursor
    let (local_origin, local_dir) = ray_to_rig_space(origin, dir, rig);
    let grab_point = local_origin + local_dir * t;
    let grab_offset = grab_point - transform.translation;

    *drag = DragState::Dragging {
        pillar,
        index,
        grab_offset,
    };
    orbit.enabled = false;
}

/// Dragging + cursor move re-picks the ground plane and moves the pillar
/// in x/z only; y never changes.
pub fn update_marker_drag(
    drag: Res<DragState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    rigs: Query<&GlobalTransform, With<SceneRig>>,
    mut pillars: Query<&mut Transform, With<MarkerPillar>>,
    mut store: ResMut<MarkerStore>,
) {
    let DragState::Dragging {
        pillar,
        index,
        grab_offset,
    } = *drag
    else {
        return;
    };

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

    let Ok(mut transform) = pillars.get_mut(pillar) else {
        return;
    };
    let target = hit - grab_offset;
    transform.translation.x = target.x;
    transform.translation.z = target.z;
    store.set_ground_position(index, target.x, target.z);
}

/// Left release returns to idle and resumes orbit input.
pub fn end_marker_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    mut drag: ResMut<DragState>,
    mut orbit: ResMut<OrbitCamera>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    if matches!(*drag, DragState::Dragging { .. }) {
        *drag = DragState::Idle;
        orbit.enabled = true;
    }
}
