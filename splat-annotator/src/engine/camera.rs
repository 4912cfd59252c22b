use bevy::input::mouse::MouseScrollUnit;
use bevy::{
    input::mouse::{MouseMotion, MouseWheel},
    prelude::*,
};

use constants::viewer::CAMERA_START_POSITION;

/// Orbit navigation around a focus point. `enabled` is dropped for the
/// duration of a marker drag so the view holds still under the cursor.
#[derive(Resource)]
pub struct OrbitCamera {
    pub focus: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub enabled: bool,
}

impl OrbitCamera {
    pub fn from_position(position: Vec3, focus: Vec3) -> Self {
        let offset = position - focus;
        let distance = offset.length().max(0.01);
        Self {
            focus,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).asin(),
            distance,
            enabled: true,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_position(CAMERA_START_POSITION, Vec3::ZERO)
    }
}

pub fn camera_controller(
    mut camera_query: Query<&mut Transform, With<Camera3d>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    time: Res<Time>,
) {
    let Ok(mut camera_transform) = camera_query.single_mut() else {
        return;
    };

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y * 1.0,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        };
    }

    if orbit.enabled {
        // Left drag orbits the focus point
        if mouse_button.pressed(MouseButton::Left) && mouse_delta != Vec2::ZERO {
            let yaw_sens = 0.005;
            let pitch_sens = 0.005;
            orbit.yaw -= mouse_delta.x * yaw_sens;
            orbit.pitch += mouse_delta.y * pitch_sens;
            orbit.pitch = orbit.pitch.clamp(-1.54, 1.54);
        }

        // Right drag pans in the view plane
        if mouse_button.pressed(MouseButton::Right) && mouse_delta != Vec2::ZERO {
            let pan_speed = orbit.distance * 0.0015;
            let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
            let right = rotation * Vec3::X;
            let up = rotation * Vec3::Y;
            let pan = right * -mouse_delta.x * pan_speed + up * mouse_delta.y * pan_speed;
            orbit.focus += pan;
        }

        // Wheel dollies towards/away from the focus
        if scroll_accum.abs() > f32::EPSILON {
            orbit.distance = (orbit.distance * (1.0 - scroll_accum * 0.1)).clamp(0.5, 500.0);
        }
    }

    let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
    let target_pos = orbit.focus + rotation * (Vec3::Z * orbit.distance);

    let lerp_speed = (12.0 * time.delta_secs()).min(1.0);
    camera_transform.translation = camera_transform.translation.lerp(target_pos, lerp_speed);
    let focus = orbit.focus;
    camera_transform.look_at(focus, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_position_reconstructs_the_start_transform() {
        let orbit = OrbitCamera::from_position(CAMERA_START_POSITION, Vec3::ZERO);
        let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, -orbit.pitch, 0.0);
        let reconstructed = orbit.focus + rotation * (Vec3::Z * orbit.distance);
        assert!(reconstructed.distance(CAMERA_START_POSITION) < 1e-3);
    }
}
