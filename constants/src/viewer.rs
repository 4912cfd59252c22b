use bevy::prelude::*;

/// Fixed horizontal reference plane sitting slightly below the splat origin.
/// All marker placement and picking resolves against this plane, never the
/// splat content itself.
pub const GROUND_PLANE_HEIGHT: f32 = -0.1;

/// Edge length of the (almost transparent) ground plane mesh
pub const GROUND_PLANE_EXTENT: f32 = 200.0;

/// Ground plane tint, barely visible so the splat scene reads through it
pub const GROUND_PLANE_OPACITY: f32 = 0.01;

/// Helper grid dimensions (the grid spawns hidden)
pub const GRID_EXTENT: f32 = 100.0;
pub const GRID_DIVISIONS: u32 = 100;

/// Marker pillar geometry: a thin vertical cylinder rising from the ground
pub const MARKER_PILLAR_RADIUS: f32 = 0.1;
pub const MARKER_PILLAR_HEIGHT: f32 = 20.0;

/// The pinned y for every marker: pillar centre at ground + half the pillar
/// height. Drag moves x/z only, y never leaves this value.
pub const MARKER_HOVER_HEIGHT: f32 = GROUND_PLANE_HEIGHT + MARKER_PILLAR_HEIGHT * 0.5;

/// Labels float this far above the marker position (just past the pillar top)
pub const LABEL_OFFSET_ABOVE_MARKER: f32 = 11.0;

/// Position given to imported marker records that carry no coordinates
pub const FALLBACK_MARKER_POSITION: Vec3 = Vec3::new(0.0, MARKER_HOVER_HEIGHT, 0.0);

/// Camera start: 45 degrees above the scene with a slight zoom-out
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(16.5, 16.5, 16.5);

pub const MARKER_PILLAR_COLOUR: Color = Color::srgb(0.0, 1.0, 0.0);
pub const MARKER_LABEL_COLOUR: Color = Color::srgb(1.0, 0.0, 0.0);
pub const MARKER_LABEL_FONT_SIZE: f32 = 18.0;
