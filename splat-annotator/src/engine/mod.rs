pub mod camera;
pub mod core;
pub mod hud;
pub mod scene;
pub mod splat;
