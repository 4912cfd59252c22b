use std::time::Duration;

/// Rolling window for the primary-button click run. A click landing later
/// than this after the previous one starts a fresh run.
pub const MULTI_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Run length that triggers a scene reload
pub const RELOAD_CLICK_RUN: u32 = 3;

/// A controller select gesture shorter than this counts towards a tap
pub const VR_TAP_MAX_HOLD: Duration = Duration::from_millis(200);

/// Endpoint displacement above which a select gesture becomes a grab
pub const VR_TAP_MAX_DISPLACEMENT: f32 = 0.05;

/// Two taps inside this window classify as a double-tap
pub const VR_DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(300);

/// Labels for controller-placed markers
pub const VR_TAP_LABEL: &str = "Tap marker";
pub const VR_DOUBLE_TAP_LABEL: &str = "Double tap marker";
