/// Remote scene listing, fetched through the asset server. The multi-part
/// extension keeps its JSON loader separate from the marker-file loader.
pub const SCENE_LISTING_PATH: &str = "scenes.listing.json";

/// Listing refresh interval in seconds. The poll is unconditional; a failed
/// fetch only logs and the next tick tries again.
pub const SCENE_LISTING_POLL_SECONDS: f32 = 10.0;

/// Splat asset extensions accepted by the picker and the scene listing
pub const SPLAT_EXTENSIONS: &[&str] = &["ply", "gcloud"];
