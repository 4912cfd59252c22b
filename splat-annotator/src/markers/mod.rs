//! Marker annotations: the in-memory store and the world/screen visuals.

pub mod store;
pub mod visuals;

use bevy::prelude::*;

use store::MarkerStore;
use visuals::{position_marker_labels, sync_marker_visuals};

/// Fired whenever the store contents are replaced or extended so the
/// visual entities can be rebuilt from scratch.
#[derive(Event, Default)]
pub struct MarkersChanged;

pub struct MarkersPlugin;

impl Plugin for MarkersPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarkerStore>()
            .add_event::<MarkersChanged>()
            .add_systems(Update, (sync_marker_visuals, position_marker_labels).chain());
    }
}
