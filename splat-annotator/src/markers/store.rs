use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use constants::viewer::FALLBACK_MARKER_POSITION;

/// A labelled point annotation pinned to the hover height above the ground
/// plane. Only x/z change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: String,
    pub position: Vec3,
}

/// Ordered marker collection. Duplicate labels are permitted; insertion
/// order is preserved through a JSON round-trip and carries no other meaning.
#[derive(Resource, Default, Debug)]
pub struct MarkerStore {
    markers: Vec<Marker>,
}

impl MarkerStore {
    pub fn add(&mut self, label: impl Into<String>, position: Vec3) {
        self.markers.push(Marker {
            label: label.into(),
            position,
        });
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Marker> {
        self.markers.get(index)
    }

    /// Drag support: move a marker in the ground plane. The y component of
    /// the stored position is left untouched.
    pub fn set_ground_position(&mut self, index: usize, x: f32, z: f32) {
        if let Some(marker) = self.markers.get_mut(index) {
            marker.position.x = x;
            marker.position.z = z;
        }
    }

    /// Render the store in the external `{ "markers": [...] }` schema,
    /// in insertion order.
    pub fn to_file(&self) -> MarkerFile {
        MarkerFile {
            markers: self
                .markers
                .iter()
                .map(|m| MarkerRecord {
                    name: m.label.clone(),
                    coordinates: Some(Coordinates {
                        x: m.position.x,
                        y: m.position.y,
                        z: m.position.z,
                    }),
                })
                .collect(),
        }
    }

    /// Replace the whole set from a parsed file. Records without
    /// coordinates land at the fallback position.
    pub fn replace_from_file(&mut self, file: &MarkerFile) {
        self.markers.clear();
        for record in &file.markers {
            let position = record
                .coordinates
                .as_ref()
                .map(|c| Vec3::new(c.x, c.y, c.z))
                .unwrap_or(FALLBACK_MARKER_POSITION);
            self.markers.push(Marker {
                label: record.name.clone(),
                position,
            });
        }
    }
}

/// Marker file schema: `{ "markers": [ { "name", "coordinates": {x,y,z} } ] }`.
/// Registered as a JSON asset for sibling auto-loading and parsed directly
/// for drag-and-drop imports.
#[derive(Asset, TypePath, Serialize, Deserialize, Debug, Clone, Default)]
pub struct MarkerFile {
    pub markers: Vec<MarkerRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MarkerRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Coordinates {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Error, Debug)]
pub enum MarkerFileError {
    #[error("marker JSON is not parsable: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("marker JSON has no top-level `markers` array")]
    MissingMarkers,
}

/// Parse marker JSON, distinguishing unparsable input from a parsable
/// document of the wrong shape. Callers leave their store untouched on error.
pub fn parse_marker_file(json: &str) -> Result<MarkerFile, MarkerFileError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.get("markers").is_some_and(|m| m.is_array()) {
        return Err(MarkerFileError::MissingMarkers);
    }
    Ok(serde_json::from_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> MarkerStore {
        let mut store = MarkerStore::default();
        store.add("Kitchen", Vec3::new(1.5, 9.9, -2.0));
        store.add("Hall", Vec3::new(-4.0, 9.9, 7.25));
        store.add("Hall", Vec3::new(0.0, 9.9, 0.0));
        store
    }

    #[test]
    fn round_trip_preserves_labels_coordinates_and_order() {
        let store = sample_store();
        let json = serde_json::to_string(&store.to_file()).unwrap();

        let mut restored = MarkerStore::default();
        restored.replace_from_file(&parse_marker_file(&json).unwrap());

        assert_eq!(restored.len(), store.len());
        for (a, b) in restored.iter().zip(store.iter()) {
            assert_eq!(a, b);
        }
    }

    #[test]
    fn duplicate_labels_are_kept() {
        let store = sample_store();
        assert_eq!(store.iter().filter(|m| m.label == "Hall").count(), 2);
    }

    #[test]
    fn missing_markers_array_is_an_error() {
        let err = parse_marker_file(r#"{"points": []}"#).unwrap_err();
        assert!(matches!(err, MarkerFileError::MissingMarkers));
    }

    #[test]
    fn markers_as_non_array_is_an_error() {
        let err = parse_marker_file(r#"{"markers": 3}"#).unwrap_err();
        assert!(matches!(err, MarkerFileError::MissingMarkers));
    }

    #[test]
    fn unparsable_json_is_a_parse_error() {
        let err = parse_marker_file("{not json").unwrap_err();
        assert!(matches!(err, MarkerFileError::Parse(_)));
    }

    #[test]
    fn failed_parse_leaves_caller_state_untouched() {
        let mut store = sample_store();
        if let Ok(file) = parse_marker_file(r#"{"markers": {}}"#) {
            store.replace_from_file(&file);
        }
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn record_without_coordinates_falls_back_to_default_position() {
        let json = r#"{"markers":[{"name":"A","coordinates":{"x":1,"y":2,"z":3}},{"name":"B"}]}"#;
        let mut store = MarkerStore::default();
        store.replace_from_file(&parse_marker_file(json).unwrap());

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(store.get(1).unwrap().position, FALLBACK_MARKER_POSITION);
    }

    #[test]
    fn replace_discards_previous_set() {
        let mut store = sample_store();
        let file = parse_marker_file(
            r#"{"markers":[{"name":"A","coordinates":{"x":1,"y":2,"z":3}}]}"#,
        )
        .unwrap();
        store.replace_from_file(&file);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(0).unwrap().label, "A");
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = sample_store();
        store.clear();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn set_ground_position_never_touches_y() {
        let mut store = sample_store();
        let y_before = store.get(0).unwrap().position.y;
        store.set_ground_position(0, 42.0, -17.0);

        let moved = store.get(0).unwrap();
        assert_eq!(moved.position.x, 42.0);
        assert_eq!(moved.position.z, -17.0);
        assert_eq!(moved.position.y, y_before);
    }

    #[test]
    fn file_rendering_uses_name_and_coordinates_keys() {
        let mut store = MarkerStore::default();
        store.add("Kitchen", Vec3::new(1.0, 9.9, 2.0));
        let json = serde_json::to_string(&store.to_file()).unwrap();
        assert!(json.contains(r#""markers""#));
        assert!(json.contains(r#""name":"Kitchen""#));
        assert!(json.contains(r#""coordinates""#));
    }
}
