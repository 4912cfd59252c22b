//! End-to-end marker workflows over the pure-logic layer: placement via the
//! click tracker and ground picking, label entry, drag repositioning through
//! the pillar pick, JSON export/import, and VR tap placement.

use std::time::Duration;

use bevy::input::keyboard::Key;
use bevy::prelude::*;

use constants::gestures::MULTI_CLICK_WINDOW;
use constants::viewer::{
    FALLBACK_MARKER_POSITION, GROUND_PLANE_HEIGHT, MARKER_HOVER_HEIGHT, MARKER_PILLAR_HEIGHT,
    MARKER_PILLAR_RADIUS,
};

use splat_annotator::markers::store::{MarkerStore, parse_marker_file};
use splat_annotator::tools::click_tracker::{ClickClass, ClickTracker};
use splat_annotator::tools::label_prompt::{PromptEdit, accepted_label, apply_prompt_key};
use splat_annotator::tools::picking::{ground_plane_hit, ray_hits_obb};
use splat_annotator::tools::vr_gestures::{
    GestureAction, GestureClassifier, VrControl, VrControllerEvent, VrPhase,
};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

#[test]
fn double_click_places_a_named_marker_at_the_ground_hit() {
    // Two quick presses classify as a double-click
    let mut tracker = ClickTracker::new(MULTI_CLICK_WINDOW);
    assert_eq!(tracker.register(ms(0)), ClickClass::Single);
    assert_eq!(tracker.register(ms(180)), ClickClass::Double);

    // Camera ray down onto the ground plane
    let origin = Vec3::new(3.0, 10.0, -2.0);
    let direction = Vec3::new(0.0, -1.0, 0.0);
    let hit = ground_plane_hit(origin, direction, GROUND_PLANE_HEIGHT).unwrap();
    assert!((hit.y - GROUND_PLANE_HEIGHT).abs() < 1e-5);

    // The prompt pins the marker at hover height over the hit
    let position = Vec3::new(hit.x, MARKER_HOVER_HEIGHT, hit.z);

    // Type the label and confirm
    let mut text = String::new();
    for ch in ["K", "i", "t", "c", "h", "e", "n"] {
        let edit = apply_prompt_key(&mut text, &Key::Character(ch.into()));
        assert_eq!(edit, PromptEdit::Typed);
    }
    assert_eq!(apply_prompt_key(&mut text, &Key::Enter), PromptEdit::Confirm);
    let label = accepted_label(&text).unwrap();

    let mut store = MarkerStore::default();
    store.add(label, position);

    let marker = store.get(0).unwrap();
    assert_eq!(marker.label, "Kitchen");
    assert_eq!(marker.position, Vec3::new(3.0, MARKER_HOVER_HEIGHT, -2.0));
}

#[test]
fn blank_or_cancelled_labels_place_nothing() {
    let mut text = String::from("   ");
    assert_eq!(apply_prompt_key(&mut text, &Key::Enter), PromptEdit::Confirm);
    assert!(accepted_label(&text).is_none());

    let mut text = String::from("Kitchen");
    assert_eq!(apply_prompt_key(&mut text, &Key::Escape), PromptEdit::Cancel);
}

#[test]
fn dragging_a_pillar_moves_it_along_the_ground() {
    let mut store = MarkerStore::default();
    store.add("Kitchen", Vec3::new(2.0, MARKER_HOVER_HEIGHT, 5.0));

    // Ray through the pillar body picks it up
    let pillar_xf = GlobalTransform::from_translation(Vec3::new(2.0, MARKER_HOVER_HEIGHT, 5.0));
    let size = Vec3::new(
        MARKER_PILLAR_RADIUS * 2.0,
        MARKER_PILLAR_HEIGHT,
        MARKER_PILLAR_RADIUS * 2.0,
    );
    let origin = Vec3::new(2.0, MARKER_HOVER_HEIGHT, 20.0);
    let hit = ray_hits_obb(origin, Vec3::new(0.0, 0.0, -1.0), &pillar_xf, size);
    assert!(hit.is_some());

    // Drop the marker where the next ground hit lands
    let target = ground_plane_hit(
        Vec3::new(7.0, 10.0, -1.0),
        Vec3::new(0.0, -1.0, 0.0),
        GROUND_PLANE_HEIGHT,
    )
    .unwrap();
    store.set_ground_position(0, target.x, target.z);

    let marker = store.get(0).unwrap();
    assert_eq!(marker.position.x, 7.0);
    assert_eq!(marker.position.z, -1.0);
    // Height is never disturbed by a drag
    assert_eq!(marker.position.y, MARKER_HOVER_HEIGHT);
}

#[test]
fn export_then_import_round_trips_through_the_wire_format() {
    let mut store = MarkerStore::default();
    store.add("Kitchen", Vec3::new(1.0, MARKER_HOVER_HEIGHT, 2.0));
    store.add("Hallway", Vec3::new(-3.0, MARKER_HOVER_HEIGHT, 4.5));

    let json = serde_json::to_string_pretty(&store.to_file()).unwrap();
    let file = parse_marker_file(&json).unwrap();

    let mut imported = MarkerStore::default();
    imported.replace_from_file(&file);

    assert_eq!(imported.len(), 2);
    assert_eq!(imported.get(0).unwrap().label, "Kitchen");
    assert_eq!(
        imported.get(1).unwrap().position,
        Vec3::new(-3.0, MARKER_HOVER_HEIGHT, 4.5)
    );
}

#[test]
fn import_replaces_rather_than_appends() {
    let mut store = MarkerStore::default();
    store.add("Old", Vec3::new(0.0, MARKER_HOVER_HEIGHT, 0.0));

    let file = parse_marker_file(
        r#"{"markers": [{"name": "New", "coordinates": {"x": 1.0, "y": 9.9, "z": 1.0}}]}"#,
    )
    .unwrap();
    store.replace_from_file(&file);

    assert_eq!(store.len(), 1);
    assert_eq!(store.get(0).unwrap().label, "New");
}

#[test]
fn import_without_a_position_falls_back_to_the_origin_pillar() {
    let file = parse_marker_file(r#"{"markers": [{"name": "Lost"}]}"#).unwrap();
    let mut store = MarkerStore::default();
    store.replace_from_file(&file);

    assert_eq!(store.get(0).unwrap().position, FALLBACK_MARKER_POSITION);
}

#[test]
fn malformed_import_is_rejected_whole() {
    assert!(parse_marker_file(r#"{"points": []}"#).is_err());
    assert!(parse_marker_file("not json").is_err());
}

#[test]
fn triple_click_is_classified_once_then_the_run_resets() {
    let mut tracker = ClickTracker::new(MULTI_CLICK_WINDOW);
    tracker.register(ms(0));
    tracker.register(ms(100));
    assert_eq!(tracker.register(ms(200)), ClickClass::Triple);
    // The run restarts; a fourth quick press is a fresh single
    assert_eq!(tracker.register(ms(300)), ClickClass::Single);
}

#[test]
fn vr_tap_places_a_marker_and_a_long_hold_does_not() {
    let mut classifier = GestureClassifier::default();
    let press = VrControllerEvent {
        control: VrControl::Select,
        phase: VrPhase::Start,
        position: Vec3::new(0.5, 1.2, -0.5),
        orientation: Quat::IDENTITY,
    };
    let release = VrControllerEvent {
        phase: VrPhase::End,
        ..press.clone()
    };

    assert!(classifier.handle(&press, ms(0)).is_none());
    let action = classifier.handle(&release, ms(120));
    assert_eq!(action, Some(GestureAction::Tap(Vec3::new(0.5, 1.2, -0.5))));

    // Holding past the tap threshold yields a grab, not a tap
    assert!(classifier.handle(&press, ms(1000)).is_none());
    assert!(classifier.handle(&release, ms(1500)).is_none());
}

#[test]
fn two_quick_vr_taps_classify_as_a_double_tap() {
    let mut classifier = GestureClassifier::default();
    let press = VrControllerEvent {
        control: VrControl::Select,
        phase: VrPhase::Start,
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };
    let release = VrControllerEvent {
        phase: VrPhase::End,
        ..press.clone()
    };

    classifier.handle(&press, ms(0));
    assert!(matches!(
        classifier.handle(&release, ms(100)),
        Some(GestureAction::Tap(_))
    ));
    classifier.handle(&press, ms(200));
    assert!(matches!(
        classifier.handle(&release, ms(300)),
        Some(GestureAction::DoubleTap(_))
    ));
}
