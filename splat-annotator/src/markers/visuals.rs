use bevy::prelude::*;

use constants::viewer::{
    LABEL_OFFSET_ABOVE_MARKER, MARKER_LABEL_COLOUR, MARKER_LABEL_FONT_SIZE, MARKER_PILLAR_COLOUR,
    MARKER_PILLAR_HEIGHT, MARKER_PILLAR_RADIUS,
};

use crate::engine::scene::SceneRig;
use crate::markers::MarkersChanged;
use crate::markers::store::MarkerStore;

/// Green pillar entity under the scene rig, one per store entry
#[derive(Component)]
pub struct MarkerPillar;

/// Screen-space label following its pillar; always facing the viewer
#[derive(Component)]
pub struct MarkerLabel;

/// Index back into the marker store
#[derive(Component, Clone, Copy)]
pub struct MarkerIndex(pub usize);

/// Rebuilds every pillar and label whenever the store is replaced or
/// extended. Rebuilding from scratch keeps indices dense.
pub fn sync_marker_visuals(
    mut events: EventReader<MarkersChanged>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    store: Res<MarkerStore>,
    rigs: Query<Entity, With<SceneRig>>,
    pillars: Query<Entity, With<MarkerPillar>>,
    labels: Query<Entity, With<MarkerLabel>>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    for entity in &pillars {
        commands.entity(entity).despawn();
    }
    for entity in &labels {
        commands.entity(entity).despawn();
    }

    let Ok(rig) = rigs.single() else {
        return;
    };
    if store.is_empty() {
        return;
    }

    let pillar_mesh = meshes.add(Cylinder::new(MARKER_PILLAR_RADIUS, MARKER_PILLAR_HEIGHT));
    let pillar_material = materials.add(StandardMaterial {
        base_color: MARKER_PILLAR_COLOUR,
        unlit: true,
        ..default()
    });

    for (index, marker) in store.iter().enumerate() {
        commands.spawn((
            Mesh3d(pillar_mesh.clone()),
            MeshMaterial3d(pillar_material.clone()),
            Transform::from_translation(marker.position),
            MarkerPillar,
            MarkerIndex(index),
            ChildOf(rig),
            Name::new(format!("marker_pillar_{index}")),
        ));

        commands.spawn((
            Text::new(marker.label.clone()),
            TextFont {
                font_size: MARKER_LABEL_FONT_SIZE,
                ..default()
            },
            TextColor(MARKER_LABEL_COLOUR),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(0.0),
                top: Val::Px(0.0),
                ..default()
            },
            Visibility::Hidden,
            MarkerLabel,
            MarkerIndex(index),
            Name::new(format!("marker_label_{index}")),
        ));
    }
}

/// Projects each label to the screen position above its pillar every frame.
/// Labels behind the camera are hidden.
pub fn position_marker_labels(
    store: Res<MarkerStore>,
    rigs: Query<&GlobalTransform, With<SceneRig>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut labels: Query<(&MarkerIndex, &mut Node, &mut Visibility), With<MarkerLabel>>,
) {
    let Ok(rig) = rigs.single() else {
        return;
    };
    let Ok((camera, cam_xf)) = cameras.single() else {
        return;
    };

    for (MarkerIndex(index), mut node, mut visibility) in &mut labels {
        let Some(marker) = store.get(*index) else {
            continue;
        };
        let local = marker.position + Vec3::Y * LABEL_OFFSET_ABOVE_MARKER;
        let world = rig.transform_point(local);
        match camera.world_to_viewport(cam_xf, world) {
            Ok(screen) => {
                node.left = Val::Px(screen.x);
                node.top = Val::Px(screen.y);
                *visibility = Visibility::Inherited;
            }
            Err(_) => {
                *visibility = Visibility::Hidden;
            }
        }
    }
}
