use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::mesh::PrimitiveTopology;
use bevy_gaussian_splatting::GaussianCamera;

use constants::viewer::{
    CAMERA_START_POSITION, GRID_DIVISIONS, GRID_EXTENT, GROUND_PLANE_EXTENT, GROUND_PLANE_HEIGHT,
    GROUND_PLANE_OPACITY,
};

/// Transform entity holding the splat cloud, the ground plane and every
/// marker pillar. VR grab/squeeze gestures move this entity, so marker
/// coordinates stay stable in rig-local space.
#[derive(Component)]
pub struct SceneRig;

#[derive(Component)]
pub struct GroundPlane;

#[derive(Component)]
pub struct GroundGrid;

pub fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let rig = commands
        .spawn((
            SceneRig,
            Transform::IDENTITY,
            Visibility::default(),
            Name::new("scene_rig"),
        ))
        .id();

    spawn_ground_plane(&mut commands, &mut meshes, &mut materials, rig);
    spawn_ground_grid(&mut commands, &mut meshes, &mut materials, rig);
    spawn_lighting(&mut commands);
    spawn_viewer_camera(&mut commands);
}

/// Near-invisible pick surface slightly below the splat origin
fn spawn_ground_plane(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    rig: Entity,
) {
    commands.spawn((
        Mesh3d(
            meshes.add(
                Plane3d::default()
                    .mesh()
                    .size(GROUND_PLANE_EXTENT, GROUND_PLANE_EXTENT),
            ),
        ),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(0.8, 0.8, 0.8, GROUND_PLANE_OPACITY),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            cull_mode: None,
            double_sided: true,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_PLANE_HEIGHT, 0.0),
        GroundPlane,
        ChildOf(rig),
        Name::new("ground_plane"),
    ));
}

/// Helper floor grid, spawned hidden; toggling it on is a debugging aid
fn spawn_ground_grid(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
    rig: Entity,
) {
    commands.spawn((
        Mesh3d(meshes.add(create_grid_mesh(GRID_EXTENT, GRID_DIVISIONS))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgba(1.0, 1.0, 1.0, 0.5),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        })),
        Transform::from_xyz(0.0, GROUND_PLANE_HEIGHT, 0.0),
        Visibility::Hidden,
        GroundGrid,
        ChildOf(rig),
        Name::new("ground_grid"),
    ));
}

/// Flat line-list grid centred on the origin
fn create_grid_mesh(extent: f32, divisions: u32) -> Mesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let half = extent * 0.5;
    let step = extent / divisions as f32;

    for i in 0..=divisions {
        let offset = -half + i as f32 * step;

        let base = vertices.len() as u32;
        vertices.push([offset, 0.0, -half]);
        vertices.push([offset, 0.0, half]);
        vertices.push([-half, 0.0, offset]);
        vertices.push([half, 0.0, offset]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 3]);
    }

    let mut mesh = Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::RENDER_WORLD);
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, vertices);
    mesh.insert_indices(bevy::render::mesh::Indices::U32(indices));
    mesh
}

fn spawn_lighting(commands: &mut Commands) {
    commands.spawn((
        DirectionalLight {
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

fn spawn_viewer_camera(commands: &mut Commands) {
    commands.spawn((
        Camera3d::default(),
        GaussianCamera::default(),
        Msaa::Off,
        Transform::from_translation(CAMERA_START_POSITION).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
