use bevy::prelude::*;
use bevy::pbr::MeshMaterial3d;
use turntable_models::camera::{TurntableCamera, TurntableTarget};

/// Spawns a small stand-alone scene (lit cube, ground plate, camera) so the
/// turntable has something to capture when no other scene is loaded.
pub struct DemoSceneComponent;

impl Plugin for DemoSceneComponent {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_demo_scene);
    }
}

pub fn setup_demo_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    spawn_demo_target(&mut commands, &mut meshes, &mut materials);

    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Plane3d::default().mesh().size(20.0, 20.0)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.25, 0.25, 0.28),
            ..default()
        })),
        Transform::default(),
        Name::new("Ground"),
    ));

    commands.spawn((
        PointLight {
            intensity: 1_500_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 8.0, 4.0),
    ));

    // The turntable moves this camera, the start pose only matters before the first step.
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 3.0, 8.0).looking_at(Vec3::ZERO, Vec3::Y),
        TurntableCamera,
        Name::new("Turntable Camera"),
    ));
}

fn spawn_demo_target(
    commands: &mut Commands,
    meshes: &mut ResMut<Assets<Mesh>>,
    materials: &mut ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Mesh::from(Cuboid::new(1.0, 1.0, 1.0)))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(0.3, 0.6, 0.9),
            ..default()
        })),
        Transform::from_xyz(0.0, 0.5, 0.0),
        TurntableTarget,
        Name::new("Cube"),
    ));
}
