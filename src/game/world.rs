use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use bevy::window::PrimaryWindow;

use super::camera::{ThirdPersonCamera, orbit_transform, perspective_for};
use super::components::*;
use crate::config::tuning::Tuning;

const SKYBOX_RADIUS: f32 = 500.0;
const FALLBACK_WINDOW: Vec2 = Vec2::new(1920.0, 1080.0);

/// OnEnter(Scene): compose map, character, camera with skybox, and light.
pub fn spawn_scene(
    mut commands: Commands,
    tuning: Res<Tuning>,
    assets: Res<SceneAssets>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let window_size = windows
        .single()
        .map(|w| Vec2::new(w.width(), w.height()))
        .unwrap_or(FALLBACK_WINDOW);

    commands.spawn((
        InScene,
        MapModel,
        MapCollider,
        SceneRoot(assets.map_scene.clone()),
        Transform::from_scale(Vec3::splat(tuning.map_scale)),
    ));

    let character_tf = Transform::default();
    commands.spawn((
        InScene,
        CharacterBody,
        SceneRoot(assets.character_scene.clone()),
        character_tf,
        CharacterAnimations::from_assets(&assets),
        SelectedAnimation::default(),
    ));

    let orbit = ThirdPersonCamera::default();
    let eye = orbit_transform(
        character_tf.translation + Vec3::Y * tuning.camera_height,
        &orbit,
        tuning.camera_distance,
    );

    let sky_material = materials.add(StandardMaterial {
        base_color_texture: Some(assets.skybox.clone()),
        unlit: true,
        cull_mode: Some(Face::Front),
        ..default()
    });
    let sky_mesh = meshes.add(Sphere::new(SKYBOX_RADIUS).mesh().uv(32, 18));

    commands
        .spawn((
            InScene,
            Camera3d::default(),
            perspective_for(window_size.x, window_size.y, &tuning),
            orbit,
            eye,
        ))
        .with_children(|parent| {
            parent.spawn((
                InScene,
                SkyboxSphere,
                Mesh3d(sky_mesh),
                MeshMaterial3d(sky_material),
                NotShadowCaster,
                NotShadowReceiver,
                Transform::IDENTITY,
            ));
        });

    commands.spawn((
        InScene,
        DirectionalLight {
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(4.0, 10.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    info!("Scene composed ({}x{})", window_size.x, window_size.y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::animation::AnimationName;

    fn count<F: bevy::ecs::query::QueryFilter>(world: &mut World) -> usize {
        world.query_filtered::<Entity, F>().iter(world).count()
    }

    #[test]
    fn scene_has_one_of_each_node() {
        let mut app = App::new();
        app.add_plugins((MinimalPlugins, bevy::asset::AssetPlugin::default()))
            .init_asset::<Mesh>()
            .init_asset::<StandardMaterial>()
            .insert_resource(Tuning::default())
            .init_resource::<SceneAssets>()
            .add_systems(Update, spawn_scene);
        app.update();

        let world = app.world_mut();
        assert_eq!(count::<With<Camera3d>>(world), 1);
        assert_eq!(count::<With<ThirdPersonCamera>>(world), 1);
        assert_eq!(count::<With<MapModel>>(world), 1);
        assert_eq!(count::<With<MapCollider>>(world), 1);
        assert_eq!(count::<With<SkyboxSphere>>(world), 1);
        assert_eq!(count::<With<CharacterBody>>(world), 1);

        let mut animations = world.query_filtered::<&CharacterAnimations, With<CharacterBody>>();
        let animations = animations.single(world).unwrap();
        assert_eq!(animations.clips.len(), 3);
        for name in AnimationName::ALL {
            assert!(animations.source(name).is_some(), "{} missing", name.as_str());
        }
    }
}
