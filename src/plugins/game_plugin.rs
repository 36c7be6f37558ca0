use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::{
    animation::{self, CharacterAnimationLibrary},
    camera, collision,
    components::AppPhase,
    intent::{self, HeldKey, JoystickMoved, JoystickVector, MovementIntent, MovementState},
    joystick::{self, JoystickCapture},
    movement, world,
};

// ── SystemSets (strict ordering, scene-phase only) ──────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SceneSet {
    InputSet,
    AnimationSet,
    CameraSet,
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedSceneSet {
    MovementSet,
    CollisionSet,
}

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<JoystickMoved>();
        app.init_state::<AppPhase>();
        app.init_resource::<HeldKey>();
        app.init_resource::<JoystickVector>();
        app.init_resource::<JoystickCapture>();
        app.init_resource::<MovementIntent>();
        app.init_resource::<MovementState>();
        app.init_resource::<CharacterAnimationLibrary>();

        app.configure_sets(
            Update,
            (SceneSet::InputSet, SceneSet::AnimationSet, SceneSet::CameraSet)
                .chain()
                .run_if(in_state(AppPhase::Scene)),
        );
        app.configure_sets(
            FixedUpdate,
            (FixedSceneSet::MovementSet, FixedSceneSet::CollisionSet)
                .chain()
                .run_if(in_state(AppPhase::Scene)),
        );

        // ── OnEnter(Scene): compose the world ───────────────────────────
        app.add_systems(OnEnter(AppPhase::Scene), world::spawn_scene);

        // InputSet — chained so the intent sees this frame's key and stick
        app.add_systems(
            Update,
            (
                intent::track_held_key,
                joystick::read_joystick_pointer,
                intent::apply_joystick_moves,
                intent::update_intent,
                camera::mouse_look,
            )
                .chain()
                .in_set(SceneSet::InputSet),
        );

        // AnimationSet
        app.add_systems(
            Update,
            (
                animation::initialize_animation_library,
                animation::select_character_animation,
                animation::bind_animation_players,
                animation::apply_animation_changes,
            )
                .chain()
                .in_set(SceneSet::AnimationSet),
        );

        // CameraSet
        app.add_systems(
            Update,
            (camera::refresh_fov, camera::follow_character)
                .chain()
                .in_set(SceneSet::CameraSet),
        );

        // Bounds need the map meshes' AABBs, which are filled in PostUpdate.
        app.add_systems(
            Update,
            collision::compute_map_bounds.run_if(in_state(AppPhase::Scene)),
        );

        // MovementSet: the tick is skipped entirely while idle
        app.add_systems(
            FixedUpdate,
            movement::advance_character
                .run_if(movement::is_moving)
                .in_set(FixedSceneSet::MovementSet),
        );
        app.add_systems(
            FixedUpdate,
            collision::clamp_to_map.in_set(FixedSceneSet::CollisionSet),
        );

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(Update, tuning_reload_input);
    }
}

/// Reload tuning with F5.
fn tuning_reload_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tuning: ResMut<Tuning>,
    mut fixed: ResMut<Time<Fixed>>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
        fixed.set_timestep_seconds(tuning.dt as f64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::components::{CharacterBody, SceneAssets};
    use bevy::state::app::StatesPlugin;

    fn scene_app() -> App {
        let mut app = App::new();
        app.add_plugins((
            MinimalPlugins,
            StatesPlugin,
            bevy::asset::AssetPlugin::default(),
        ))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<AnimationGraph>()
        .init_asset::<bevy::gltf::Gltf>()
        .init_resource::<ButtonInput<KeyCode>>()
        .init_resource::<ButtonInput<MouseButton>>()
        .add_message::<bevy::input::mouse::MouseMotion>()
        .add_message::<bevy::window::WindowResized>()
        .insert_resource(Tuning::default())
        .init_resource::<SceneAssets>()
        .add_plugins(GamePlugin);
        app
    }

    #[test]
    fn scene_is_not_composed_while_loading() {
        let mut app = scene_app();
        app.update();
        let world = app.world_mut();
        let mut characters = world.query_filtered::<Entity, With<CharacterBody>>();
        assert_eq!(characters.iter(world).count(), 0);
    }

    #[test]
    fn held_w_walks_forward_on_fixed_ticks() {
        let mut app = scene_app();
        app.world_mut()
            .resource_mut::<NextState<AppPhase>>()
            .set(AppPhase::Scene);
        app.update();

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();
        assert_eq!(
            *app.world().resource::<MovementState>(),
            MovementState::MovingForward
        );

        app.world_mut().run_schedule(FixedUpdate);
        let world = app.world_mut();
        let mut characters = world.query_filtered::<&Transform, With<CharacterBody>>();
        let z = characters.single(world).unwrap().translation.z;
        assert!(z < 0.0);
    }
}
