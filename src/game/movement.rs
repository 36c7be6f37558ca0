use bevy::prelude::*;

use super::components::CharacterBody;
use super::intent::MovementState;
use crate::config::tuning::Tuning;

/// Displace along the local +Z axis. Negative distance moves forward.
pub fn move_forward(transform: &mut Transform, distance: f32) {
    let local_z = transform.rotation * Vec3::Z;
    transform.translation += local_z * distance;
}

/// Signed per-tick displacement for a resolved movement state, if any.
pub fn tick_distance(state: MovementState, tuning: &Tuning) -> Option<f32> {
    match state {
        MovementState::Idle => None,
        MovementState::MovingForward => Some(-tuning.run_step_m()),
        MovementState::MovingBackward => Some(tuning.back_step_m()),
    }
}

/// Run condition: skip the movement tick entirely while idle.
pub fn is_moving(state: Res<MovementState>) -> bool {
    *state != MovementState::Idle
}

/// FixedUpdate: apply at most one displacement per tick.
pub fn advance_character(
    tuning: Res<Tuning>,
    state: Res<MovementState>,
    mut query: Query<&mut Transform, With<CharacterBody>>,
) {
    let Some(distance) = tick_distance(*state, &tuning) else {
        return;
    };
    for mut transform in &mut query {
        move_forward(&mut transform, distance);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::intent::MovementIntent;

    #[test]
    fn negative_distance_moves_along_facing() {
        let mut tf = Transform::default();
        move_forward(&mut tf, -2.0);
        assert!((tf.translation - Vec3::new(0.0, 0.0, -2.0)).length() < 1e-5);
        assert!(tf.translation.dot(*Transform::default().forward()) > 0.0);

        let mut turned = Transform::from_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        move_forward(&mut turned, -1.0);
        assert!((turned.translation - Vec3::new(-1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn tick_distance_uses_step_sizes() {
        let tuning = Tuning::default();
        assert_eq!(tick_distance(MovementState::Idle, &tuning), None);
        assert_eq!(
            tick_distance(MovementState::MovingForward, &tuning),
            Some(-tuning.run_step_m())
        );
        assert_eq!(
            tick_distance(MovementState::MovingBackward, &tuning),
            Some(tuning.back_step_m())
        );
    }

    fn fixed_app(state: MovementState) -> (App, Entity) {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .insert_resource(Tuning::default())
            .insert_resource(state)
            .add_systems(FixedUpdate, advance_character.run_if(is_moving));
        let character = app
            .world_mut()
            .spawn((CharacterBody, Transform::default()))
            .id();
        (app, character)
    }

    fn run_one_tick(app: &mut App) {
        app.world_mut().run_schedule(FixedUpdate);
    }

    #[test]
    fn contradictory_input_moves_once_per_tick() {
        let intent = MovementIntent { running: true, back: true };
        let (mut app, character) = fixed_app(intent.into());
        run_one_tick(&mut app);
        let z = app.world().get::<Transform>(character).unwrap().translation.z;
        assert!((z + Tuning::default().run_step_m()).abs() < 1e-6);
    }

    #[test]
    fn backward_tick_moves_back_step() {
        let (mut app, character) = fixed_app(MovementState::MovingBackward);
        run_one_tick(&mut app);
        let z = app.world().get::<Transform>(character).unwrap().translation.z;
        assert!((z - Tuning::default().back_step_m()).abs() < 1e-6);
    }

    #[test]
    fn idle_tick_leaves_character_in_place() {
        let (mut app, character) = fixed_app(MovementState::Idle);
        run_one_tick(&mut app);
        assert_eq!(
            app.world().get::<Transform>(character).unwrap().translation,
            Vec3::ZERO
        );
    }
}
