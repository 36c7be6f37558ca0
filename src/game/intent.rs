use bevy::prelude::*;

/// Normalized virtual joystick reading. `y < 0` is pushed up.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct JoystickVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Degrees in `[0, 360)`; straight up is 180.
    pub angle: f32,
}

impl JoystickVector {
    /// Build a reading from a stick offset already scaled to the unit disc
    /// (screen axes: +x right, +y down).
    pub fn from_offset(offset: Vec2) -> Self {
        if offset == Vec2::ZERO {
            return Self::default();
        }
        let angle = offset.x.atan2(offset.y).to_degrees().rem_euclid(360.0);
        Self {
            x: offset.x,
            y: offset.y,
            z: 0.0,
            angle,
        }
    }
}

/// Emitted by the on-screen stick whenever its reading changes.
#[derive(Message, Debug, Clone, Copy)]
pub struct JoystickMoved(pub JoystickVector);

/// Most recently pressed key that is still held.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeldKey(pub Option<KeyCode>);

/// Movement flags derived from the current inputs. Both may be set.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementIntent {
    pub running: bool,
    pub back: bool,
}

impl MovementIntent {
    pub fn from_inputs(key: Option<KeyCode>, joystick: &JoystickVector) -> Self {
        Self {
            running: key == Some(KeyCode::KeyW) || joystick.y < 0.0,
            back: key == Some(KeyCode::KeyS) || joystick.y > 0.0,
        }
    }
}

/// Resolved per-tick movement. Forward wins over contradictory back input.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovementState {
    #[default]
    Idle,
    MovingForward,
    MovingBackward,
}

impl From<MovementIntent> for MovementState {
    fn from(intent: MovementIntent) -> Self {
        if intent.running {
            Self::MovingForward
        } else if intent.back {
            Self::MovingBackward
        } else {
            Self::Idle
        }
    }
}

/// Track the held key the way a "last key" keyboard hook would.
pub fn track_held_key(keyboard: Res<ButtonInput<KeyCode>>, mut held: ResMut<HeldKey>) {
    let next = match keyboard.get_just_pressed().last() {
        Some(&key) => Some(key),
        None => match held.0 {
            Some(key) if keyboard.pressed(key) => Some(key),
            _ => keyboard.get_pressed().next().copied(),
        },
    };
    if held.0 != next {
        held.0 = next;
    }
}

/// Replace the joystick reading with the latest move message.
pub fn apply_joystick_moves(
    mut moves: MessageReader<JoystickMoved>,
    mut joystick: ResMut<JoystickVector>,
) {
    if let Some(latest) = moves.read().last() {
        *joystick = latest.0;
    }
}

pub fn update_intent(
    held: Res<HeldKey>,
    joystick: Res<JoystickVector>,
    mut intent: ResMut<MovementIntent>,
    mut state: ResMut<MovementState>,
) {
    let next = MovementIntent::from_inputs(held.0, &joystick);
    if *intent != next {
        *intent = next;
        *state = next.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stick(y: f32) -> JoystickVector {
        JoystickVector {
            y,
            ..default()
        }
    }

    #[test]
    fn w_runs_and_s_backs() {
        let idle = JoystickVector::default();
        assert_eq!(
            MovementIntent::from_inputs(Some(KeyCode::KeyW), &idle),
            MovementIntent { running: true, back: false }
        );
        assert_eq!(
            MovementIntent::from_inputs(Some(KeyCode::KeyS), &idle),
            MovementIntent { running: false, back: true }
        );
        assert_eq!(
            MovementIntent::from_inputs(Some(KeyCode::KeyA), &idle),
            MovementIntent::default()
        );
        assert_eq!(MovementIntent::from_inputs(None, &idle), MovementIntent::default());
    }

    #[test]
    fn joystick_sign_drives_intent() {
        assert!(MovementIntent::from_inputs(None, &stick(-0.3)).running);
        assert!(MovementIntent::from_inputs(None, &stick(0.3)).back);
    }

    #[test]
    fn contradictory_inputs_set_both_flags_and_resolve_forward() {
        let intent = MovementIntent::from_inputs(Some(KeyCode::KeyW), &stick(1.0));
        assert!(intent.running && intent.back);
        assert_eq!(MovementState::from(intent), MovementState::MovingForward);
    }

    #[test]
    fn state_follows_single_flag() {
        let back = MovementIntent { running: false, back: true };
        assert_eq!(MovementState::from(back), MovementState::MovingBackward);
        assert_eq!(MovementState::from(MovementIntent::default()), MovementState::Idle);
    }

    #[test]
    fn stick_pushed_up_points_at_180_degrees() {
        let v = JoystickVector::from_offset(Vec2::new(0.0, -1.0));
        assert_eq!((v.x, v.y, v.z), (0.0, -1.0, 0.0));
        assert!((v.angle - 180.0).abs() < 1e-4);
        let right = JoystickVector::from_offset(Vec2::new(1.0, 0.0));
        assert!((right.angle - 90.0).abs() < 1e-4);
        assert_eq!(JoystickVector::from_offset(Vec2::ZERO), JoystickVector::default());
    }

    #[test]
    fn joystick_message_replaces_whole_reading() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_message::<JoystickMoved>()
            .insert_resource(JoystickVector { x: 0.7, y: 0.2, z: 0.5, angle: 42.0 })
            .add_systems(Update, apply_joystick_moves);

        app.world_mut().write_message(JoystickMoved(JoystickVector {
            x: 0.0,
            y: -1.0,
            z: 0.0,
            angle: 180.0,
        }));
        app.update();

        assert_eq!(
            *app.world().resource::<JoystickVector>(),
            JoystickVector { x: 0.0, y: -1.0, z: 0.0, angle: 180.0 }
        );
    }

    #[test]
    fn held_key_falls_back_when_released() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ButtonInput<KeyCode>>()
            .init_resource::<HeldKey>()
            .add_systems(Update, track_held_key);

        app.world_mut()
            .resource_mut::<ButtonInput<KeyCode>>()
            .press(KeyCode::KeyW);
        app.update();
        assert_eq!(app.world().resource::<HeldKey>().0, Some(KeyCode::KeyW));

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.press(KeyCode::KeyS);
        }
        app.update();
        assert_eq!(app.world().resource::<HeldKey>().0, Some(KeyCode::KeyS));

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(KeyCode::KeyS);
        }
        app.update();
        assert_eq!(app.world().resource::<HeldKey>().0, Some(KeyCode::KeyW));

        {
            let mut keys = app.world_mut().resource_mut::<ButtonInput<KeyCode>>();
            keys.clear();
            keys.release(KeyCode::KeyW);
        }
        app.update();
        assert_eq!(app.world().resource::<HeldKey>().0, None);
    }
}
