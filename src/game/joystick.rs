use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use super::intent::{JoystickMoved, JoystickVector};
use crate::config::tuning::Tuning;

/// Knob size relative to the base radius.
pub const KNOB_RATIO: f32 = 0.4;

/// Which pointer, if any, currently holds the stick.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoystickCapture {
    #[default]
    Idle,
    Mouse,
    Touch(u64),
}

impl JoystickCapture {
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }
}

#[derive(Component)]
pub struct JoystickBase;

#[derive(Component)]
pub struct JoystickKnob;

/// Center of the stick base in logical window pixels (top-left origin).
pub fn joystick_center(window_size: Vec2, tuning: &Tuning) -> Vec2 {
    let inset = tuning.joystick_margin_px + tuning.joystick_radius_px;
    Vec2::new(inset, window_size.y - inset)
}

/// Pointer offset scaled to the unit disc.
pub fn stick_offset(pointer: Vec2, center: Vec2, radius: f32) -> Vec2 {
    ((pointer - center) / radius.max(1.0)).clamp_length_max(1.0)
}

/// Turn pointer presses over the stick into `JoystickMoved` messages.
pub fn read_joystick_pointer(
    tuning: Res<Tuning>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    touches: Option<Res<Touches>>,
    mut capture: ResMut<JoystickCapture>,
    mut moved: MessageWriter<JoystickMoved>,
    mut last: Local<JoystickVector>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let center = joystick_center(Vec2::new(window.width(), window.height()), &tuning);
    let radius = tuning.joystick_radius_px;
    let over_base = |p: Vec2| p.distance(center) <= radius;

    let pointer = match *capture {
        JoystickCapture::Idle => {
            let touch = touches
                .as_deref()
                .and_then(|t| t.iter_just_pressed().find(|t| over_base(t.position())));
            if let Some(touch) = touch {
                *capture = JoystickCapture::Touch(touch.id());
                Some(touch.position())
            } else if mouse_buttons.just_pressed(MouseButton::Left) {
                match window.cursor_position().filter(|p| over_base(*p)) {
                    Some(pos) => {
                        *capture = JoystickCapture::Mouse;
                        Some(pos)
                    }
                    None => None,
                }
            } else {
                None
            }
        }
        JoystickCapture::Mouse => {
            if mouse_buttons.pressed(MouseButton::Left) {
                match window.cursor_position() {
                    Some(pos) => Some(pos),
                    // Cursor left the window: hold the last reading.
                    None => return,
                }
            } else {
                *capture = JoystickCapture::Idle;
                None
            }
        }
        JoystickCapture::Touch(id) => {
            match touches.as_deref().and_then(|t| t.get_pressed(id)) {
                Some(touch) => Some(touch.position()),
                None => {
                    *capture = JoystickCapture::Idle;
                    None
                }
            }
        }
    };

    let reading = pointer
        .map(|p| JoystickVector::from_offset(stick_offset(p, center, radius)))
        .unwrap_or_default();
    if reading != *last {
        *last = reading;
        moved.write(JoystickMoved(reading));
    }
}

/// Move the knob node to the current reading.
pub fn update_knob(
    tuning: Res<Tuning>,
    joystick: Res<JoystickVector>,
    mut knobs: Query<&mut Node, With<JoystickKnob>>,
) {
    if !joystick.is_changed() && !tuning.is_changed() {
        return;
    }
    let radius = tuning.joystick_radius_px;
    let knob = radius * KNOB_RATIO;
    for mut node in &mut knobs {
        node.left = Val::Px(radius - knob + joystick.x * radius);
        node.top = Val::Px(radius - knob + joystick.y * radius);
    }
}
