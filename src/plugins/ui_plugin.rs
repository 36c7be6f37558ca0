use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::components::*;
use crate::game::joystick::{self, JoystickBase, JoystickKnob, KNOB_RATIO};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppPhase::Scene), setup_joystick);
        app.add_systems(
            Update,
            (joystick::update_knob, layout_joystick).run_if(in_state(AppPhase::Scene)),
        );
    }
}

fn setup_joystick(mut commands: Commands, tuning: Res<Tuning>) {
    let radius = tuning.joystick_radius_px;
    let knob = radius * KNOB_RATIO;

    commands
        .spawn((
            InScene,
            JoystickBase,
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(tuning.joystick_margin_px),
                bottom: Val::Px(tuning.joystick_margin_px),
                width: Val::Px(radius * 2.0),
                height: Val::Px(radius * 2.0),
                border_radius: BorderRadius::MAX,
                ..default()
            },
            BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.15)),
        ))
        .with_children(|parent| {
            parent.spawn((
                JoystickKnob,
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(radius - knob),
                    top: Val::Px(radius - knob),
                    width: Val::Px(knob * 2.0),
                    height: Val::Px(knob * 2.0),
                    border_radius: BorderRadius::MAX,
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.5)),
            ));
        });
}

/// Follow tuning reloads (F5) so the drawn base matches the hit area.
fn layout_joystick(tuning: Res<Tuning>, mut bases: Query<&mut Node, With<JoystickBase>>) {
    if !tuning.is_changed() {
        return;
    }
    let radius = tuning.joystick_radius_px;
    for mut node in &mut bases {
        node.left = Val::Px(tuning.joystick_margin_px);
        node.bottom = Val::Px(tuning.joystick_margin_px);
        node.width = Val::Px(radius * 2.0);
        node.height = Val::Px(radius * 2.0);
    }
}
