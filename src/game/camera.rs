use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};

use super::components::CharacterBody;
use super::joystick::JoystickCapture;
use crate::config::tuning::Tuning;

/// Orbit state of the camera that trails the character.
#[derive(Component, Debug, Default)]
pub struct ThirdPersonCamera {
    pub yaw: f32,
    pub pitch: f32,
}

/// Field of view in degrees: landscape when strictly wider than tall.
pub fn select_fov(width: f32, height: f32, tuning: &Tuning) -> f32 {
    if width > height {
        tuning.landscape_fov_deg
    } else {
        tuning.portrait_fov_deg
    }
}

pub fn perspective_for(width: f32, height: f32, tuning: &Tuning) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: select_fov(width, height, tuning).to_radians(),
        ..default()
    })
}

/// Re-pick the FOV when the window is resized or tuning is reloaded.
pub fn refresh_fov(
    tuning: Res<Tuning>,
    mut resized: MessageReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<&mut Projection, With<ThirdPersonCamera>>,
) {
    let size = match resized.read().last() {
        Some(event) => Vec2::new(event.width, event.height),
        None if tuning.is_changed() => match windows.single() {
            Ok(window) => window.size(),
            Err(_) => return,
        },
        None => return,
    };
    let fov = select_fov(size.x, size.y, &tuning).to_radians();
    for mut projection in &mut cameras {
        if let Projection::Perspective(perspective) = projection.as_mut() {
            perspective.fov = fov;
        }
    }
}

/// Left-drag rotates the view; the character turns with the camera yaw.
pub fn mouse_look(
    tuning: Res<Tuning>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    capture: Res<JoystickCapture>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut cameras: Query<&mut ThirdPersonCamera>,
    mut characters: Query<&mut Transform, With<CharacterBody>>,
) {
    let delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if !mouse_buttons.pressed(MouseButton::Left) || capture.is_active() || delta == Vec2::ZERO {
        return;
    }
    let Ok(mut camera) = cameras.single_mut() else {
        return;
    };

    camera.yaw -= delta.x * tuning.look_sensitivity;
    camera.pitch = (camera.pitch - delta.y * tuning.look_sensitivity)
        .max(tuning.pitch_min)
        .min(tuning.pitch_max);

    for mut transform in &mut characters {
        transform.rotation = Quat::from_rotation_y(camera.yaw);
    }
}

/// Place the camera behind the character and aim at its head.
pub fn follow_character(
    tuning: Res<Tuning>,
    characters: Query<&Transform, With<CharacterBody>>,
    mut cameras: Query<(&ThirdPersonCamera, &mut Transform), Without<CharacterBody>>,
) {
    let Ok(character) = characters.single() else {
        return;
    };
    let target = character.translation + Vec3::Y * tuning.camera_height;
    for (orbit, mut transform) in &mut cameras {
        *transform = orbit_transform(target, orbit, tuning.camera_distance);
    }
}

pub fn orbit_transform(target: Vec3, orbit: &ThirdPersonCamera, distance: f32) -> Transform {
    let rotation = Quat::from_euler(EulerRot::YXZ, orbit.yaw, orbit.pitch, 0.0);
    let eye = target + rotation * Vec3::new(0.0, 0.0, distance);
    Transform::from_translation(eye).looking_at(target, Vec3::Y)
}
