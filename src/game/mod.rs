pub mod animation;
pub mod camera;
pub mod collision;
pub mod components;
pub mod intent;
pub mod joystick;
pub mod movement;
pub mod world;
