mod assets_map;
mod config;
mod game;
mod plugins;

use bevy::prelude::*;

use assets_map::AssetManifest;
use config::tuning::Tuning;
use plugins::{game_plugin::GamePlugin, loading_plugin::LoadingPlugin, ui_plugin::UiPlugin};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Campus Walk".into(),
                resolution: (1280u32, 720u32).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_seconds(tuning.dt as f64))
        .insert_resource(tuning)
        .insert_resource(AssetManifest::with_defaults())
        .add_plugins(GamePlugin)
        .add_plugins(LoadingPlugin)
        .add_plugins(UiPlugin)
        .run();
}
