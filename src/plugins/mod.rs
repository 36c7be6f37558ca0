pub mod game_plugin;
pub mod loading_plugin;
pub mod ui_plugin;
