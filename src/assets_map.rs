use bevy::prelude::*;

/// Fixed list of assets preloaded before the scene is shown.
#[derive(Resource, Debug, Clone)]
pub struct AssetManifest {
    pub map: String,
    pub idle: String,
    pub run: String,
    pub back: String,
    pub skybox: String,
    /// Human-readable download size, shown on the loading screen only.
    pub size_hint: String,
}

impl AssetManifest {
    pub fn with_defaults() -> Self {
        Self {
            map: "school.glb".into(),
            idle: "idle.glb".into(),
            run: "run.glb".into(),
            back: "back.glb".into(),
            skybox: "skybox.jpg".into(),
            size_hint: "21.2mb".into(),
        }
    }

    /// Every asset path, in preload order.
    pub fn paths(&self) -> [&str; 5] {
        [&self.map, &self.idle, &self.run, &self.back, &self.skybox]
    }
}

impl Default for AssetManifest {
    fn default() -> Self {
        Self::with_defaults()
    }
}
