use bevy::gltf::Gltf;
use bevy::prelude::*;

use super::animation::AnimationName;

// ── Marker components ───────────────────────────────────────────────

/// The controllable character root.
#[derive(Component)]
pub struct CharacterBody;

/// Root of the static map model.
#[derive(Component)]
pub struct MapModel;

/// Tags an entity whose meshes bound the walkable area.
#[derive(Component)]
pub struct MapCollider;

#[derive(Component)]
pub struct SkyboxSphere;

/// Marker: tag all scene entities so the scene can be torn down as a unit.
#[derive(Component)]
pub struct InScene;

// ── App phase state ─────────────────────────────────────────────────

#[derive(States, Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AppPhase {
    #[default]
    Loading,
    Scene,
}

// ── Preloaded handles ───────────────────────────────────────────────

/// Handles requested by the loader and handed off to the scene.
#[derive(Resource, Default, Clone)]
pub struct SceneAssets {
    pub map_scene: Handle<Scene>,
    pub character_scene: Handle<Scene>,
    pub idle: Handle<Gltf>,
    pub run: Handle<Gltf>,
    pub back: Handle<Gltf>,
    pub skybox: Handle<Image>,
}

// ── Character animation state ───────────────────────────────────────

/// Named clips registered on the character, each sourced from its own glTF.
#[derive(Component, Clone)]
pub struct CharacterAnimations {
    pub clips: Vec<(AnimationName, Handle<Gltf>)>,
}

impl CharacterAnimations {
    pub fn from_assets(assets: &SceneAssets) -> Self {
        Self {
            clips: vec![
                (AnimationName::Idle, assets.idle.clone()),
                (AnimationName::Run, assets.run.clone()),
                (AnimationName::Back, assets.back.clone()),
            ],
        }
    }

    pub fn source(&self, name: AnimationName) -> Option<&Handle<Gltf>> {
        self.clips
            .iter()
            .find(|(clip, _)| *clip == name)
            .map(|(_, handle)| handle)
    }
}

/// The single clip currently selected for the character.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectedAnimation(pub AnimationName);
