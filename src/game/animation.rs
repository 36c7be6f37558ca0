use bevy::gltf::Gltf;
use bevy::prelude::*;
use std::time::Duration;

use super::components::{CharacterAnimations, CharacterBody, SelectedAnimation};
use super::intent::MovementIntent;

/// Clip names the character registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnimationName {
    #[default]
    Idle,
    Run,
    Back,
}

impl AnimationName {
    pub const ALL: [Self; 3] = [Self::Idle, Self::Run, Self::Back];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idleAnimation",
            Self::Run => "runnAnimation",
            Self::Back => "backAnimation",
        }
    }
}

/// Pick the one clip to play. Running is checked first.
pub fn select_animation(running: bool, back: bool) -> AnimationName {
    if running {
        AnimationName::Run
    } else if back {
        AnimationName::Back
    } else {
        AnimationName::Idle
    }
}

/// Animation graph built from the first clip of each animation source.
#[derive(Resource, Default)]
pub struct CharacterAnimationLibrary {
    pub graph_handle: Option<Handle<AnimationGraph>>,
    pub nodes: Vec<(AnimationName, AnimationNodeIndex)>,
}

impl CharacterAnimationLibrary {
    pub fn node(&self, name: AnimationName) -> Option<AnimationNodeIndex> {
        self.nodes
            .iter()
            .find(|(clip, _)| *clip == name)
            .map(|(_, node)| *node)
    }
}

/// Marker for animation players already bound to the character graph.
#[derive(Component)]
pub struct CharacterAnimationBound;

/// Build the graph once every animation source glTF is loaded.
pub fn initialize_animation_library(
    mut library: ResMut<CharacterAnimationLibrary>,
    characters: Query<&CharacterAnimations, With<CharacterBody>>,
    gltfs: Res<Assets<Gltf>>,
    mut graphs: ResMut<Assets<AnimationGraph>>,
) {
    if library.graph_handle.is_some() {
        return;
    }
    let Ok(animations) = characters.single() else {
        return;
    };
    if animations
        .clips
        .iter()
        .any(|(_, handle)| gltfs.get(handle).is_none())
    {
        return;
    }

    let mut graph = AnimationGraph::new();
    let mut nodes = Vec::with_capacity(AnimationName::ALL.len());
    for name in AnimationName::ALL {
        let Some(handle) = animations.source(name) else {
            warn!("{} is not registered on the character", name.as_str());
            continue;
        };
        let Some(clip) = gltfs.get(handle).and_then(|g| g.animations.first()) else {
            warn!("{} source has no animation clip", name.as_str());
            continue;
        };
        nodes.push((name, graph.add_clip(clip.clone(), 1.0, graph.root)));
    }

    info!("Character animation library: {} clip(s)", nodes.len());
    library.graph_handle = Some(graphs.add(graph));
    library.nodes = nodes;
}

/// Attach the graph to animation players spawned under the character and
/// start the selected clip.
pub fn bind_animation_players(
    mut commands: Commands,
    library: Res<CharacterAnimationLibrary>,
    characters: Query<&SelectedAnimation, With<CharacterBody>>,
    parents: Query<&ChildOf>,
    mut players: Query<(Entity, &mut AnimationPlayer), Without<CharacterAnimationBound>>,
) {
    let Some(graph_handle) = library.graph_handle.clone() else {
        return;
    };

    for (entity, mut player) in &mut players {
        let Some(selected) = parents
            .iter_ancestors(entity)
            .find_map(|ancestor| characters.get(ancestor).ok())
        else {
            continue;
        };
        let Some(node) = library.node(selected.0) else {
            continue;
        };

        let mut transitions = AnimationTransitions::new();
        transitions.play(&mut player, node, Duration::ZERO).repeat();

        commands.entity(entity).insert((
            AnimationGraphHandle(graph_handle.clone()),
            transitions,
            CharacterAnimationBound,
        ));
    }
}

/// Write the selected clip from the current intent.
pub fn select_character_animation(
    intent: Res<MovementIntent>,
    mut characters: Query<&mut SelectedAnimation, With<CharacterBody>>,
) {
    let next = SelectedAnimation(select_animation(intent.running, intent.back));
    for mut selected in &mut characters {
        selected.set_if_neq(next);
    }
}

/// Switch bound players instantly when the selected clip changes.
pub fn apply_animation_changes(
    library: Res<CharacterAnimationLibrary>,
    changed: Query<(Entity, &SelectedAnimation), (With<CharacterBody>, Changed<SelectedAnimation>)>,
    children: Query<&Children>,
    mut players: Query<
        (&mut AnimationPlayer, &mut AnimationTransitions),
        With<CharacterAnimationBound>,
    >,
) {
    for (root, selected) in &changed {
        let Some(node) = library.node(selected.0) else {
            continue;
        };
        for descendant in children.iter_descendants(root) {
            if let Ok((mut player, mut transitions)) = players.get_mut(descendant) {
                transitions.play(&mut player, node, Duration::ZERO).repeat();
            }
        }
    }
}
