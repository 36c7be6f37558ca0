use bevy::asset::{LoadState, UntypedAssetId, UntypedHandle};
use bevy::gltf::{Gltf, GltfAssetLabel};
use bevy::prelude::*;

use crate::assets_map::AssetManifest;
use crate::config::tuning::{Locale, Tuning};
use crate::game::components::{AppPhase, SceneAssets};

// ── Data types ───────────────────────────────────────────────────────

/// Preload percentage in `[0, 100]`. Never goes backwards.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct LoadProgress(f32);

impl LoadProgress {
    pub fn value(self) -> f32 {
        self.0
    }

    pub fn advance(&mut self, percent: f32) {
        self.0 = self.0.max(percent.clamp(0.0, 100.0));
    }

    pub fn is_complete(self) -> bool {
        self.0 >= 100.0
    }

    pub fn rounded(self) -> u32 {
        self.0.round() as u32
    }
}

pub fn progress_percent(resolved: usize, total: usize) -> f32 {
    if total == 0 {
        return 100.0;
    }
    resolved.min(total) as f32 / total as f32 * 100.0
}

/// Every manifest entry's handle, kept alive past the loading phase.
#[derive(Resource, Default)]
pub struct PreloadSet {
    pub entries: Vec<PreloadEntry>,
}

pub struct PreloadEntry {
    pub path: String,
    pub handle: UntypedHandle,
    pub failure_reported: bool,
}

// ── Marker components ────────────────────────────────────────────────

#[derive(Component)]
struct LoadingRoot;

#[derive(Component)]
struct LoadingText;

// ── Plugin ───────────────────────────────────────────────────────────

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LoadProgress>();

        app.add_systems(
            OnEnter(AppPhase::Loading),
            (request_manifest, spawn_loading_screen),
        );
        app.add_systems(
            Update,
            (track_progress, update_loading_text, open_gate)
                .chain()
                .run_if(in_state(AppPhase::Loading)),
        );
        app.add_systems(OnExit(AppPhase::Loading), despawn_loading_screen);
    }
}

// ── Systems ──────────────────────────────────────────────────────────

fn request_manifest(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifest: Res<AssetManifest>,
) {
    let assets = SceneAssets {
        map_scene: asset_server.load(GltfAssetLabel::Scene(0).from_asset(manifest.map.clone())),
        character_scene: asset_server
            .load(GltfAssetLabel::Scene(0).from_asset(manifest.idle.clone())),
        idle: asset_server.load(manifest.idle.clone()),
        run: asset_server.load(manifest.run.clone()),
        back: asset_server.load(manifest.back.clone()),
        skybox: asset_server.load(manifest.skybox.clone()),
    };

    // The scene handle is a labeled sub-asset; track the whole map file.
    let map: Handle<Gltf> = asset_server.load(manifest.map.clone());
    let handles: [UntypedHandle; 5] = [
        map.untyped(),
        assets.idle.clone().untyped(),
        assets.run.clone().untyped(),
        assets.back.clone().untyped(),
        assets.skybox.clone().untyped(),
    ];
    let entries = manifest
        .paths()
        .into_iter()
        .zip(handles)
        .map(|(path, handle)| PreloadEntry {
            path: path.to_string(),
            handle,
            failure_reported: false,
        })
        .collect::<Vec<_>>();

    info!(
        "Preloading {} assets ({})",
        entries.len(),
        manifest.size_hint
    );
    commands.insert_resource(assets);
    commands.insert_resource(PreloadSet { entries });
}

pub fn loading_message(locale: Locale, size_hint: &str, percent: u32) -> String {
    match locale {
        Locale::En => format!(
            "Loading, please wait... ({size_hint})\n\
             Tip: press W to move forward and S to move back, drag with the left \
             mouse button to look around. On a phone, use the virtual joystick at \
             the bottom left. {percent}%"
        ),
        Locale::Zh => format!(
            "数据读取中请等待... ({size_hint})\n\
             小提示：鼠标左键点击屏幕，按键盘W键前进，S键后退，转动鼠标调整视角，\
             手机登陆请使用左下方的虚拟摇杆进行控制。 {percent}%"
        ),
    }
}

fn spawn_loading_screen(
    mut commands: Commands,
    tuning: Res<Tuning>,
    manifest: Res<AssetManifest>,
    progress: Res<LoadProgress>,
    asset_server: Res<AssetServer>,
) {
    let font = match &tuning.font_path {
        Some(path) => TextFont {
            font: asset_server.load(path.clone()),
            font_size: 22.0,
            ..default()
        },
        None => TextFont {
            font_size: 22.0,
            ..default()
        },
    };

    commands.spawn((LoadingRoot, Camera2d));
    commands
        .spawn((
            LoadingRoot,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                padding: UiRect::all(Val::Px(24.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.05, 0.05, 0.08, 1.0)),
        ))
        .with_children(|parent| {
            parent.spawn((
                LoadingText,
                Text::new(loading_message(
                    tuning.locale,
                    &manifest.size_hint,
                    progress.rounded(),
                )),
                font,
                TextColor(Color::WHITE),
            ));
        });
}

fn track_progress(
    asset_server: Res<AssetServer>,
    preload: Option<ResMut<PreloadSet>>,
    mut progress: ResMut<LoadProgress>,
) {
    let Some(mut preload) = preload else {
        return;
    };

    let mut resolved = 0;
    for entry in &mut preload.entries {
        let id: UntypedAssetId = entry.handle.id();
        if asset_server.is_loaded_with_dependencies(id) {
            resolved += 1;
        } else if !entry.failure_reported
            && matches!(asset_server.get_load_state(id), Some(LoadState::Failed(_)))
        {
            warn!("Failed to load {}", entry.path);
            entry.failure_reported = true;
        }
    }
    progress.advance(progress_percent(resolved, preload.entries.len()));
}

fn update_loading_text(
    tuning: Res<Tuning>,
    manifest: Res<AssetManifest>,
    progress: Res<LoadProgress>,
    mut texts: Query<&mut Text, With<LoadingText>>,
) {
    if !progress.is_changed() {
        return;
    }
    for mut text in &mut texts {
        **text = loading_message(tuning.locale, &manifest.size_hint, progress.rounded());
    }
}

/// Hand over to the scene once everything has resolved.
pub fn open_gate(progress: Res<LoadProgress>, mut next_state: ResMut<NextState<AppPhase>>) {
    if progress.is_complete() {
        info!("Preload complete ({}%), entering scene", progress.value());
        next_state.set(AppPhase::Scene);
    }
}

fn despawn_loading_screen(mut commands: Commands, query: Query<Entity, With<LoadingRoot>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}
