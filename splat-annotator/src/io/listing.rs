use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::Deserialize;

use constants::listing::{SCENE_LISTING_PATH, SCENE_LISTING_POLL_SECONDS, SPLAT_EXTENSIONS};

use crate::engine::splat::{LoadSplatEvent, SplatSource};

/// Server-published index of splat scenes, refetched on a fixed cadence.
#[derive(Asset, TypePath, Deserialize, Debug, Clone)]
pub struct SceneListing {
    pub files: Vec<String>,
}

#[derive(Resource)]
pub struct SceneListingState {
    pub handle: Handle<SceneListing>,
    pub timer: Timer,
    pub entries: Vec<String>,
    pub panel_open: bool,
}

/// Right-hand column holding one button per listed scene
#[derive(Component)]
pub struct ScenePanel;

#[derive(Component)]
pub struct SceneEntryButton(pub String);

fn is_splat_entry(file: &str) -> bool {
    file.rsplit_once('.')
        .is_some_and(|(_, ext)| SPLAT_EXTENSIONS.contains(&ext))
}

pub fn request_initial_listing(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.insert_resource(SceneListingState {
        handle: asset_server.load(SCENE_LISTING_PATH),
        timer: Timer::from_seconds(SCENE_LISTING_POLL_SECONDS, TimerMode::Repeating),
        entries: Vec::new(),
        panel_open: true,
    });
}

pub fn setup_scene_panel(mut commands: Commands) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(40.0),
                right: Val::Px(12.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(4.0),
                padding: UiRect::all(Val::Px(8.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
            ScenePanel,
            Name::new("scene_panel"),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new("Scenes"),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Refetch the listing every tick. A failed previous fetch only logs; the
/// next tick tries again with a fresh request.
pub fn poll_scene_listing(
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut state: ResMut<SceneListingState>,
) {
    if !state.timer.tick(time.delta()).just_finished() {
        return;
    }
    if let Some(LoadState::Failed(_)) = asset_server.get_load_state(state.handle.id()) {
        warn!("Scene listing fetch failed, retrying");
    }
    asset_server.reload(SCENE_LISTING_PATH);
}

/// Rebuilds the panel buttons whenever a listing response lands. Entries
/// without a recognised splat extension are dropped.
pub fn apply_scene_listing(
    mut events: EventReader<AssetEvent<SceneListing>>,
    listings: Res<Assets<SceneListing>>,
    mut state: ResMut<SceneListingState>,
    mut commands: Commands,
    panels: Query<Entity, With<ScenePanel>>,
    buttons: Query<Entity, With<SceneEntryButton>>,
) {
    let mut refreshed = false;
    for event in events.read() {
        if matches!(event, AssetEvent::Added { .. } | AssetEvent::Modified { .. }) {
            refreshed = true;
        }
    }
    if !refreshed {
        return;
    }
    let Some(listing) = listings.get(&state.handle) else {
        return;
    };

    let entries: Vec<String> = listing
        .files
        .iter()
        .filter(|file| is_splat_entry(file))
        .cloned()
        .collect();
    if entries == state.entries {
        return;
    }
    info!("Scene listing updated: {} scenes", entries.len());
    state.entries = entries;

    let Ok(panel) = panels.single() else {
        return;
    };
    for button in &buttons {
        commands.entity(button).despawn();
    }
    for file in &state.entries {
        commands
            .spawn((
                Button,
                Node {
                    padding: UiRect::axes(Val::Px(10.0), Val::Px(4.0)),
                    justify_content: JustifyContent::Center,
                    ..default()
                },
                BackgroundColor(Color::srgb(0.2, 0.2, 0.25)),
                SceneEntryButton(file.clone()),
                ChildOf(panel),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text::new(file.clone()),
                    TextFont {
                        font_size: 13.0,
                        ..default()
                    },
                    TextColor(Color::WHITE),
                ));
            });
    }
}

pub fn scene_panel_buttons(
    mut interactions: Query<
        (&Interaction, &SceneEntryButton, &mut BackgroundColor),
        Changed<Interaction>,
    >,
    mut loads: EventWriter<LoadSplatEvent>,
) {
    for (interaction, entry, mut colour) in &mut interactions {
        match interaction {
            Interaction::Pressed => {
                loads.write(LoadSplatEvent {
                    source: SplatSource::AssetPath(entry.0.clone()),
                });
            }
            Interaction::Hovered => {
                *colour = BackgroundColor(Color::srgb(0.3, 0.3, 0.35));
            }
            Interaction::None => {
                *colour = BackgroundColor(Color::srgb(0.2, 0.2, 0.25));
            }
        }
    }
}

pub fn sync_scene_panel_visibility(
    state: Res<SceneListingState>,
    mut panels: Query<&mut Visibility, With<ScenePanel>>,
) {
    let Ok(mut visibility) = panels.single_mut() else {
        return;
    };
    *visibility = if state.panel_open {
        Visibility::Inherited
    } else {
        Visibility::Hidden
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_filter_keeps_only_splat_extensions() {
        assert!(is_splat_entry("living_room.gcloud"));
        assert!(is_splat_entry("hall.ply"));
        assert!(!is_splat_entry("notes.json"));
        assert!(!is_splat_entry("readme.txt"));
        assert!(!is_splat_entry("extensionless"));
    }

    #[test]
    fn listing_deserialises_the_files_array() {
        let listing: SceneListing =
            serde_json::from_str(r#"{"files": ["a.ply", "b.gcloud"]}"#).unwrap();
        assert_eq!(listing.files, vec!["a.ply", "b.gcloud"]);
    }
}
