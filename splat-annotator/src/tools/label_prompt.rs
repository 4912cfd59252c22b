use bevy::input::ButtonState;
use bevy::input::keyboard::{Key, KeyboardInput};
use bevy::prelude::*;

use crate::markers::MarkersChanged;
use crate::markers::store::MarkerStore;

const PLACEHOLDER: &str = "Enter text here...";

/// Pending marker creation: a ground hit waiting for its label.
#[derive(Debug, Clone)]
pub struct PendingMarker {
    pub position: Vec3,
    pub screen: Vec2,
    pub text: String,
}

#[derive(Resource, Default)]
pub struct PromptState {
    pending: Option<PendingMarker>,
}

impl PromptState {
    pub fn open(&mut self, position: Vec3, screen: Vec2) {
        self.pending = Some(PendingMarker {
            position,
            screen,
            text: String::new(),
        });
    }

    pub fn dismiss(&mut self) {
        self.pending = None;
    }

    pub fn is_active(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingMarker> {
        self.pending.as_ref()
    }

    fn pending_mut(&mut self) -> Option<&mut PendingMarker> {
        self.pending.as_mut()
    }

    fn take(&mut self) -> Option<PendingMarker> {
        self.pending.take()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptEdit {
    Typed,
    Confirm,
    Cancel,
    Ignored,
}

/// Apply one logical key to the prompt text.
pub fn apply_prompt_key(text: &mut String, key: &Key) -> PromptEdit {
    match key {
        Key::Character(input) => {
            if input.chars().any(char::is_control) {
                return PromptEdit::Ignored;
            }
            text.push_str(input.as_str());
            PromptEdit::Typed
        }
        Key::Space => {
            text.push(' ');
            PromptEdit::Typed
        }
        Key::Backspace => {
            text.pop();
            PromptEdit::Typed
        }
        Key::Enter => PromptEdit::Confirm,
        Key::Escape => PromptEdit::Cancel,
        _ => PromptEdit::Ignored,
    }
}

/// Whitespace-only input confirms to nothing.
pub fn accepted_label(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Component)]
pub struct PromptRoot;

#[derive(Component)]
pub struct PromptInputText;

#[derive(Component)]
pub struct PromptOkButton;

#[derive(Component)]
pub struct PromptCancelButton;

/// Keeps the prompt overlay in step with the state resource.
pub fn sync_prompt_ui(
    prompt: Res<PromptState>,
    existing: Query<Entity, With<PromptRoot>>,
    mut commands: Commands,
) {
    match (prompt.pending(), existing.single()) {
        (Some(pending), Err(_)) => spawn_prompt_ui(&mut commands, pending),
        (None, Ok(root)) => commands.entity(root).despawn(),
        _ => {}
    }
}

fn spawn_prompt_ui(commands: &mut Commands, pending: &PendingMarker) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(pending.screen.x + 10.0),
                top: Val::Px(pending.screen.y + 10.0),
                flex_direction: FlexDirection::Row,
                column_gap: Val::Px(5.0),
                ..default()
            },
            // Interaction marks presses landing on the prompt so the click
            // tracker can leave them alone
            Interaction::default(),
            PromptRoot,
            Name::new("label_prompt"),
        ))
        .with_children(|parent| {
            parent
                .spawn((
                    Node {
                        padding: UiRect::all(Val::Px(10.0)),
                        min_width: Val::Px(160.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
                    BorderRadius::all(Val::Px(10.0)),
                ))
                .with_children(|input| {
                    input.spawn((
                        Text::new(PLACEHOLDER),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::srgb(0.6, 0.6, 0.6)),
                        PromptInputText,
                    ));
                });

            spawn_prompt_button(parent, "OK", Color::srgb(0.30, 0.69, 0.31), PromptOkButton);
            spawn_prompt_button(
                parent,
                "Cancel",
                Color::srgb(0.96, 0.26, 0.21),
                PromptCancelButton,
            );
        });
}

fn spawn_prompt_button(
    parent: &mut ChildSpawnerCommands,
    caption: &str,
    colour: Color,
    tag: impl Component,
) {
    parent
        .spawn((
            Button,
            Node {
                padding: UiRect::axes(Val::Px(20.0), Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(colour),
            BorderRadius::all(Val::Px(10.0)),
            tag,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(caption),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

/// Mirrors the typed text into the input box.
pub fn update_prompt_text(
    prompt: Res<PromptState>,
    mut texts: Query<(&mut Text, &mut TextColor), With<PromptInputText>>,
) {
    if !prompt.is_changed() {
        return;
    }
    let Some(pending) = prompt.pending() else {
        return;
    };
    let Ok((mut text, mut colour)) = texts.single_mut() else {
        return;
    };
    if pending.text.is_empty() {
        text.0 = PLACEHOLDER.to_string();
        colour.0 = Color::srgb(0.6, 0.6, 0.6);
    } else {
        text.0 = pending.text.clone();
        colour.0 = Color::WHITE;
    }
}

/// Text entry via logical keys; Enter confirms, Escape cancels.
pub fn prompt_keyboard_input(
    mut events: EventReader<KeyboardInput>,
    mut prompt: ResMut<PromptState>,
    mut store: ResMut<MarkerStore>,
    mut changed: EventWriter<MarkersChanged>,
) {
    if !prompt.is_active() {
        events.clear();
        return;
    }

    for event in events.read() {
        if event.state != ButtonState::Pressed {
            continue;
        }
        let Some(pending) = prompt.pending_mut() else {
            break;
        };
        match apply_prompt_key(&mut pending.text, &event.logical_key) {
            PromptEdit::Confirm => {
                confirm_prompt(&mut prompt, &mut store, &mut changed);
                break;
            }
            PromptEdit::Cancel => {
                prompt.dismiss();
                break;
            }
            PromptEdit::Typed | PromptEdit::Ignored => {}
        }
    }
}

pub fn prompt_button_system(
    interactions: Query<
        (
            &Interaction,
            Option<&PromptOkButton>,
            Option<&PromptCancelButton>,
        ),
        (Changed<Interaction>, With<Button>),
    >,
    mut prompt: ResMut<PromptState>,
    mut store: ResMut<MarkerStore>,
    mut changed: EventWriter<MarkersChanged>,
) {
    for (interaction, ok, cancel) in &interactions {
        if *interaction != Interaction::Pressed {
            continue;
        }
        if ok.is_some() {
            confirm_prompt(&mut prompt, &mut store, &mut changed);
        } else if cancel.is_some() {
            prompt.dismiss();
        }
    }
}

fn confirm_prompt(
    prompt: &mut PromptState,
    store: &mut MarkerStore,
    changed: &mut EventWriter<MarkersChanged>,
) {
    let Some(pending) = prompt.take() else {
        return;
    };
    if let Some(label) = accepted_label(&pending.text) {
        store.add(label, pending.position);
        changed.write_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn characters_and_spaces_append() {
        let mut text = String::new();
        assert_eq!(
            apply_prompt_key(&mut text, &Key::Character("K".into())),
            PromptEdit::Typed
        );
        apply_prompt_key(&mut text, &Key::Character("i".into()));
        apply_prompt_key(&mut text, &Key::Space);
        apply_prompt_key(&mut text, &Key::Character("t".into()));
        assert_eq!(text, "Ki t");
    }

    #[test]
    fn backspace_removes_the_last_character() {
        let mut text = String::from("Hall");
        apply_prompt_key(&mut text, &Key::Backspace);
        assert_eq!(text, "Hal");
    }

    #[test]
    fn backspace_on_empty_text_is_harmless() {
        let mut text = String::new();
        apply_prompt_key(&mut text, &Key::Backspace);
        assert!(text.is_empty());
    }

    #[test]
    fn enter_confirms_and_escape_cancels() {
        let mut text = String::new();
        assert_eq!(apply_prompt_key(&mut text, &Key::Enter), PromptEdit::Confirm);
        assert_eq!(apply_prompt_key(&mut text, &Key::Escape), PromptEdit::Cancel);
    }

    #[test]
    fn navigation_keys_are_ignored() {
        let mut text = String::from("x");
        assert_eq!(
            apply_prompt_key(&mut text, &Key::ArrowLeft),
            PromptEdit::Ignored
        );
        assert_eq!(text, "x");
    }

    #[test]
    fn whitespace_only_labels_are_rejected() {
        assert_eq!(accepted_label("   "), None);
        assert_eq!(accepted_label(""), None);
        assert_eq!(accepted_label("  Kitchen "), Some("Kitchen".to_string()));
    }
}
