use bevy::prelude::*;

/// One-line user-facing status message shown in the HUD for a few seconds
#[derive(Event, Clone, Debug)]
pub struct StatusEvent(pub String);

#[derive(Component)]
pub struct StatusText;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Component)]
pub struct FpsText;

#[derive(Resource)]
pub struct StatusTimer(pub Timer);

impl Default for StatusTimer {
    fn default() -> Self {
        Self(Timer::from_seconds(5.0, TimerMode::Once))
    }
}

pub fn setup_hud(mut commands: Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new(
                    "Esc: scenes  |  Ctrl+R: reload  |  Ctrl+S: export markers  |  \
                     double-click ground: add marker",
                ),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgba(1.0, 1.0, 1.0, 0.6)),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
            ));

            parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::srgb(1.0, 1.0, 0.2)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    left: Val::Px(12.0),
                    ..default()
                },
                StatusText,
            ));

            #[cfg(not(target_arch = "wasm32"))]
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

pub fn update_status_text(
    mut events: EventReader<StatusEvent>,
    mut timer: ResMut<StatusTimer>,
    time: Res<Time>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    let Ok(mut text) = query.single_mut() else {
        return;
    };

    if let Some(StatusEvent(message)) = events.read().last() {
        text.0 = message.clone();
        timer.0.reset();
        return;
    }

    if timer.0.tick(time.delta()).just_finished() {
        text.0.clear();
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub fn fps_text_update_system(
    diagnostics: Res<bevy::diagnostic::DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    use bevy::diagnostic::FrameTimeDiagnosticsPlugin;

    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
