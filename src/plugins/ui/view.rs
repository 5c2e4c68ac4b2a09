//! Render-only HUD text and upgrade picker.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::player::GameOver;
use crate::plugins::upgrades::{PendingUpgrades, UpgradeChosen, UpgradeOffered};

use super::Hud;

#[derive(Component)]
struct StatusText;

#[derive(Component)]
struct PromptText;

const CHOICE_KEYS: [KeyCode; 3] = [KeyCode::Digit1, KeyCode::Digit2, KeyCode::Digit3];

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), setup_ui).add_systems(
        Update,
        (pick_upgrade, announce_offers, announce_game_over, update_status, update_prompt)
            .run_if(in_state(GameState::InGame)),
    );
}

fn setup_ui(mut commands: Commands) {
    commands
        .spawn((
            Name::new("Hud"),
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(10.0),
                top: Val::Px(10.0),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(6.0),
                ..default()
            },
            DespawnOnExit(GameState::InGame),
        ))
        .with_children(|parent| {
            parent.spawn((
                StatusText,
                Text::new(""),
                TextFont { font_size: 22.0, ..default() },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                PromptText,
                Text::new(""),
                TextFont { font_size: 20.0, ..default() },
                TextColor(Color::srgb(0.95, 0.85, 0.4)),
            ));
        });
}

fn update_status(hud: Res<Hud>, mut q_text: Query<&mut Text, With<StatusText>>) {
    if !hud.is_changed() {
        return;
    }
    for mut text in &mut q_text {
        **text = format!(
            "HP {:.0}/{:.0}   Lv {}   XP {}/{}   {}   Kills {}",
            hud.health,
            hud.max_health,
            hud.level,
            hud.xp,
            hud.threshold,
            hud.time_label(),
            hud.kills,
        );
    }
}

fn update_prompt(
    hud: Res<Hud>,
    pending: Res<PendingUpgrades>,
    mut q_text: Query<&mut Text, With<PromptText>>,
) {
    let prompt = if hud.game_over {
        format!("Game over. You survived {}", hud.time_label())
    } else if let Some(offer) = pending.offer() {
        let mut lines = vec![format!("Level {}! Choose an upgrade:", offer.level)];
        lines.extend(
            offer
                .choices
                .iter()
                .enumerate()
                .map(|(i, o)| format!("[{}] {}: {}", i + 1, o.title, o.description)),
        );
        lines.join("\n")
    } else if hud.guided {
        "Press W, A, S and D to begin".to_string()
    } else {
        String::new()
    };

    for mut text in &mut q_text {
        if **text != prompt {
            **text = prompt.clone();
        }
    }
}

fn pick_upgrade(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    pending: Res<PendingUpgrades>,
    mut chosen: MessageWriter<UpgradeChosen>,
) {
    let Some(keys) = keys else {
        return;
    };
    let Some(offer) = pending.offer() else {
        return;
    };
    if let Some(index) = CHOICE_KEYS.iter().position(|k| keys.just_pressed(*k))
        && index < offer.choices.len()
    {
        chosen.write(UpgradeChosen { index });
    }
}

fn announce_offers(mut offered: MessageReader<UpgradeOffered>) {
    for ev in offered.read() {
        let titles: Vec<&str> = ev.choices.iter().map(|o| o.title).collect();
        info!("Level {} offer: {}", ev.level, titles.join(", "));
    }
}

fn announce_game_over(mut game_over: MessageReader<GameOver>) {
    for ev in game_over.read() {
        info!("Survived {:.1}s", ev.survived_secs);
    }
}
