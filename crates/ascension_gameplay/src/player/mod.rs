//! Player: Actor, которым управляет человек
//!
//! Sibling компоненты (required): input, movement, view, animations, sword.
//! Lifecycle и actor system: в `lifecycle`.

use bevy::prelude::*;

pub mod animations;
pub mod input;
pub mod lifecycle;
pub mod movement;
pub mod sword;
pub mod view;


pub use animations::{update_player_animations, AnimationsState, PlayerAnimations};
pub use input::PlayerInput;
pub use lifecycle::{ActorSystem, ActorSystemError};
pub use movement::PlayerMovement;
pub use sword::PlayerSword;
pub use view::PlayerView;

use crate::actor::{Actor, Hidden};
use crate::GameplaySet;

/// Marker component для player-controlled актора
///
/// Акторы БЕЗ этого компонента: AI (или просто декорации).
/// Sibling компоненты добавляются автоматически как required components.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Actor, PlayerInput, PlayerMovement, PlayerView, PlayerAnimations, PlayerSword)]
pub struct Player;

/// Spawn helper: мёртвый, скрытый player (оживает через SetHealthIntent)
pub fn spawn_player(commands: &mut Commands, transform: Transform) -> Entity {
    commands
        .spawn((Player, Actor::player(), transform, Hidden))
        .id()
}

/// Player Plugin
///
/// Порядок выполнения:
/// 1. Lifecycle: removal → post-init → cvars sync → game reset
/// 2. Intents: sword attack (после смены оружия)
/// 3. Input: look + sprint
/// 4. Movement: input → velocity
/// 5. Animation: motion parameters + controller, sword timers
/// 6. View: камера
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActorSystem>()
            .register_type::<PlayerInput>()
            .register_type::<PlayerMovement>()
            .register_type::<PlayerView>()
            .register_type::<PlayerSword>();

        app.add_systems(
            Update,
            (
                lifecycle::on_player_removed,
                lifecycle::on_player_added,
                lifecycle::sync_player_cvars,
                lifecycle::process_game_reset,
            )
                .chain()
                .in_set(GameplaySet::Lifecycle),
        );

        app.add_systems(
            Update,
            sword::process_sword_attacks
                .after(crate::actor::systems::process_weapon_selection)
                .in_set(GameplaySet::Intents),
        );
        app.add_systems(Update, input::process_player_input.in_set(GameplaySet::Input));
        app.add_systems(
            Update,
            movement::apply_player_movement
                .before(crate::actor::systems::update_move_actions)
                .in_set(GameplaySet::Movement),
        );
        app.add_systems(
            Update,
            (animations::update_player_animations, sword::tick_sword_attacks)
                .in_set(GameplaySet::Animation),
        );
        app.add_systems(Update, view::update_player_view.in_set(GameplaySet::View));
    }
}
