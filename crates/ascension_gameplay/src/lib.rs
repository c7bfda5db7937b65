//! Ascension Gameplay
//!
//! Gameplay компоненты third-person action игры на Bevy 0.16 ECS:
//! - cvars: console variables (store + typed snapshots)
//! - mannequin: fragment-based animation actions
//! - actor: alive state, оружие, respawn, spawn points
//! - player: input, movement, view, animations, sword
//!
//! Physics solver, renderer, console UI и skeletal animation: на стороне
//! host'а; компоненты только конфигурируют их и реагируют на них.
//! Мир Z-up, forward entity: локальная +Y.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use std::time::Duration;

// Публичные модули
pub mod actor;
pub mod cvars;
pub mod logger;
pub mod mannequin;
pub mod player;

// Re-export базовых типов для удобства
pub use actor::{
    Actor, ActorMannequin, ActorMannequinInfo, ActorPlugin, AnimEventNotify, CharacterModel,
    EntityClass, EntityReset, Hidden, HostContext, SelectWeaponIntent, SetHealthIntent,
    SpawnPoint, SwordAttackIntent, WeaponType,
};
pub use cvars::{CVarStore, CVarsPlugin, GameCVars, PlayerCVars};
pub use logger::*;
pub use mannequin::{ActionPriority, CharacterInstance, MannequinLibrary};
pub use player::{spawn_player, ActorSystem, Player, PlayerAnimations, PlayerPlugin};

/// Фазы gameplay кадра (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameplaySet {
    /// Регистрация / удаление игроков, reset уровня
    Lifecycle,
    /// SetHealth, оружие, атаки, animation events
    Intents,
    Input,
    Movement,
    /// Motion parameters + advance action controllers
    Animation,
    View,
}

/// Главный plugin (объединяет все подсистемы)
pub struct GameplayPlugin;

impl Plugin for GameplayPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                GameplaySet::Lifecycle,
                GameplaySet::Intents,
                GameplaySet::Input,
                GameplaySet::Movement,
                GameplaySet::Animation,
                GameplaySet::View,
            )
                .chain(),
        )
        .add_plugins((CVarsPlugin, ActorPlugin, PlayerPlugin));
    }
}

/// Frame time headless App (60 Hz)
pub const HEADLESS_FRAME_TIME: f32 = 1.0 / 60.0;

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время тикает фиксированными шагами, чтобы прогоны были воспроизводимы.
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            HEADLESS_FRAME_TIME,
        )));

    app
}
