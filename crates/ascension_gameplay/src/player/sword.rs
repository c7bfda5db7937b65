//! PlayerSword: атака мечом
//!
//! Атака длится pl_attackDuration; новая атака во время текущей
//! игнорируется. Доступна только с Sword в руках.

use bevy::prelude::*;

use crate::actor::{Actor, ActorMannequin, SwordAttackIntent, WeaponType};
use crate::cvars::GameCVars;
use crate::mannequin::{names, ActionPriority, TagState};

#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerSword {
    attack_remaining: f32,
    attack_count: u32,
}

impl PlayerSword {
    pub fn is_attacking(&self) -> bool {
        self.attack_remaining > 0.0
    }

    pub fn attack_count(&self) -> u32 {
        self.attack_count
    }

    /// Начинает атаку. false если предыдущая ещё идёт.
    pub fn attack(&mut self, duration: f32) -> bool {
        if self.is_attacking() {
            return false;
        }
        self.attack_remaining = duration.max(0.0);
        self.attack_count += 1;
        true
    }

    pub fn tick(&mut self, delta: f32) {
        self.attack_remaining = (self.attack_remaining - delta).max(0.0);
    }
}

/// System: SwordAttackIntent → атака (только с Sword)
pub fn process_sword_attacks(
    mut events: EventReader<SwordAttackIntent>,
    mut query: Query<(&Actor, &mut PlayerSword, &mut ActorMannequin)>,
    cvars: Res<GameCVars>,
) {
    for event in events.read() {
        let Ok((actor, mut sword, mut mannequin)) = query.get_mut(event.entity) else {
            continue;
        };

        if actor.weapon_type() != WeaponType::Sword {
            crate::log(&format!(
                "Sword attack ignored for {:?}: weapon is {:?}",
                event.entity,
                actor.weapon_type()
            ));
            continue;
        }

        if sword.attack(cvars.attack_duration) {
            mannequin.play_fragment_by_name(names::SWORD_ATTACK, ActionPriority::Sword, TagState::EMPTY);
        }
    }
}

/// System: тикаем таймеры атак
pub fn tick_sword_attacks(mut query: Query<&mut PlayerSword>, time: Res<Time>) {
    let delta = time.delta_secs();
    for mut sword in query.iter_mut() {
        if sword.is_attacking() {
            sword.tick(delta);
        }
    }
}
