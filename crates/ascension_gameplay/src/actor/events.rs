//! Actor events

use bevy::prelude::*;

use super::components::WeaponType;
use crate::mannequin::AnimEventInstance;

/// Event: выставить health (на практике: respawn)
///
/// Любое значение оживляет мёртвого актора, живой игнорирует.
#[derive(Event, Debug, Clone)]
pub struct SetHealthIntent {
    pub entity: Entity,
    pub health: f32,
}

/// Event: сменить оружие
#[derive(Event, Debug, Clone)]
pub struct SelectWeaponIntent {
    pub entity: Entity,
    pub weapon: WeaponType,
    pub force: bool,
}

/// Event: удар мечом (игрок)
#[derive(Event, Debug, Clone)]
pub struct SwordAttackIntent {
    pub entity: Entity,
}

/// Event: reset уровня (editor game mode on/off)
///
/// `game_started == true`: игра началась, акторы respawn'ятся.
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityReset {
    pub game_started: bool,
}

/// Event: animation event от character instance
#[derive(Event, Debug, Clone)]
pub struct AnimEventNotify {
    pub entity: Entity,
    pub character: String,
    pub event: AnimEventInstance,
}
