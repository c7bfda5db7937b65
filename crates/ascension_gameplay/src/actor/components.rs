//! Базовые компоненты акторов: Actor, WeaponType, CharacterModel, Hidden

use bevy::prelude::*;

use super::mannequin::ActorMannequin;
use crate::cvars::PlayerCVars;

/// Max health любого актора (смерти как концепции нет)
pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

/// Оружие в руках актора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum WeaponType {
    #[default]
    NoWeapon,
    Magic,
    Sword,
    Knife,
}

impl WeaponType {
    /// Имя tag'а в группе Weapon (NoWeapon: группа пустая)
    pub fn tag_name(self) -> Option<&'static str> {
        match self {
            WeaponType::NoWeapon => None,
            WeaponType::Magic => Some("Magic"),
            WeaponType::Sword => Some("Sword"),
            WeaponType::Knife => Some("Knife"),
        }
    }
}

/// Актор (игрок или AI): alive state, скорости, оружие
///
/// Инвариант: `health() == 0` ⇔ `!alive`.
/// Спавнится мёртвым; оживает через `SetHealthIntent`.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Transform, ActorMannequin, CharacterModel, ActorMannequinInfo)]
pub struct Actor {
    alive: bool,
    running: bool,
    is_player: bool,
    weapon: WeaponType,

    pub mass: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub turn_speed: f32,
    pub eye_height: f32,
}

impl Default for Actor {
    fn default() -> Self {
        Self {
            alive: false,
            running: false,
            is_player: false,
            weapon: WeaponType::NoWeapon,
            mass: 90.0,
            walk_speed: 1.8,
            run_speed: 3.7,
            turn_speed: 7.0,
            eye_height: 0.935,
        }
    }
}

impl Actor {
    /// Player стартует с Magic в руках
    pub fn player() -> Self {
        let mut actor = Self::default();
        actor.make_player();
        actor
    }

    pub fn make_player(&mut self) {
        self.is_player = true;
        self.weapon = WeaponType::Magic;
    }

    pub fn is_player(&self) -> bool {
        self.is_player
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn health(&self) -> f32 {
        if self.alive {
            self.max_health()
        } else {
            0.0
        }
    }

    pub fn max_health(&self) -> f32 {
        DEFAULT_MAX_HEALTH
    }

    /// Переводит в alive. false если уже жив (respawn no-op).
    ///
    /// Значение health не учитывается: SetHealth(0) тоже оживляет.
    pub fn revive(&mut self) -> bool {
        if self.alive {
            return false;
        }
        self.alive = true;
        true
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn move_speed(&self) -> f32 {
        if self.running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    pub fn turn_speed(&self) -> f32 {
        self.turn_speed
    }

    pub fn weapon_type(&self) -> WeaponType {
        self.weapon
    }

    /// Меняет оружие. true если смена реально произошла (или forced).
    pub fn select_weapon(&mut self, weapon: WeaponType, force: bool) -> bool {
        if !force && self.weapon == weapon {
            return false;
        }
        self.weapon = weapon;
        true
    }

    /// Синхронизация с pl_* cvars (cvars живые, читаются каждый кадр)
    pub fn apply_player_cvars(&mut self, cvars: &PlayerCVars) {
        self.mass = cvars.mass;
        self.walk_speed = cvars.walk_speed;
        self.run_speed = cvars.run_speed;
        self.turn_speed = cvars.turn_speed;
        self.eye_height = cvars.eye_height;
    }
}

/// Geometry актора (character model path)
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterModel {
    pub geometry: String,
}

impl CharacterModel {
    pub fn new(geometry: impl Into<String>) -> Self {
        Self {
            geometry: geometry.into(),
        }
    }
}

/// Какие mannequin данные использует актор
#[derive(Component, Debug, Clone, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ActorMannequinInfo {
    pub context: String,
    pub database: String,
    pub controller_definition: String,
}

impl ActorMannequinInfo {
    pub fn from_player_cvars(cvars: &PlayerCVars) -> Self {
        Self {
            context: cvars.mannequin_context.clone(),
            database: cvars.animation_database.clone(),
            controller_definition: cvars.controller_definition.clone(),
        }
    }
}

/// Entity скрыт (editor прячет актора до старта игры)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Hidden;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_follows_alive_state() {
        let mut actor = Actor::default();
        assert!(!actor.is_alive());
        assert_eq!(actor.health(), 0.0);

        assert!(actor.revive());
        assert_eq!(actor.health(), actor.max_health());
        assert_eq!(actor.health(), DEFAULT_MAX_HEALTH);

        // Повторный revive: no-op
        assert!(!actor.revive());
        assert!(actor.is_alive());
    }

    #[test]
    fn test_move_speed_follows_running() {
        let mut actor = Actor::default();
        assert_eq!(actor.move_speed(), 1.8);

        actor.set_running(true);
        assert!(actor.is_running());
        assert_eq!(actor.move_speed(), 3.7);
    }

    #[test]
    fn test_select_weapon_change_detection() {
        let mut actor = Actor::player();
        assert_eq!(actor.weapon_type(), WeaponType::Magic);

        assert!(!actor.select_weapon(WeaponType::Magic, false));
        assert!(actor.select_weapon(WeaponType::Magic, true));
        assert!(actor.select_weapon(WeaponType::Sword, false));
        assert_eq!(actor.weapon_type(), WeaponType::Sword);
    }

    #[test]
    fn test_apply_player_cvars() {
        let mut actor = Actor::player();
        let cvars = PlayerCVars {
            walk_speed: 2.0,
            run_speed: 5.0,
            ..default()
        };

        actor.apply_player_cvars(&cvars);
        actor.set_running(true);
        assert_eq!(actor.move_speed(), 5.0);
        assert_eq!(actor.mass, 90.0);
    }

    #[test]
    fn test_weapon_tag_names() {
        assert_eq!(WeaponType::NoWeapon.tag_name(), None);
        assert_eq!(WeaponType::Sword.tag_name(), Some("Sword"));
    }
}
