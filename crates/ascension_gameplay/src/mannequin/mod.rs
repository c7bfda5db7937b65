//! Mannequin: fragment-based animation actions
//!
//! Содержит:
//! - tags: ids, name tables, TagState bitset
//! - library: ControllerDef, AnimationDatabase, MannequinLibrary (Resource)
//! - action / controller: очередь actions, priority, force-finish
//! - skeleton: CharacterInstance + motion parameters
//!
//! Реальный skeletal blending: на стороне host'а; здесь только
//! состояние, которое gameplay конфигурирует и читает.

pub mod action;
pub mod controller;
pub mod library;
pub mod skeleton;
pub mod tags;

#[cfg(test)]
mod controller_tests;

pub use action::{
    Action, ActionId, ActionKind, ActionPriority, ActionStatus, AnimEventInstance,
};
pub use controller::{ActionController, AnimationContext, ScopeBinding};
pub use library::{
    AnimationDatabase, ControllerDef, FragmentVariant, MannequinError, MannequinLibrary,
};
pub use skeleton::{CharacterInstance, MotionParamId, SkeletonAnim};
pub use tags::{
    FragmentId, ScopeContextId, TagDefinition, TagEntry, TagGroupId, TagId, TagState,
};

/// Имена fragments/tags, на которые опирается gameplay
pub mod names {
    pub const MOTION_IDLE: &str = "MotionIdle";
    pub const MOTION_TURN: &str = "MotionTurn";
    pub const MOTION_MOVEMENT: &str = "MotionMovement";
    pub const SELECT_SWORD: &str = "SelectSword";
    pub const DESELECT_SWORD: &str = "DeSelectSword";
    pub const SWORD_ATTACK: &str = "Attack";
    pub const WEAPON_GROUP: &str = "Weapon";
}
