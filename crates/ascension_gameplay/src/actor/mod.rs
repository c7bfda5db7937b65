//! Actor domain: игрок и AI акторы
//!
//! Содержит:
//! - Actor (alive state, скорости, оружие)
//! - ActorMannequin (convenience layer над action controller)
//! - spawn points, physicalize, motion math
//! - systems: respawn, weapon selection, animation events, move actions

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod mannequin;
pub mod motion;
pub mod physics;
pub mod spawn;
pub mod systems;


pub use components::*;
pub use events::{AnimEventNotify, EntityReset, SelectWeaponIntent, SetHealthIntent, SwordAttackIntent};
pub use mannequin::ActorMannequin;
pub use motion::{
    compute_motion_parameters, forward_dir, planar_direction, planar_speed, travel_angle,
    travel_slope, yaw_of, yaw_only, MotionParameters, WORLD_UP,
};
pub use physics::living_body;
pub use spawn::{select_spawn_point, spawn_spawn_point, EntityClass, HostContext, SpawnPoint, SPAWN_POINT_CLASS};
pub use systems::weapon_fragment;

use crate::GameplaySet;

/// Actor Plugin
///
/// Порядок выполнения:
/// 1. Intents: SetHealth (respawn) → SelectWeapon → animation events
/// 2. Movement: поворот акторов под installed move action
/// 3. Animation: advance controllers не-игроков
pub struct ActorPlugin;

impl Plugin for ActorPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SetHealthIntent>()
            .add_event::<SelectWeaponIntent>()
            .add_event::<SwordAttackIntent>()
            .add_event::<EntityReset>()
            .add_event::<AnimEventNotify>();

        app.init_resource::<HostContext>()
            .init_resource::<crate::mannequin::MannequinLibrary>()
            .register_type::<Actor>()
            .register_type::<CharacterModel>()
            .register_type::<ActorMannequinInfo>()
            .register_type::<EntityClass>()
            .register_type::<SpawnPoint>();

        app.add_systems(
            Update,
            (
                systems::process_set_health,
                systems::process_weapon_selection,
                systems::process_anim_events,
            )
                .chain()
                .in_set(GameplaySet::Intents),
        );

        app.add_systems(Update, systems::update_move_actions.in_set(GameplaySet::Movement));
        app.add_systems(
            Update,
            systems::advance_actor_controllers.in_set(GameplaySet::Animation),
        );
    }
}
