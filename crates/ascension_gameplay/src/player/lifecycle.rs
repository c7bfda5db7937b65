//! Player lifecycle: init → post-init → ... → removal
//!
//! Init: bind к network replication (host может отказать).
//! PostInit: проверка sibling компонентов, регистрация в ActorSystem,
//! pl_* cvars вместе с первым игроком, geometry/mannequin из cvars.
//! Removal: unregister; pl_* cvars уходят вместе с последним игроком.

use bevy::prelude::*;
use thiserror::Error;

use super::animations::PlayerAnimations;
use super::input::PlayerInput;
use super::movement::PlayerMovement;
use super::sword::PlayerSword;
use super::view::PlayerView;
use super::Player;
use crate::actor::{yaw_only, Actor, ActorMannequinInfo, CharacterModel, EntityReset, SetHealthIntent};
use crate::cvars::{CVarStore, PlayerCVars};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActorSystemError {
    #[error("network binding rejected for {0:?}")]
    NetworkBindRejected(Entity),

    #[error("player {entity:?} is missing sibling component {component}")]
    MissingSibling {
        entity: Entity,
        component: &'static str,
    },

    #[error("actor {0:?} is already registered")]
    AlreadyRegistered(Entity),
}

/// Реестр игроков + network binding
#[derive(Resource, Debug, Clone)]
pub struct ActorSystem {
    actors: Vec<Entity>,
    bound: Vec<Entity>,
    /// false: host отказывает в binding (сервер не готов, лимит)
    pub network_accepting: bool,
}

impl Default for ActorSystem {
    fn default() -> Self {
        Self {
            actors: Vec::new(),
            bound: Vec::new(),
            network_accepting: true,
        }
    }
}

impl ActorSystem {
    pub fn bind_to_network(&mut self, entity: Entity) -> Result<(), ActorSystemError> {
        if !self.network_accepting {
            return Err(ActorSystemError::NetworkBindRejected(entity));
        }
        if !self.bound.contains(&entity) {
            self.bound.push(entity);
        }
        Ok(())
    }

    pub fn is_bound(&self, entity: Entity) -> bool {
        self.bound.contains(&entity)
    }

    pub fn add_actor(&mut self, entity: Entity) -> Result<(), ActorSystemError> {
        if self.actors.contains(&entity) {
            return Err(ActorSystemError::AlreadyRegistered(entity));
        }
        self.actors.push(entity);
        Ok(())
    }

    /// Убирает актора и его network binding. false если не был зарегистрирован.
    pub fn remove_actor(&mut self, entity: Entity) -> bool {
        self.bound.retain(|e| *e != entity);
        let before = self.actors.len();
        self.actors.retain(|e| *e != entity);
        self.actors.len() != before
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.actors.contains(&entity)
    }

    pub fn actors(&self) -> &[Entity] {
        &self.actors
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

type SiblingFlags = (
    Has<PlayerInput>,
    Has<PlayerMovement>,
    Has<PlayerView>,
    Has<PlayerAnimations>,
    Has<PlayerSword>,
);

fn verify_siblings(
    entity: Entity,
    (input, movement, view, animations, sword): (bool, bool, bool, bool, bool),
) -> Result<(), ActorSystemError> {
    let checks = [
        (input, "PlayerInput"),
        (movement, "PlayerMovement"),
        (view, "PlayerView"),
        (animations, "PlayerAnimations"),
        (sword, "PlayerSword"),
    ];
    match checks.into_iter().find(|(present, _)| !*present) {
        Some((_, component)) => Err(ActorSystemError::MissingSibling { entity, component }),
        None => Ok(()),
    }
}

/// System: init + post-init только что добавленных игроков
pub fn on_player_added(
    mut players: Query<
        (Entity, &mut Actor, &mut CharacterModel, &mut ActorMannequinInfo, SiblingFlags),
        Added<Player>,
    >,
    mut actor_system: ResMut<ActorSystem>,
    mut store: ResMut<CVarStore>,
    mut player_cvars: ResMut<PlayerCVars>,
) {
    for (entity, mut actor, mut model, mut info, siblings) in players.iter_mut() {
        // Init
        if let Err(err) = actor_system.bind_to_network(entity) {
            crate::log_error(&format!("Player init failed: {}", err));
            continue;
        }

        // PostInit
        if let Err(err) = verify_siblings(entity, siblings) {
            crate::log_error(&format!("Player post-init failed: {}", err));
            continue;
        }
        if let Err(err) = actor_system.add_actor(entity) {
            crate::log_warning(&format!("Player post-init: {}", err));
            continue;
        }

        if actor_system.len() == 1 {
            if let Err(err) = PlayerCVars::register(&mut store) {
                crate::log_error(&format!("Failed to register player cvars: {}", err));
            }
            match PlayerCVars::from_store(&store) {
                Ok(snapshot) => *player_cvars = snapshot,
                Err(err) => crate::log_error(&format!("Player cvars unreadable: {}", err)),
            }
        }

        actor.make_player();
        actor.apply_player_cvars(&player_cvars);
        *model = CharacterModel::new(player_cvars.third_person_geometry.clone());
        *info = ActorMannequinInfo::from_player_cvars(&player_cvars);

        crate::log_info(&format!(
            "Player {:?} registered ({} in actor system)",
            entity,
            actor_system.len()
        ));
    }
}

/// System: removal (despawn или remove::<Player>)
pub fn on_player_removed(
    mut removed: RemovedComponents<Player>,
    mut actor_system: ResMut<ActorSystem>,
    mut store: ResMut<CVarStore>,
) {
    for entity in removed.read() {
        if !actor_system.remove_actor(entity) {
            continue;
        }
        crate::log_info(&format!("Player {:?} unregistered", entity));

        if actor_system.is_empty() {
            let count = PlayerCVars::unregister(&mut store);
            crate::log(&format!("Last player removed, {} player cvars unregistered", count));
        }
    }
}

/// System: скорости игроков следуют pl_* cvars
pub fn sync_player_cvars(
    cvars: Res<PlayerCVars>,
    mut players: Query<&mut Actor, With<Player>>,
    actor_system: Res<ActorSystem>,
) {
    if !cvars.is_changed() || actor_system.is_empty() {
        return;
    }
    for mut actor in players.iter_mut() {
        actor.apply_player_cvars(&cvars);
    }
}

/// System: reset уровня. Старт игры: yaw-only ориентация + respawn.
pub fn process_game_reset(
    mut resets: EventReader<EntityReset>,
    mut players: Query<(Entity, &mut Transform, &Actor), With<Player>>,
    mut set_health: EventWriter<SetHealthIntent>,
) {
    for reset in resets.read() {
        if !reset.game_started {
            continue;
        }

        for (entity, mut transform, actor) in players.iter_mut() {
            transform.rotation = yaw_only(transform.rotation);
            set_health.write(SetHealthIntent {
                entity,
                health: actor.max_health(),
            });
        }
    }
}
