//! Actor systems: respawn, оружие, animation events, move actions

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use super::components::{Actor, ActorMannequinInfo, CharacterModel, Hidden, WeaponType};
use super::events::{AnimEventNotify, SelectWeaponIntent, SetHealthIntent};
use super::mannequin::ActorMannequin;
use super::motion::{planar_direction, yaw_of};
use super::physics::living_body;
use super::spawn::{select_spawn_point, EntityClass, HostContext, SpawnPoint};
use crate::mannequin::{
    names, ActionKind, ActionPriority, CharacterInstance, MannequinLibrary, MotionParamId, TagState,
};
use crate::player::{PlayerAnimations, PlayerInput};

type SpawnCandidates<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static EntityClass, Option<&'static SpawnPoint>, &'static Transform),
    Without<Actor>,
>;

/// System: SetHealthIntent → spawn point + respawn
///
/// Порядок respawn: alive → unhide → identity rotation → model →
/// mannequin → physicalize. Живой актор только переставляется на spawn point.
pub fn process_set_health(
    mut commands: Commands,
    mut events: EventReader<SetHealthIntent>,
    mut actors: Query<(
        &mut Actor,
        &mut Transform,
        &mut ActorMannequin,
        &CharacterModel,
        &ActorMannequinInfo,
        Option<&mut PlayerAnimations>,
        Option<&mut PlayerInput>,
    )>,
    spawn_points: SpawnCandidates,
    library: Res<MannequinLibrary>,
    host: Res<HostContext>,
) {
    for event in events.read() {
        let entity = event.entity;
        let Ok((mut actor, mut transform, mut mannequin, model, info, animations, input)) =
            actors.get_mut(entity)
        else {
            crate::log_warning(&format!("SetHealth: {:?} is not an actor", entity));
            continue;
        };

        // Spawn point выбирается даже для живого актора
        if !host.editor {
            if let Some((spawn_entity, spawner, spawn_transform)) =
                select_spawn_point(spawn_points.iter())
            {
                spawner.spawn_entity(spawn_transform, &mut transform);
                crate::log(&format!("{:?} moved to spawn point {:?}", entity, spawn_entity));
            }
        }

        if !actor.revive() {
            continue;
        }

        transform.rotation = Quat::IDENTITY;
        transform.scale = Vec3::ONE;

        let mut character = CharacterInstance::load(model.geometry.clone());

        match animations {
            Some(mut animations) => {
                animations.on_player_model_changed(
                    &mut mannequin,
                    &library,
                    info,
                    entity,
                    &mut character,
                );
            }
            None => {
                if let Err(err) = mannequin.activate(&library, info, entity, &mut character) {
                    crate::log_error(&format!("Actor {:?}: mannequin init failed: {}", entity, err));
                }
            }
        }

        // Оружие заново выставляет tag group в свежем контексте
        mannequin.set_weapon_tag(actor.weapon_type());

        commands
            .entity(entity)
            .remove::<Hidden>()
            .insert((character, living_body(actor.mass, actor.eye_height)));

        if let Some(mut input) = input {
            input.on_player_respawn();
        }

        crate::log_info(&format!(
            "Actor {:?} respawned (health {} requested, {})",
            entity,
            event.health,
            if mannequin.is_active() { "animated" } else { "un-animated" }
        ));
    }
}

/// Fragment, который играется при смене оружия
pub fn weapon_fragment(weapon: WeaponType) -> &'static str {
    if weapon == WeaponType::Sword {
        names::SELECT_SWORD
    } else {
        names::DESELECT_SWORD
    }
}

/// System: SelectWeaponIntent → tag group + SelectSword/DeSelectSword
pub fn process_weapon_selection(
    mut events: EventReader<SelectWeaponIntent>,
    mut actors: Query<(&mut Actor, &mut ActorMannequin)>,
) {
    for event in events.read() {
        let Ok((mut actor, mut mannequin)) = actors.get_mut(event.entity) else {
            continue;
        };

        if !actor.select_weapon(event.weapon, event.force) {
            continue;
        }

        mannequin.set_weapon_tag(event.weapon);
        mannequin.play_fragment_by_name(
            weapon_fragment(event.weapon),
            ActionPriority::Sword,
            TagState::EMPTY,
        );

        crate::log(&format!("{:?} selected {:?}", event.entity, event.weapon));
    }
}

/// System: animation events → installed action
pub fn process_anim_events(
    mut events: EventReader<AnimEventNotify>,
    mut actors: Query<&mut ActorMannequin>,
) {
    for event in events.read() {
        let Ok(mut mannequin) = actors.get_mut(event.entity) else {
            continue;
        };
        if let Some(controller) = mannequin.controller_mut() {
            controller.on_animation_event(&event.character, event.event.clone());
        }
    }
}

/// Кратчайшая разница углов в [-π, π]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + std::f32::consts::PI).rem_euclid(std::f32::consts::TAU);
    wrapped - std::f32::consts::PI
}

/// Yaw, при котором forward (+Y) смотрит вдоль `direction`
pub fn yaw_towards(direction: Vec3) -> f32 {
    (-direction.x).atan2(direction.y)
}

/// System: installed move action поворачивает актора к направлению движения
///
/// Обычный move: с turn_speed, forced: сразу.
pub fn update_move_actions(
    mut actors: Query<(
        &Actor,
        &ActorMannequin,
        &mut Transform,
        &Velocity,
        Option<&mut CharacterInstance>,
    )>,
    time: Res<Time>,
) {
    let delta = time.delta_secs();

    for (actor, mannequin, mut transform, velocity, character) in actors.iter_mut() {
        let Some(action) = mannequin.controller().and_then(|c| c.installed()) else {
            continue;
        };
        let ActionKind::Move { rotation_forced } = action.kind else {
            continue;
        };

        let direction = planar_direction(velocity.linvel);
        if direction == Vec3::ZERO {
            continue;
        }

        let current = yaw_of(transform.rotation);
        let turn = wrap_angle(yaw_towards(direction) - current);
        let step = if rotation_forced {
            turn
        } else {
            let max_step = actor.turn_speed() * delta;
            turn.clamp(-max_step, max_step)
        };

        transform.rotation = Quat::from_rotation_z(current + step);

        if let Some(mut character) = character {
            character
                .skeleton
                .set_desired_motion_param(MotionParamId::TurnAngle, turn - step);
        }
    }
}

/// System: controllers не-игроков (игроков двигает PlayerAnimations)
pub fn advance_actor_controllers(
    mut actors: Query<&mut ActorMannequin, (With<Actor>, Without<PlayerAnimations>)>,
    time: Res<Time>,
) {
    let frame_time = time.delta_secs();
    for mut mannequin in actors.iter_mut() {
        mannequin.update(frame_time);
    }
}
