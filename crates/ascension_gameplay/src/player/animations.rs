//! PlayerAnimations: motion parameters + lifecycle action controller'а
//!
//! Каждый кадр:
//! 1. Из look orientation берём только yaw (corrected orientation)
//! 2. Travel speed / angle из физической скорости, slope: только на земле
//! 3. Параметры пишутся в skeleton character'а
//! 4. Action controller продвигается на frame time
//!
//! Сам контроллер живёт в `ActorMannequin` на том же entity.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use super::input::PlayerInput;
use super::movement::PlayerMovement;
use crate::actor::{compute_motion_parameters, forward_dir, ActorMannequin, ActorMannequinInfo, MotionParameters};
use crate::mannequin::{names, CharacterInstance, MannequinLibrary, MotionParamId, TagId};

/// Скорость, выше которой актор считается идущим (tag MotionMovement)
pub const WALK_SPEED_THRESHOLD: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum AnimationsState {
    #[default]
    Uninitialized,
    Active,
}

#[derive(Component, Debug, Clone)]
pub struct PlayerAnimations {
    state: AnimationsState,
    rotate_tag: TagId,
    walk_tag: TagId,
    /// Последние вычисленные параметры (для debug / тестов)
    pub motion: MotionParameters,
}

impl Default for PlayerAnimations {
    fn default() -> Self {
        Self {
            state: AnimationsState::Uninitialized,
            rotate_tag: TagId::INVALID,
            walk_tag: TagId::INVALID,
            motion: MotionParameters::default(),
        }
    }
}

impl PlayerAnimations {
    pub fn state(&self) -> AnimationsState {
        self.state
    }

    pub fn rotate_tag(&self) -> TagId {
        self.rotate_tag
    }

    pub fn walk_tag(&self) -> TagId {
        self.walk_tag
    }

    /// Модель игрока (пере)загружена: пересобрать controller
    ///
    /// Ошибка загрузки логируется, state остаётся Uninitialized.
    pub fn on_player_model_changed(
        &mut self,
        mannequin: &mut ActorMannequin,
        library: &MannequinLibrary,
        info: &ActorMannequinInfo,
        entity: Entity,
        character: &mut CharacterInstance,
    ) -> bool {
        self.state = AnimationsState::Uninitialized;
        self.rotate_tag = TagId::INVALID;
        self.walk_tag = TagId::INVALID;

        if let Err(err) = mannequin.activate(library, info, entity, character) {
            crate::log_error(&format!("Player {:?}: mannequin init failed: {}", entity, err));
            return false;
        }

        // Tag ids кешируем, чтобы не искать каждый кадр
        self.rotate_tag = mannequin.find_tag(names::MOTION_TURN);
        self.walk_tag = mannequin.find_tag(names::MOTION_MOVEMENT);
        self.state = AnimationsState::Active;
        true
    }

    /// Записывает параметры в skeleton
    pub fn apply_motion(&mut self, motion: MotionParameters, character: &mut CharacterInstance) {
        let skeleton = &mut character.skeleton;
        skeleton.set_desired_motion_param(MotionParamId::TravelSpeed, motion.travel_speed);
        skeleton.set_desired_motion_param(MotionParamId::TravelAngle, motion.travel_angle);
        if let Some(slope) = motion.travel_slope {
            skeleton.set_desired_motion_param(MotionParamId::TravelSlope, slope);
        }
        self.motion = motion;
    }
}

/// System: motion parameters + advance controller
pub fn update_player_animations(
    mut query: Query<(
        &Transform,
        &PlayerInput,
        &PlayerMovement,
        &mut PlayerAnimations,
        &mut ActorMannequin,
        Option<&Velocity>,
        Option<&mut CharacterInstance>,
    )>,
    time: Res<Time>,
) {
    let frame_time = time.delta_secs();

    for (transform, input, movement, mut animations, mut mannequin, velocity, character) in
        query.iter_mut()
    {
        // Без физики или модели параметры не трогаем
        if let (Some(velocity), Some(mut character)) = (velocity, character) {
            let ground_normal = movement.is_on_ground().then(|| movement.ground_normal());
            let motion = compute_motion_parameters(
                forward_dir(transform.rotation),
                velocity.linvel,
                input.look_orientation(),
                ground_normal,
            );
            animations.apply_motion(motion, &mut character);

            let walk_tag = animations.walk_tag;
            mannequin.set_tag(walk_tag, motion.travel_speed > WALK_SPEED_THRESHOLD);
        }

        mannequin.update(frame_time);
    }
}
