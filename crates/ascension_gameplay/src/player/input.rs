//! PlayerInput: look orientation, move axis, sprint
//!
//! Host (клавиатура/мышь/геймпад) пишет `move_axis`, `look_delta`, `sprint`;
//! gameplay читает look orientation и running flag.

use bevy::prelude::*;

use crate::actor::Actor;
use crate::cvars::PlayerCVars;

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerInput {
    /// x: вправо, y: вперёд (относительно look yaw), [-1, 1]
    pub move_axis: Vec2,
    /// Накопленная дельта мыши за кадр (сбрасывается системой)
    pub look_delta: Vec2,
    pub sprint: bool,

    pub(crate) yaw: f32,
    pub(crate) pitch: f32,
}

impl PlayerInput {
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Yaw вокруг Z, затем pitch вокруг локальной X
    pub fn look_orientation(&self) -> Quat {
        Quat::from_rotation_z(self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch;
    }

    /// Применяет look_delta: мышь вправо: поворот вправо (yaw уменьшается)
    pub fn apply_look_delta(&mut self, cvars: &PlayerCVars) {
        self.yaw -= self.look_delta.x * cvars.rotation_speed_yaw;
        self.pitch = (self.pitch + self.look_delta.y * cvars.rotation_speed_pitch).clamp(
            cvars.rotation_limits_min_pitch,
            cvars.rotation_limits_max_pitch,
        );
        self.look_delta = Vec2::ZERO;
    }

    /// Respawn: взгляд обнулён, ввод сброшен
    pub fn on_player_respawn(&mut self) {
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.look_delta = Vec2::ZERO;
        self.move_axis = Vec2::ZERO;
        self.sprint = false;
    }
}

/// System: look + sprint → actor
pub fn process_player_input(
    mut query: Query<(&mut PlayerInput, &mut Actor)>,
    cvars: Res<PlayerCVars>,
) {
    for (mut input, mut actor) in query.iter_mut() {
        input.apply_look_delta(&cvars);
        if actor.is_running() != input.sprint {
            actor.set_running(input.sprint);
        }
    }
}
