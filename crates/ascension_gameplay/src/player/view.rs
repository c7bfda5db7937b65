//! PlayerView: third-person камера
//!
//! Камера = точка глаз (eye height над pivot'ом) + view offset,
//! повёрнутый look orientation'ом. Коллизию камеры считает host
//! (cam_collider* cvars лежат в GameCVars).

use bevy::prelude::*;

use super::input::PlayerInput;
use crate::actor::{Actor, WORLD_UP};
use crate::cvars::GameCVars;

#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PlayerView {
    /// World transform камеры (результат последнего update)
    pub camera: Transform,
    pub near_plane: f32,
}

impl PlayerView {
    pub fn compute_camera(
        pivot: Vec3,
        eye_height: f32,
        look_orientation: Quat,
        view_offset: Vec3,
    ) -> Transform {
        let eye = pivot + WORLD_UP * eye_height;
        Transform::from_translation(eye + look_orientation * view_offset)
            .with_rotation(look_orientation)
    }
}

/// System: камера следует за игроком
pub fn update_player_view(
    mut query: Query<(&Transform, &Actor, &PlayerInput, &mut PlayerView)>,
    cvars: Res<GameCVars>,
) {
    for (transform, actor, input, mut view) in query.iter_mut() {
        view.camera = PlayerView::compute_camera(
            transform.translation,
            actor.eye_height,
            input.look_orientation(),
            cvars.view_offset,
        );
        view.near_plane = cvars.near_plane;
    }
}
