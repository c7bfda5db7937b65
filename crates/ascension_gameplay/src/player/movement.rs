//! PlayerMovement: контакт с землёй + желаемая скорость
//!
//! Ground contact пишет host (physics solver внешний), мы только
//! храним его для slope и решаем, можно ли управлять скоростью.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;

use super::input::PlayerInput;
use crate::actor::{yaw_only, Actor, WORLD_UP};

#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PlayerMovement {
    on_ground: bool,
    ground_normal: Vec3,
}

impl Default for PlayerMovement {
    fn default() -> Self {
        Self {
            on_ground: false,
            ground_normal: WORLD_UP,
        }
    }
}

impl PlayerMovement {
    pub fn is_on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn ground_normal(&self) -> Vec3 {
        self.ground_normal
    }

    /// Some(normal): стоим на поверхности, None: в воздухе
    pub fn set_ground_contact(&mut self, normal: Option<Vec3>) {
        match normal {
            Some(normal) => {
                let normal = normal.normalize_or_zero();
                self.on_ground = true;
                self.ground_normal = if normal == Vec3::ZERO { WORLD_UP } else { normal };
            }
            None => {
                self.on_ground = false;
                self.ground_normal = WORLD_UP;
            }
        }
    }

    /// Желаемая горизонтальная скорость из move axis и look yaw
    pub fn desired_velocity(input: &PlayerInput, move_speed: f32) -> Vec3 {
        let axis = input.move_axis.clamp_length_max(1.0);
        if axis == Vec2::ZERO {
            return Vec3::ZERO;
        }
        let local = Vec3::new(axis.x, axis.y, 0.0);
        yaw_only(input.look_orientation()) * local * move_speed
    }
}

/// System: input → rapier Velocity (только на земле, z не трогаем)
pub fn apply_player_movement(
    mut query: Query<(&PlayerInput, &PlayerMovement, &Actor, &mut Velocity)>,
) {
    for (input, movement, actor, mut velocity) in query.iter_mut() {
        if !actor.is_alive() || !movement.is_on_ground() {
            continue;
        }

        let desired = PlayerMovement::desired_velocity(input, actor.move_speed());
        velocity.linvel.x = desired.x;
        velocity.linvel.y = desired.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_contact() {
        let mut movement = PlayerMovement::default();
        assert!(!movement.is_on_ground());

        movement.set_ground_contact(Some(Vec3::new(0.0, -2.0, 2.0)));
        assert!(movement.is_on_ground());
        assert!((movement.ground_normal().length() - 1.0).abs() < 1e-6);

        movement.set_ground_contact(None);
        assert!(!movement.is_on_ground());
        assert_eq!(movement.ground_normal(), WORLD_UP);
    }

    #[test]
    fn test_desired_velocity_follows_look_yaw() {
        let mut input = PlayerInput {
            move_axis: Vec2::new(0.0, 1.0),
            ..default()
        };
        let v = PlayerMovement::desired_velocity(&input, 2.0);
        assert!((v - Vec3::new(0.0, 2.0, 0.0)).length() < 1e-5);

        // Повернули взгляд на 90° влево: forward теперь -X
        input.set_look(std::f32::consts::FRAC_PI_2, 0.7);
        let v = PlayerMovement::desired_velocity(&input, 2.0);
        assert!((v - Vec3::new(-2.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_diagonal_input_is_not_faster() {
        let input = PlayerInput {
            move_axis: Vec2::new(1.0, 1.0),
            ..default()
        };
        let v = PlayerMovement::desired_velocity(&input, 3.0);
        assert!((v.length() - 3.0).abs() < 1e-5);
    }
}
