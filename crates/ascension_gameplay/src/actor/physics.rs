//! Physicalize: rigid body живого актора
//!
//! Rapier здесь только словарь компонентов: solver крутит host.
//! Collider: вертикальный цилиндр (мир Z-up), поднят над pivot'ом ног.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use std::f32::consts::FRAC_PI_2;

pub const BODY_RADIUS: f32 = 0.45;
pub const BODY_OFFSET: f32 = 1.0;

/// Bundle компонентов physicalized актора
pub fn living_body(mass: f32, eye_height: f32) -> impl Bundle {
    // Cylinder в rapier вдоль Y: поворачиваем на Z
    let cylinder = Collider::compound(vec![(
        Vec3::new(0.0, 0.0, BODY_OFFSET),
        Quat::from_rotation_x(FRAC_PI_2),
        Collider::cylinder(eye_height * 0.5, BODY_RADIUS),
    )]);

    (
        RigidBody::Dynamic,
        cylinder,
        LockedAxes::ROTATION_LOCKED,
        AdditionalMassProperties::Mass(mass),
        Velocity::zero(),
    )
}
