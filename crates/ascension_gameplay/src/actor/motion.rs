//! Motion math: travel speed / angle / slope
//!
//! Мир Z-up, forward entity: локальная +Y. Углы в радианах.

use bevy::prelude::*;

pub const WORLD_UP: Vec3 = Vec3::Z;

/// Per-frame параметры для blend spaces (не сохраняются)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct MotionParameters {
    pub travel_speed: f32,
    pub travel_angle: f32,
    /// None пока актор в воздухе
    pub travel_slope: Option<f32>,
}

/// Forward direction entity (локальная +Y)
pub fn forward_dir(rotation: Quat) -> Vec3 {
    rotation * Vec3::Y
}

/// Yaw (вокруг Z) ориентации
pub fn yaw_of(rotation: Quat) -> f32 {
    let (yaw, _pitch, _roll) = rotation.to_euler(EulerRot::ZXY);
    yaw
}

/// Ориентация только с yaw: pitch и roll обнулены
pub fn yaw_only(rotation: Quat) -> Quat {
    Quat::from_rotation_z(yaw_of(rotation))
}

/// Скорость в горизонтальной плоскости
pub fn planar_speed(velocity: Vec3) -> f32 {
    velocity.truncate().length()
}

/// Нормализованное горизонтальное направление; ноль для нулевой скорости
pub fn planar_direction(velocity: Vec3) -> Vec3 {
    velocity.truncate().normalize_or_zero().extend(0.0)
}

/// Знаковый угол от `forward` к `velocity` в плоскости XY
///
/// Положительный: движение вправо от forward. Нулевые векторы дают 0.
pub fn travel_angle(forward: Vec3, velocity: Vec3) -> f32 {
    let f = forward.truncate().normalize_or_zero();
    let v = velocity.truncate().normalize_or_zero();
    if f == Vec2::ZERO || v == Vec2::ZERO {
        return 0.0;
    }

    let cross = v.x * f.y - v.y * f.x;
    let dot = f.dot(v);
    cross.atan2(dot)
}

/// Уклон поверхности под актором относительно его yaw-ориентации
///
/// Нормаль переводится в локальный frame, боковая (x) составляющая
/// отбрасывается; знак берётся из x-компоненты `up × normal`.
pub fn travel_slope(ground_normal: Vec3, corrected_orientation: Quat) -> f32 {
    let mut normal = corrected_orientation.inverse() * ground_normal;
    normal.x = 0.0;

    let cosine = WORLD_UP.dot(normal);
    let sine = WORLD_UP.cross(normal);

    (sine.x.signum_or_zero() * sine.length()).atan2(cosine)
}

/// Все три параметра за кадр
pub fn compute_motion_parameters(
    forward: Vec3,
    velocity: Vec3,
    look_orientation: Quat,
    ground_normal: Option<Vec3>,
) -> MotionParameters {
    let corrected = yaw_only(look_orientation);

    MotionParameters {
        travel_speed: planar_speed(velocity),
        travel_angle: travel_angle(forward, velocity),
        travel_slope: ground_normal.map(|normal| travel_slope(normal, corrected)),
    }
}

trait SignumOrZero {
    fn signum_or_zero(self) -> f32;
}

impl SignumOrZero for f32 {
    fn signum_or_zero(self) -> f32 {
        if self > 0.0 {
            1.0
        } else if self < 0.0 {
            -1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const EPS: f32 = 1e-5;

    #[test]
    fn test_travel_angle_example() {
        let params = compute_motion_parameters(
            Vec3::Y,
            Vec3::new(3.0, 0.0, 0.0),
            Quat::IDENTITY,
            None,
        );

        assert!((params.travel_speed - 3.0).abs() < EPS);
        assert!((params.travel_angle - FRAC_PI_2).abs() < EPS);
        assert_eq!(params.travel_slope, None);
    }

    #[test]
    fn test_travel_angle_sign() {
        assert!((travel_angle(Vec3::Y, Vec3::new(-2.0, 0.0, 0.0)) + FRAC_PI_2).abs() < EPS);
        assert!(travel_angle(Vec3::Y, Vec3::new(0.0, 4.0, 0.0)).abs() < EPS);
        assert!((travel_angle(Vec3::Y, Vec3::new(1.0, 1.0, 0.0)) - FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_zero_velocity_is_finite() {
        let params = compute_motion_parameters(Vec3::Y, Vec3::ZERO, Quat::IDENTITY, Some(WORLD_UP));

        assert_eq!(params.travel_speed, 0.0);
        assert_eq!(params.travel_angle, 0.0);
        assert!(params.travel_angle.is_finite());
        assert_eq!(planar_direction(Vec3::ZERO), Vec3::ZERO);
    }

    #[test]
    fn test_vertical_velocity_ignored_by_speed() {
        assert!((planar_speed(Vec3::new(3.0, 4.0, -9.0)) - 5.0).abs() < EPS);
        assert_eq!(travel_angle(Vec3::Y, Vec3::new(0.0, 0.0, -9.8)), 0.0);
    }

    #[test]
    fn test_flat_ground_has_zero_slope() {
        assert!(travel_slope(WORLD_UP, Quat::IDENTITY).abs() < EPS);
    }

    #[test]
    fn test_uphill_slope_is_positive() {
        // Склон поднимается по +Y: нормаль наклонена к -Y
        let normal = Vec3::new(0.0, -1.0, 1.0).normalize();
        let slope = travel_slope(normal, Quat::IDENTITY);
        assert!((slope - FRAC_PI_4).abs() < EPS);

        // Развернулись на 180°: тот же склон вниз
        let turned = Quat::from_rotation_z(std::f32::consts::PI);
        assert!((travel_slope(normal, turned) + FRAC_PI_4).abs() < EPS);
    }

    #[test]
    fn test_side_slope_is_ignored() {
        let normal = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!(travel_slope(normal, Quat::IDENTITY).abs() < EPS);
    }

    #[test]
    fn test_yaw_only_drops_pitch_and_roll() {
        let look = Quat::from_rotation_z(0.7) * Quat::from_rotation_x(0.4);
        let corrected = yaw_only(look);

        assert!((yaw_of(corrected) - 0.7).abs() < EPS);
        let forward = forward_dir(corrected);
        assert!(forward.z.abs() < EPS);
    }
}
