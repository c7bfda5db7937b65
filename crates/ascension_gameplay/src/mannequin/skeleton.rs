//! Character instance: загруженная модель + motion parameters skeleton'а

use bevy::prelude::*;

/// Blend-space параметры, которые пишет gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MotionParamId {
    TravelSpeed,
    TravelAngle,
    TravelSlope,
    TurnAngle,
}

impl MotionParamId {
    const COUNT: usize = 4;

    fn slot(self) -> usize {
        match self {
            MotionParamId::TravelSpeed => 0,
            MotionParamId::TravelAngle => 1,
            MotionParamId::TravelSlope => 2,
            MotionParamId::TurnAngle => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Reflect)]
pub struct SkeletonAnim {
    desired: [Option<f32>; MotionParamId::COUNT],
    /// true: root motion из анимации двигает entity
    animation_driven_motion: bool,
}

impl SkeletonAnim {
    /// Записывает значение как есть; сглаживание: забота animation system
    pub fn set_desired_motion_param(&mut self, id: MotionParamId, value: f32) {
        self.desired[id.slot()] = Some(value);
    }

    pub fn desired_motion_param(&self, id: MotionParamId) -> Option<f32> {
        self.desired[id.slot()]
    }

    pub fn set_animation_driven_motion(&mut self, enabled: bool) {
        self.animation_driven_motion = enabled;
    }

    pub fn is_animation_driven_motion(&self) -> bool {
        self.animation_driven_motion
    }
}

/// Загруженный character (geometry slot 0 актора)
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterInstance {
    pub model: String,
    pub skeleton: SkeletonAnim,
}

impl CharacterInstance {
    /// Свежезагруженная модель: root motion включён, параметров нет
    pub fn load(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            skeleton: SkeletonAnim {
                desired: [None; MotionParamId::COUNT],
                animation_driven_motion: true,
            },
        }
    }
}
