//! Actions: запрос проиграть fragment с priority и tag state

use bevy::prelude::*;

use super::tags::{FragmentId, TagState};

/// Priority actions (больше: важнее)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Reflect)]
pub enum ActionPriority {
    #[default]
    Lowest,
    Movement,
    Turn,
    Sword,
    HitReaction,
}

/// Вид action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Просто fragment
    Fragment,
    /// Fragment + поворот entity к направлению движения
    Move { rotation_forced: bool },
    /// Locomotion fragment (ходьба/бег), entity не поворачивает
    Movement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Pending,
    Installed,
    Finished,
}

/// Handle на queued action
///
/// Не владеет action: после rebuild контроллера старые id просто
/// перестают резолвиться.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub u64);

/// Animation event (foot step, weapon trail, ...) от character instance
#[derive(Debug, Clone, PartialEq)]
pub struct AnimEventInstance {
    pub name: String,
    /// Нормализованное время внутри клипа
    pub time: f32,
    pub custom_parameter: Option<String>,
}

impl AnimEventInstance {
    pub fn new(name: impl Into<String>, time: f32) -> Self {
        Self {
            name: name.into(),
            time,
            custom_parameter: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Action {
    pub id: ActionId,
    pub kind: ActionKind,
    pub priority: ActionPriority,
    pub fragment: FragmentId,
    pub tags: TagState,
    pub status: ActionStatus,
    /// При прерывании action возвращается в очередь (idle)
    pub interruptible: bool,
    pub elapsed: f32,
    /// Резолвится при install из animation database
    pub clip: Option<String>,
    pub duration: Option<f32>,
    pub anim_events: Vec<AnimEventInstance>,
}

impl Action {
    pub(crate) fn new(
        id: ActionId,
        kind: ActionKind,
        priority: ActionPriority,
        fragment: FragmentId,
        tags: TagState,
    ) -> Self {
        Self {
            id,
            kind,
            priority,
            fragment,
            tags,
            status: ActionStatus::Pending,
            interruptible: false,
            elapsed: 0.0,
            clip: None,
            duration: None,
            anim_events: Vec::new(),
        }
    }

    pub fn is_looping(&self) -> bool {
        self.duration.is_none()
    }

    pub fn is_move(&self) -> bool {
        matches!(self.kind, ActionKind::Move { .. })
    }

    /// Может ли `candidate` вытеснить этот (installed) action
    pub(crate) fn yields_to(&self, candidate: &Action) -> bool {
        candidate.priority > self.priority
            || (self.is_looping() && candidate.priority >= self.priority)
    }
}
