//! ActionController: очередь и проигрывание animation actions
//!
//! Модель:
//! - `queue` добавляет Pending action; fragment ничего не отменяет
//! - `update(dt)` завершает истёкшие actions и устанавливает
//!   pending action с наибольшим priority, если installed уступает
//! - прерванный interruptible action (idle) возвращается в очередь
//! - installed action пересчитывает fragment variant при смене tag state
//! - новый Move/Movement request заменяет pending request того же вида

use bevy::prelude::*;
use std::sync::Arc;

use super::action::{
    Action, ActionId, ActionKind, ActionPriority, ActionStatus, AnimEventInstance,
};
use super::library::{AnimationDatabase, ControllerDef};
use super::tags::{FragmentId, ScopeContextId, TagGroupId, TagId, TagState};

/// Animation context: definition + текущий tag state
#[derive(Debug, Clone)]
pub struct AnimationContext {
    pub controller_def: Arc<ControllerDef>,
    pub state: TagState,
}

impl AnimationContext {
    pub fn new(controller_def: Arc<ControllerDef>) -> Self {
        Self {
            controller_def,
            state: TagState::EMPTY,
        }
    }

    pub fn set_tag(&mut self, tag: TagId, on: bool) {
        self.state.set(tag, on);
    }

    /// Выставляет tag внутри группы, остальные tags группы снимаются
    pub fn set_group(&mut self, group: TagGroupId, tag: TagId) {
        if !group.is_valid() || self.controller_def.tags.group_of(tag) != Some(group) {
            return;
        }
        let mask = self.controller_def.tags.group_mask(group);
        self.state = self.state.without(mask);
        self.state.set(tag, true);
    }

    pub fn clear_group(&mut self, group: TagGroupId) {
        let mask = self.controller_def.tags.group_mask(group);
        self.state = self.state.without(mask);
    }
}

/// Привязка scope context к character instance + database
#[derive(Debug, Clone)]
pub struct ScopeBinding {
    pub entity: Entity,
    /// Модель character instance (путь geometry)
    pub character: String,
    pub database: Arc<AnimationDatabase>,
}

#[derive(Debug, Clone)]
pub struct ActionController {
    context: AnimationContext,
    scopes: Vec<Option<ScopeBinding>>,
    pending: Vec<Action>,
    installed: Option<Action>,
    /// Tag state, по которому резолвился клип installed action
    installed_state: TagState,
    next_id: u64,
}

impl ActionController {
    pub fn new(context: AnimationContext) -> Self {
        let scope_count = context.controller_def.scope_contexts.len();
        Self {
            context,
            scopes: vec![None; scope_count],
            pending: Vec::new(),
            installed: None,
            installed_state: TagState::EMPTY,
            next_id: 0,
        }
    }

    pub fn context(&self) -> &AnimationContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AnimationContext {
        &mut self.context
    }

    pub fn controller_def(&self) -> &ControllerDef {
        &self.context.controller_def
    }

    /// Scope context можно перепривязать в любой момент жизни контроллера
    pub fn set_scope_context(&mut self, scope: ScopeContextId, binding: ScopeBinding) -> bool {
        match scope.index().and_then(|i| self.scopes.get_mut(i)) {
            Some(slot) => {
                *slot = Some(binding);
                true
            }
            None => false,
        }
    }

    pub fn scope_binding(&self, scope: ScopeContextId) -> Option<&ScopeBinding> {
        scope.index().and_then(|i| self.scopes.get(i)).and_then(Option::as_ref)
    }

    pub fn queue(
        &mut self,
        kind: ActionKind,
        priority: ActionPriority,
        fragment: FragmentId,
        tags: TagState,
    ) -> ActionId {
        let id = ActionId(self.next_id);
        self.next_id += 1;

        if kind != ActionKind::Fragment {
            let same_kind = std::mem::discriminant(&kind);
            self.pending.retain(|a| std::mem::discriminant(&a.kind) != same_kind);
        }

        self.pending.push(Action::new(id, kind, priority, fragment, tags));
        id
    }

    /// Queue action, который при прерывании возвращается в очередь
    pub fn queue_persistent(
        &mut self,
        priority: ActionPriority,
        fragment: FragmentId,
        tags: TagState,
    ) -> ActionId {
        let id = self.queue(ActionKind::Fragment, priority, fragment, tags);
        if let Some(action) = self.pending.last_mut() {
            action.interruptible = true;
        }
        id
    }

    pub fn installed(&self) -> Option<&Action> {
        self.installed.as_ref()
    }

    pub fn pending(&self) -> impl Iterator<Item = &Action> {
        self.pending.iter()
    }

    /// Installed + pending
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.installed.iter().chain(self.pending.iter())
    }

    pub fn status(&self, id: ActionId) -> Option<ActionStatus> {
        if let Some(action) = self.actions().find(|a| a.id == id) {
            return Some(action.status);
        }
        (id.0 < self.next_id).then_some(ActionStatus::Finished)
    }

    /// Немедленно завершает action. false если id уже не живой.
    pub fn force_finish(&mut self, id: ActionId) -> bool {
        if self.installed.as_ref().is_some_and(|a| a.id == id) {
            self.installed = None;
            return true;
        }

        let before = self.pending.len();
        self.pending.retain(|a| a.id != id);
        self.pending.len() != before
    }

    pub fn update(&mut self, frame_time: f32) {
        // 1. Истёкший installed action завершается
        if let Some(action) = self.installed.as_mut() {
            action.elapsed += frame_time;
            if action.duration.is_some_and(|d| action.elapsed >= d) {
                self.installed = None;
            }
        }

        // 2. Variant installed action под текущие tags
        self.refresh_installed_variant();

        // 3. Лучший pending (max priority, при равенстве: раньше queued)
        let Some(best_index) = self
            .pending
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| a.priority.cmp(&b.priority).then(ib.cmp(ia)))
            .map(|(i, _)| i)
        else {
            return;
        };

        let should_install = match &self.installed {
            None => true,
            Some(current) => current.yields_to(&self.pending[best_index]),
        };
        if !should_install {
            return;
        }

        let mut candidate = self.pending.remove(best_index);

        // Fragment без анимации завершается сразу, installed не трогаем
        self.resolve_clip(&mut candidate);
        if candidate.clip.is_none() {
            crate::log_warning(&format!(
                "Action {:?}: no animation for fragment {:?}",
                candidate.id,
                self.context.controller_def.fragment_ids.name(candidate.fragment)
            ));
            return;
        }

        if let Some(mut interrupted) = self.installed.take() {
            if interrupted.interruptible {
                interrupted.status = ActionStatus::Pending;
                interrupted.elapsed = 0.0;
                interrupted.anim_events.clear();
                self.pending.push(interrupted);
            }
        }

        candidate.status = ActionStatus::Installed;
        self.installed_state = self.resolve_state(&candidate);
        self.installed = Some(candidate);
    }

    /// Forward animation event в installed action, если character привязан
    pub fn on_animation_event(&mut self, character: &str, event: AnimEventInstance) -> bool {
        let bound = self
            .scopes
            .iter()
            .flatten()
            .any(|binding| binding.character == character);
        if !bound {
            return false;
        }

        match self.installed.as_mut() {
            Some(action) => {
                action.anim_events.push(event);
                true
            }
            None => false,
        }
    }

    /// Installed action следует за tag state (idle → locomotion)
    fn refresh_installed_variant(&mut self) {
        let Some(mut action) = self.installed.take() else {
            return;
        };

        let state = self.resolve_state(&action);
        if state != self.installed_state {
            let previous = action.clip.clone();
            self.resolve_clip(&mut action);
            if action.clip != previous {
                action.elapsed = 0.0;
            }
            self.installed_state = state;
        }

        self.installed = Some(action);
    }

    fn resolve_state(&self, action: &Action) -> TagState {
        self.context.state.union(action.tags)
    }

    fn resolve_clip(&self, action: &mut Action) {
        let def = &self.context.controller_def;
        let Some(fragment_name) = def.fragment_ids.name(action.fragment) else {
            return;
        };

        let state = self.resolve_state(action);
        let variant = self
            .scopes
            .iter()
            .flatten()
            .find_map(|binding| binding.database.find_best_match(fragment_name, state, &def.tags));

        if let Some(variant) = variant {
            action.clip = Some(variant.clip.clone());
            action.duration = variant.duration;
        }
    }
}
