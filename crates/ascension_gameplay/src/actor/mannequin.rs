//! ActorMannequin: convenience layer над ActionController
//!
//! Все операции: no-op пока контроллера нет (до первого respawn
//! или после неудачной загрузки mannequin данных).

use bevy::prelude::*;

use super::components::{ActorMannequinInfo, WeaponType};
use crate::mannequin::{
    names, ActionController, ActionId, ActionKind, ActionPriority, AnimationContext,
    CharacterInstance, FragmentId, MannequinError, MannequinLibrary, ScopeBinding, TagGroupId,
    TagId, TagState,
};

#[derive(Component, Debug, Clone, Default)]
pub struct ActorMannequin {
    controller: Option<ActionController>,
    last_action: Option<ActionId>,
}

impl ActorMannequin {
    pub fn is_active(&self) -> bool {
        self.controller.is_some()
    }

    pub fn controller(&self) -> Option<&ActionController> {
        self.controller.as_ref()
    }

    pub fn controller_mut(&mut self) -> Option<&mut ActionController> {
        self.controller.as_mut()
    }

    pub fn last_action(&self) -> Option<ActionId> {
        self.last_action
    }

    /// Освобождает контроллер и context (перед respawn)
    pub fn release(&mut self) {
        self.controller = None;
        self.last_action = None;
    }

    /// Полная (пере)инициализация mannequin для загруженного character
    ///
    /// Порядок: release → controller def → database → context + controller →
    /// scope context → idle fragment → root motion off.
    /// Ошибка загрузки оставляет актора без контроллера.
    pub fn activate(
        &mut self,
        library: &MannequinLibrary,
        info: &ActorMannequinInfo,
        entity: Entity,
        character: &mut CharacterInstance,
    ) -> Result<ActionId, MannequinError> {
        self.release();

        let controller_def = library.load_controller_def(&info.controller_definition)?;
        let database = library.load_database(&info.database)?;

        let context = AnimationContext::new(controller_def.clone());
        let mut controller = ActionController::new(context);

        // Scope context не найден: контроллер остаётся, но ничего не проиграет
        let scope = controller_def.scope_contexts.find(&info.context);
        if scope.is_valid() {
            controller.set_scope_context(
                scope,
                ScopeBinding {
                    entity,
                    character: character.model.clone(),
                    database,
                },
            );
        } else {
            crate::log_error(&format!(
                "{}",
                MannequinError::ScopeContextNotFound(info.context.clone())
            ));
        }

        let idle_fragment = controller_def.fragment_ids.find(names::MOTION_IDLE);
        let idle = controller.queue_persistent(ActionPriority::Lowest, idle_fragment, TagState::EMPTY);

        character.skeleton.set_animation_driven_motion(false);

        self.controller = Some(controller);
        Ok(idle)
    }

    /// Advance контроллера на frame time
    pub fn update(&mut self, frame_time: f32) {
        if let Some(controller) = self.controller.as_mut() {
            controller.update(frame_time);
        }
    }

    pub fn find_tag(&self, name: &str) -> TagId {
        self.controller
            .as_ref()
            .map(|c| c.controller_def().tags.find(name))
            .unwrap_or(TagId::INVALID)
    }

    pub fn find_tag_group(&self, name: &str) -> TagGroupId {
        self.controller
            .as_ref()
            .map(|c| c.controller_def().tags.find_group(name))
            .unwrap_or(TagGroupId::INVALID)
    }

    pub fn find_fragment(&self, name: &str) -> FragmentId {
        self.controller
            .as_ref()
            .map(|c| c.controller_def().fragment_ids.find(name))
            .unwrap_or(FragmentId::INVALID)
    }

    pub fn set_tag(&mut self, tag: TagId, on: bool) {
        if let Some(controller) = self.controller.as_mut() {
            controller.context_mut().set_tag(tag, on);
        }
    }

    pub fn set_tag_group(&mut self, group: TagGroupId, tag: TagId) {
        if let Some(controller) = self.controller.as_mut() {
            controller.context_mut().set_group(group, tag);
        }
    }

    pub fn clear_tag_group(&mut self, group: TagGroupId) {
        if let Some(controller) = self.controller.as_mut() {
            controller.context_mut().clear_group(group);
        }
    }

    pub fn is_tag_set(&self, name: &str) -> bool {
        self.controller
            .as_ref()
            .is_some_and(|c| c.context().state.is_set(c.controller_def().tags.find(name)))
    }

    /// Weapon group: tag оружия или пустая группа для NoWeapon
    pub fn set_weapon_tag(&mut self, weapon: WeaponType) {
        let group = self.find_tag_group(names::WEAPON_GROUP);
        match weapon.tag_name() {
            Some(tag_name) => {
                let tag = self.find_tag(tag_name);
                self.set_tag_group(group, tag);
            }
            None => self.clear_tag_group(group),
        }
    }

    pub fn play_fragment(
        &mut self,
        fragment: FragmentId,
        priority: ActionPriority,
        tags: TagState,
    ) -> Option<ActionId> {
        self.queue(ActionKind::Fragment, priority, fragment, tags)
    }

    pub fn play_fragment_by_name(
        &mut self,
        fragment_name: &str,
        priority: ActionPriority,
        tags: TagState,
    ) -> Option<ActionId> {
        let fragment = self.find_fragment(fragment_name);
        self.queue(ActionKind::Fragment, priority, fragment, tags)
    }

    /// Fragment, который поворачивает актора к направлению движения
    pub fn play_move_action(
        &mut self,
        fragment_name: &str,
        rotation_forced: bool,
        priority: ActionPriority,
        tags: TagState,
    ) -> Option<ActionId> {
        let fragment = self.find_fragment(fragment_name);
        self.queue(ActionKind::Move { rotation_forced }, priority, fragment, tags)
    }

    pub fn play_movement_action(
        &mut self,
        fragment_name: &str,
        priority: ActionPriority,
        tags: TagState,
    ) -> Option<ActionId> {
        let fragment = self.find_fragment(fragment_name);
        self.queue(ActionKind::Movement, priority, fragment, tags)
    }

    /// Завершает последний queued action (если он ещё жив)
    pub fn force_finish_last_action(&mut self) -> bool {
        match (self.controller.as_mut(), self.last_action) {
            (Some(controller), Some(id)) => controller.force_finish(id),
            _ => false,
        }
    }

    fn queue(
        &mut self,
        kind: ActionKind,
        priority: ActionPriority,
        fragment: FragmentId,
        tags: TagState,
    ) -> Option<ActionId> {
        let controller = self.controller.as_mut()?;
        let id = controller.queue(kind, priority, fragment, tags);
        self.last_action = Some(id);
        Some(id)
    }
}
