//! Tests for ActionController.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use std::sync::Arc;

    use crate::mannequin::*;

    fn hero_def() -> Arc<ControllerDef> {
        Arc::new(
            ControllerDef::new(
                &["MotionIdle", "SelectSword", "DeSelectSword", "Attack", "Unanimated"],
                &[
                    TagEntry::new("MotionTurn"),
                    TagEntry::new("MotionMovement"),
                    TagEntry::grouped("Magic", "Weapon"),
                    TagEntry::grouped("Sword", "Weapon"),
                ],
                &["Char3P"],
            )
            .unwrap(),
        )
    }

    fn hero_db() -> Arc<AnimationDatabase> {
        let clip = |clip: &str, duration: Option<f32>| FragmentVariant {
            tags: Vec::new(),
            clip: clip.to_string(),
            duration,
        };
        Arc::new(
            AnimationDatabase::default()
                .with_fragment("MotionIdle", clip("idle", None))
                .with_fragment(
                    "MotionIdle",
                    FragmentVariant {
                        tags: vec!["Sword".into()],
                        clip: "idle_sword".into(),
                        duration: None,
                    },
                )
                .with_fragment(
                    "MotionIdle",
                    FragmentVariant {
                        tags: vec!["MotionMovement".into()],
                        clip: "locomotion".into(),
                        duration: None,
                    },
                )
                .with_fragment("SelectSword", clip("sword_draw", Some(0.5)))
                .with_fragment("DeSelectSword", clip("sword_sheathe", Some(0.5)))
                .with_fragment("Attack", clip("slash", Some(1.0))),
        )
    }

    fn bound_controller() -> ActionController {
        let def = hero_def();
        let scope = def.scope_contexts.find("Char3P");
        let mut controller = ActionController::new(AnimationContext::new(def));
        assert!(controller.set_scope_context(
            scope,
            ScopeBinding {
                entity: Entity::PLACEHOLDER,
                character: "hero.cdf".into(),
                database: hero_db(),
            },
        ));
        controller
    }

    fn fragment(controller: &ActionController, name: &str) -> FragmentId {
        controller.controller_def().fragment_ids.find(name)
    }

    #[test]
    fn test_queue_does_not_cancel_previous() {
        let mut controller = bound_controller();
        let select = fragment(&controller, "SelectSword");
        let deselect = fragment(&controller, "DeSelectSword");

        let first = controller.queue(ActionKind::Fragment, ActionPriority::Sword, select, TagState::EMPTY);
        let second =
            controller.queue(ActionKind::Fragment, ActionPriority::Sword, deselect, TagState::EMPTY);

        assert_eq!(controller.pending().count(), 2);
        assert_eq!(controller.status(first), Some(ActionStatus::Pending));
        assert_eq!(controller.status(second), Some(ActionStatus::Pending));
    }

    #[test]
    fn test_idle_installs_and_resolves_tagged_variant() {
        let mut controller = bound_controller();
        let idle = fragment(&controller, "MotionIdle");
        let def = controller.controller_def().tags.clone();

        controller.context_mut().set_group(def.find_group("Weapon"), def.find("Sword"));
        let id = controller.queue_persistent(ActionPriority::Lowest, idle, TagState::EMPTY);
        controller.update(0.016);

        let installed = controller.installed().unwrap();
        assert_eq!(installed.id, id);
        assert_eq!(installed.clip.as_deref(), Some("idle_sword"));
        assert!(installed.is_looping());
    }

    #[test]
    fn test_installed_idle_follows_tag_changes() {
        let mut controller = bound_controller();
        let idle = fragment(&controller, "MotionIdle");
        let movement = controller.controller_def().tags.find("MotionMovement");

        let id = controller.queue_persistent(ActionPriority::Lowest, idle, TagState::EMPTY);
        controller.update(0.016);
        assert_eq!(controller.installed().unwrap().clip.as_deref(), Some("idle"));

        controller.context_mut().set_tag(movement, true);
        for _ in 0..3 {
            controller.update(0.016);
        }
        let installed = controller.installed().unwrap();
        assert_eq!(installed.id, id);
        assert_eq!(installed.clip.as_deref(), Some("locomotion"));
        assert!((installed.elapsed - 0.032).abs() < 1e-5);

        controller.context_mut().set_tag(movement, false);
        controller.update(0.016);
        assert_eq!(controller.installed().unwrap().clip.as_deref(), Some("idle"));
    }

    #[test]
    fn test_movement_request_replaces_pending_one() {
        let mut controller = bound_controller();
        let attack = fragment(&controller, "Attack");
        let idle = fragment(&controller, "MotionIdle");

        let attack_id = controller.queue(ActionKind::Fragment, ActionPriority::Sword, attack, TagState::EMPTY);
        controller.update(0.0);

        // Пока attack installed, movement requests копятся каждый кадр
        let mut last = None;
        for _ in 0..5 {
            last = Some(controller.queue(
                ActionKind::Movement,
                ActionPriority::Movement,
                idle,
                TagState::EMPTY,
            ));
            controller.update(0.016);
        }
        let first_move = controller.queue(
            ActionKind::Move { rotation_forced: false },
            ActionPriority::Movement,
            idle,
            TagState::EMPTY,
        );
        let second_move = controller.queue(
            ActionKind::Move { rotation_forced: true },
            ActionPriority::Movement,
            idle,
            TagState::EMPTY,
        );

        assert_eq!(controller.installed().map(|a| a.id), Some(attack_id));
        let pending: Vec<ActionId> = controller.pending().map(|a| a.id).collect();
        assert_eq!(pending, vec![last.unwrap(), second_move]);
        assert_eq!(controller.status(first_move), Some(ActionStatus::Finished));
    }

    #[test]
    fn test_higher_priority_interrupts_and_idle_returns() {
        let mut controller = bound_controller();
        let idle_fragment = fragment(&controller, "MotionIdle");
        let select = fragment(&controller, "SelectSword");

        let idle = controller.queue_persistent(ActionPriority::Lowest, idle_fragment, TagState::EMPTY);
        controller.update(0.0);

        let sword = controller.queue(ActionKind::Fragment, ActionPriority::Sword, select, TagState::EMPTY);
        controller.update(0.1);
        assert_eq!(controller.installed().map(|a| a.id), Some(sword));
        assert_eq!(controller.status(idle), Some(ActionStatus::Pending));

        // 0.5 sec клип истёк → idle снова installed
        controller.update(0.5);
        assert_eq!(controller.installed().map(|a| a.id), Some(idle));
        assert_eq!(controller.status(sword), Some(ActionStatus::Finished));
    }

    #[test]
    fn test_equal_priority_waits_for_finite_action() {
        let mut controller = bound_controller();
        let select = fragment(&controller, "SelectSword");
        let deselect = fragment(&controller, "DeSelectSword");

        let first = controller.queue(ActionKind::Fragment, ActionPriority::Sword, select, TagState::EMPTY);
        controller.update(0.0);
        let second =
            controller.queue(ActionKind::Fragment, ActionPriority::Sword, deselect, TagState::EMPTY);
        controller.update(0.1);

        assert_eq!(controller.installed().map(|a| a.id), Some(first));

        controller.update(0.5);
        assert_eq!(controller.installed().map(|a| a.id), Some(second));
    }

    #[test]
    fn test_force_finish() {
        let mut controller = bound_controller();
        let attack = fragment(&controller, "Attack");

        let id = controller.queue(ActionKind::Fragment, ActionPriority::Sword, attack, TagState::EMPTY);
        controller.update(0.0);
        assert!(controller.force_finish(id));
        assert!(controller.installed().is_none());
        assert_eq!(controller.status(id), Some(ActionStatus::Finished));

        // Повторно: уже не живой
        assert!(!controller.force_finish(id));
        assert_eq!(controller.status(ActionId(999)), None);
    }

    #[test]
    fn test_fragment_without_animation_is_dropped() {
        let mut controller = bound_controller();
        let idle = fragment(&controller, "MotionIdle");
        let unanimated = fragment(&controller, "Unanimated");

        let idle_id = controller.queue_persistent(ActionPriority::Lowest, idle, TagState::EMPTY);
        controller.update(0.0);

        controller.queue(ActionKind::Fragment, ActionPriority::Sword, unanimated, TagState::EMPTY);
        controller.queue(ActionKind::Fragment, ActionPriority::Sword, FragmentId::INVALID, TagState::EMPTY);
        controller.update(0.0);
        controller.update(0.0);

        assert_eq!(controller.installed().map(|a| a.id), Some(idle_id));
        assert_eq!(controller.pending().count(), 0);
    }

    #[test]
    fn test_tag_groups_are_exclusive() {
        let controller = bound_controller();
        let tags = controller.controller_def().tags.clone();
        let mut context = controller.context().clone();
        let weapon = tags.find_group("Weapon");

        context.set_group(weapon, tags.find("Magic"));
        context.set_group(weapon, tags.find("Sword"));
        assert!(context.state.is_set(tags.find("Sword")));
        assert!(!context.state.is_set(tags.find("Magic")));

        // Tag не из этой группы: игнорируется
        context.set_group(weapon, tags.find("MotionTurn"));
        assert!(!context.state.is_set(tags.find("MotionTurn")));

        context.set_tag(tags.find("MotionTurn"), true);
        context.clear_group(weapon);
        assert!(!context.state.is_set(tags.find("Sword")));
        assert!(context.state.is_set(tags.find("MotionTurn")));
    }

    #[test]
    fn test_animation_events_reach_installed_action() {
        let mut controller = bound_controller();
        let attack = fragment(&controller, "Attack");

        assert!(!controller.on_animation_event("hero.cdf", AnimEventInstance::new("swing", 0.2)));

        controller.queue(ActionKind::Fragment, ActionPriority::Sword, attack, TagState::EMPTY);
        controller.update(0.0);

        assert!(controller.on_animation_event("hero.cdf", AnimEventInstance::new("swing", 0.2)));
        assert!(!controller.on_animation_event("villain.cdf", AnimEventInstance::new("swing", 0.2)));
        assert_eq!(controller.installed().unwrap().anim_events.len(), 1);
    }

    #[test]
    fn test_invalid_scope_context_rejected() {
        let mut controller = bound_controller();
        let bound = controller.set_scope_context(
            ScopeContextId::INVALID,
            ScopeBinding {
                entity: Entity::PLACEHOLDER,
                character: "hero.cdf".into(),
                database: hero_db(),
            },
        );
        assert!(!bound);
        assert!(controller.scope_binding(ScopeContextId(0)).is_some());
    }
}
