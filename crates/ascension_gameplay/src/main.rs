//! Headless демо Ascension gameplay
//!
//! Загружает sample mannequin library, ставит spawn point и игрока,
//! стартует игру и гоняет кадры без рендера.

use ascension_gameplay::actor::spawn_spawn_point;
use ascension_gameplay::player::{PlayerInput, PlayerMovement};
use ascension_gameplay::{
    create_headless_app, log_error, spawn_player, Actor, CharacterInstance, EntityReset,
    GameplayPlugin, MannequinLibrary, PlayerAnimations, SelectWeaponIntent, SwordAttackIntent,
    WeaponType,
};
use bevy::prelude::*;

const SAMPLE_MANIFEST: &str = r#"{
    "controller_definitions": {
        "Animations/Mannequin/ADB/HeroControllerDefinition.xml": {
            "fragments": ["MotionIdle", "MotionMovement", "SelectSword", "DeSelectSword", "Attack"],
            "tags": [
                { "name": "MotionTurn" },
                { "name": "MotionMovement" },
                { "name": "Magic", "group": "Weapon" },
                { "name": "Sword", "group": "Weapon" },
                { "name": "Knife", "group": "Weapon" }
            ],
            "scope_contexts": ["Char3P"]
        }
    },
    "databases": {
        "Animations/Mannequin/ADB/Hero.adb": {
            "fragments": {
                "MotionIdle": [
                    { "clip": "hero_idle" },
                    { "tags": ["Sword"], "clip": "hero_idle_sword" },
                    { "tags": ["MotionMovement"], "clip": "hero_locomotion" }
                ],
                "SelectSword": [{ "clip": "hero_sword_draw", "duration": 0.5 }],
                "DeSelectSword": [{ "clip": "hero_sword_sheathe", "duration": 0.5 }],
                "Attack": [{ "tags": ["Sword"], "clip": "hero_sword_slash", "duration": 0.6 }]
            }
        }
    }
}"#;

fn main() {
    println!("Starting Ascension headless gameplay");

    let mut app = create_headless_app();
    app.add_plugins(GameplayPlugin);

    match MannequinLibrary::from_manifest_json(SAMPLE_MANIFEST) {
        Ok(library) => {
            app.insert_resource(library);
        }
        Err(err) => log_error(&format!("Sample manifest rejected: {}", err)),
    }

    let world = app.world_mut();
    let player = {
        let mut commands = world.commands();
        spawn_spawn_point(&mut commands, Transform::from_xyz(10.0, 4.0, 0.0));
        spawn_player(&mut commands, Transform::default())
    };
    world.flush();

    // Post-init + старт игры
    app.update();
    app.world_mut().send_event(EntityReset { game_started: true });

    for tick in 0..600 {
        if tick == 60 {
            if let Some(mut movement) = app.world_mut().get_mut::<PlayerMovement>(player) {
                movement.set_ground_contact(Some(Vec3::Z));
            }
            if let Some(mut input) = app.world_mut().get_mut::<PlayerInput>(player) {
                input.move_axis = Vec2::new(0.0, 1.0);
                input.sprint = true;
            }
        }
        if tick == 120 {
            app.world_mut().send_event(SelectWeaponIntent {
                entity: player,
                weapon: WeaponType::Sword,
                force: false,
            });
        }
        if tick == 180 {
            app.world_mut().send_event(SwordAttackIntent { entity: player });
        }

        app.update();

        if tick % 100 == 0 {
            print_status(app.world(), player, tick);
        }
    }

    println!("Simulation complete!");
}

fn print_status(world: &World, player: Entity, tick: usize) {
    let Some(actor) = world.get::<Actor>(player) else {
        return;
    };
    let transform = world.get::<Transform>(player).copied().unwrap_or_default();
    let clip = world
        .get::<ascension_gameplay::ActorMannequin>(player)
        .and_then(|m| m.controller())
        .and_then(|c| c.installed())
        .and_then(|a| a.clip.clone())
        .unwrap_or_else(|| "-".to_string());
    let speed = world
        .get::<PlayerAnimations>(player)
        .map(|a| a.motion.travel_speed)
        .unwrap_or_default();
    let has_model = world.get::<CharacterInstance>(player).is_some();

    println!(
        "Tick {}: health {} weapon {:?} pos {:?} speed {:.2} clip {} model {}",
        tick,
        actor.health(),
        actor.weapon_type(),
        transform.translation,
        speed,
        clip,
        has_model
    );
}
