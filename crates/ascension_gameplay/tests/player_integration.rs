//! Integration tests: player cvars, motion parameters, input → movement

use ascension_gameplay::mannequin::{AnimationDatabase, ControllerDef, FragmentVariant, MotionParamId, TagEntry};
use ascension_gameplay::player::{PlayerInput, PlayerMovement, PlayerView};
use ascension_gameplay::*;
use bevy::prelude::*;
use bevy_rapier3d::prelude::Velocity;
use std::f32::consts::FRAC_PI_2;

fn test_library() -> MannequinLibrary {
    let cvars = PlayerCVars::default();
    let mut library = MannequinLibrary::new();
    library.insert_controller_def(
        cvars.controller_definition.clone(),
        ControllerDef::new(
            &["MotionIdle", "SelectSword", "DeSelectSword"],
            &[TagEntry::new("MotionTurn"), TagEntry::new("MotionMovement")],
            &[cvars.mannequin_context.as_str()],
        )
        .unwrap(),
    );
    library.insert_database(
        cvars.animation_database.clone(),
        AnimationDatabase::default()
            .with_fragment(
                "MotionIdle",
                FragmentVariant {
                    tags: Vec::new(),
                    clip: "idle".into(),
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
            ),
    );
    library
}

fn create_test_app() -> App {
    let mut app = create_headless_app();
    app.add_plugins(GameplayPlugin);
    app.insert_resource(test_library());
    app
}

fn spawn_live_player(app: &mut App) -> Entity {
    let player = app.world_mut().spawn((Player, Actor::player())).id();
    app.update();
    app.world_mut().send_event(SetHealthIntent {
        entity: player,
        health: 100.0,
    });
    app.update();
    player
}

#[test]
fn test_motion_parameters_from_velocity() {
    let mut app = create_test_app();
    let player = spawn_live_player(&mut app);

    // В воздухе: velocity не перезаписывается input'ом, slope не считается
    app.world_mut().get_mut::<Velocity>(player).unwrap().linvel = Vec3::new(3.0, 0.0, 0.0);
    app.update();

    let motion = app.world().get::<PlayerAnimations>(player).unwrap().motion;
    assert!((motion.travel_speed - 3.0).abs() < 1e-5);
    assert!((motion.travel_angle - FRAC_PI_2).abs() < 1e-5);
    assert_eq!(motion.travel_slope, None);

    let character = app.world().get::<CharacterInstance>(player).unwrap();
    let speed = character.skeleton.desired_motion_param(MotionParamId::TravelSpeed).unwrap();
    assert!((speed - 3.0).abs() < 1e-5);
    assert_eq!(character.skeleton.desired_motion_param(MotionParamId::TravelSlope), None);

    // Движение выставляет tag MotionMovement, idle переключается на locomotion
    let mannequin = app.world().get::<ActorMannequin>(player).unwrap();
    assert!(mannequin.is_tag_set("MotionMovement"));
    let installed = mannequin.controller().and_then(|c| c.installed()).unwrap();
    assert_eq!(installed.clip.as_deref(), Some("locomotion"));
}

#[test]
fn test_zero_velocity_on_ground() {
    let mut app = create_test_app();
    let player = spawn_live_player(&mut app);

    app.world_mut()
        .get_mut::<PlayerMovement>(player)
        .unwrap()
        .set_ground_contact(Some(Vec3::Z));
    app.update();

    let motion = app.world().get::<PlayerAnimations>(player).unwrap().motion;
    assert_eq!(motion.travel_speed, 0.0);
    assert!(motion.travel_angle.is_finite());
    assert_eq!(motion.travel_slope, Some(0.0));

    let mannequin = app.world().get::<ActorMannequin>(player).unwrap();
    let installed = mannequin.controller().and_then(|c| c.installed()).unwrap();
    assert_eq!(installed.clip.as_deref(), Some("idle"));
}

#[test]
fn test_input_drives_velocity_and_running() {
    let mut app = create_test_app();
    let player = spawn_live_player(&mut app);

    app.world_mut()
        .get_mut::<PlayerMovement>(player)
        .unwrap()
        .set_ground_contact(Some(Vec3::Z));
    {
        let mut input = app.world_mut().get_mut::<PlayerInput>(player).unwrap();
        input.move_axis = Vec2::new(0.0, 1.0);
        input.sprint = true;
    }
    app.update();

    let actor = app.world().get::<Actor>(player).unwrap();
    assert!(actor.is_running());
    let velocity = app.world().get::<Velocity>(player).unwrap().linvel;
    assert!((velocity - Vec3::new(0.0, 3.7, 0.0)).length() < 1e-5);
}

#[test]
fn test_walk_speed_follows_console() {
    let mut app = create_test_app();
    let player = spawn_live_player(&mut app);

    let reply = app
        .world_mut()
        .resource_mut::<CVarStore>()
        .execute("pl_walkSpeed 2.5")
        .unwrap();
    assert_eq!(reply, "pl_walkSpeed = 2.5");

    // PreUpdate пересобирает snapshot, Lifecycle применяет к актору
    app.update();

    let actor = app.world().get::<Actor>(player).unwrap();
    assert_eq!(actor.walk_speed, 2.5);
    assert_eq!(actor.move_speed(), 2.5);
    assert_eq!(app.world().resource::<PlayerCVars>().walk_speed, 2.5);
}

#[test]
fn test_camera_follows_player() {
    let mut app = create_test_app();
    let player = spawn_live_player(&mut app);
    app.world_mut().get_mut::<Transform>(player).unwrap().translation = Vec3::new(5.0, 0.0, 0.0);
    app.update();

    let view = app.world().get::<PlayerView>(player).unwrap();
    let offset = app.world().resource::<GameCVars>().view_offset;
    let expected = Vec3::new(5.0, 0.0, 0.935) + offset;
    assert!((view.camera.translation - expected).length() < 1e-5);
}

#[test]
fn test_cvars_released_on_exit() {
    let mut app = create_test_app();
    spawn_live_player(&mut app);
    assert!(!app.world().resource::<CVarStore>().is_empty());

    app.world_mut().send_event(AppExit::Success);
    app.update();

    assert!(app.world().resource::<CVarStore>().is_empty());
}
