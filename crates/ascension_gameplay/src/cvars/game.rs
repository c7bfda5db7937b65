//! Typed snapshots поверх CVarStore: GameCVars, PlayerCVars
//!
//! Системы читают `Res<GameCVars>` / `Res<PlayerCVars>`; snapshots
//! пересобираются когда store изменился (console, overrides).

use bevy::prelude::*;

use super::store::{CVarDef, CVarError, CVarStore};

// ============================================================================
// Game CVars (module load → module unload)
// ============================================================================

pub fn game_cvar_defs() -> Vec<CVarDef> {
    vec![
        // Player attack
        CVarDef::float("pl_attackDuration", 0.6, "Duration of a single sword attack in seconds"),
        CVarDef::float("pl_maxAttackAngle", 60.0, "Maximum angle in degrees a sword attack can hit"),
        // Camera
        CVarDef::float("cam_viewOffsetX", 0.4, "Camera side offset from the player's eyes"),
        CVarDef::float("cam_viewOffsetY", -2.2, "Camera forward offset from the player's eyes"),
        CVarDef::float("cam_viewOffsetZ", 0.3, "Camera height offset from the player's eyes"),
        CVarDef::float("cam_nearPlane", 0.1, "Camera near plane distance"),
        CVarDef::float("cam_colliderRadius", 0.2, "Radius of the camera collision probe"),
        CVarDef::float("cam_colliderExtraLength", 0.3, "Extra length of the camera collision probe"),
        CVarDef::float("cam_colliderTransitionSpeed", 8.0, "Speed of camera pull-in after a collision"),
        // Fighting system
        CVarDef::float("ai_attackDistance", 1.8, "Distance at which AI starts attacking"),
        CVarDef::float("ai_tauntDistance", 4.0, "Distance at which AI taunts the player"),
        CVarDef::float("ai_distanceThreshold", 0.5, "Tolerance for AI distance checks"),
        CVarDef::int("ai_maxAttackerCount", 2, "Maximum number of AI attacking the player at once"),
        CVarDef::float("ai_maxAttackTime", 3.0, "Maximum delay between AI attacks"),
        CVarDef::float("ai_minAttackTime", 1.0, "Minimum delay between AI attacks"),
    ]
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct GameCVars {
    pub attack_duration: f32,
    pub max_attack_angle: f32,

    /// cam_viewOffsetX/Y/Z
    pub view_offset: Vec3,
    pub near_plane: f32,
    pub collider_radius: f32,
    pub collider_extra_length: f32,
    pub collider_transition_speed: f32,

    pub ai_attack_distance: f32,
    pub ai_taunt_distance: f32,
    pub ai_distance_threshold: f32,
    pub ai_max_attacker_count: i32,
    pub ai_max_attack_time: f32,
    pub ai_min_attack_time: f32,
}

impl Default for GameCVars {
    fn default() -> Self {
        Self {
            attack_duration: 0.6,
            max_attack_angle: 60.0,
            view_offset: Vec3::new(0.4, -2.2, 0.3),
            near_plane: 0.1,
            collider_radius: 0.2,
            collider_extra_length: 0.3,
            collider_transition_speed: 8.0,
            ai_attack_distance: 1.8,
            ai_taunt_distance: 4.0,
            ai_distance_threshold: 0.5,
            ai_max_attacker_count: 2,
            ai_max_attack_time: 3.0,
            ai_min_attack_time: 1.0,
        }
    }
}

impl GameCVars {
    pub fn from_store(store: &CVarStore) -> Result<Self, CVarError> {
        Ok(Self {
            attack_duration: store.get_float("pl_attackDuration")?,
            max_attack_angle: store.get_float("pl_maxAttackAngle")?,
            view_offset: Vec3::new(
                store.get_float("cam_viewOffsetX")?,
                store.get_float("cam_viewOffsetY")?,
                store.get_float("cam_viewOffsetZ")?,
            ),
            near_plane: store.get_float("cam_nearPlane")?,
            collider_radius: store.get_float("cam_colliderRadius")?,
            collider_extra_length: store.get_float("cam_colliderExtraLength")?,
            collider_transition_speed: store.get_float("cam_colliderTransitionSpeed")?,
            ai_attack_distance: store.get_float("ai_attackDistance")?,
            ai_taunt_distance: store.get_float("ai_tauntDistance")?,
            ai_distance_threshold: store.get_float("ai_distanceThreshold")?,
            ai_max_attacker_count: store.get_int("ai_maxAttackerCount")?,
            ai_max_attack_time: store.get_float("ai_maxAttackTime")?,
            ai_min_attack_time: store.get_float("ai_minAttackTime")?,
        })
    }
}

// ============================================================================
// Player CVars (регистрируются вместе с первым Player, снимаются с последним)
// ============================================================================

pub fn player_cvar_defs() -> Vec<CVarDef> {
    vec![
        CVarDef::float("pl_mass", 90.0, "Mass of the player entity in kg"),
        CVarDef::float("pl_walkSpeed", 1.8, "Player walking speed"),
        CVarDef::float("pl_runSpeed", 3.7, "Player running speed"),
        CVarDef::float("pl_rotationSpeed", 7.0, "Player rotation speed while moving"),
        CVarDef::float("pl_rotationSpeedYaw", 0.05, "Speed at which the player rotates entity yaw"),
        CVarDef::float("pl_rotationSpeedPitch", 0.05, "Speed at which the player rotates entity pitch"),
        CVarDef::float("pl_rotationLimitsMinPitch", -0.84, "Minimum entity pitch limit"),
        CVarDef::float("pl_rotationLimitsMaxPitch", 1.5, "Maximum entity pitch limit"),
        CVarDef::float("pl_eyeHeight", 0.935, "Height of the player's eyes from ground"),
        CVarDef::string(
            "pl_thirdPersonGeometry",
            "Objects/Characters/Hero/hero.cdf",
            "Character model used for the player",
        ),
        CVarDef::string(
            "pl_thirdPersonMannequinContext",
            "Char3P",
            "Mannequin scope context the player animates in",
        ),
        CVarDef::string(
            "pl_thirdPersonAnimationDatabase",
            "Animations/Mannequin/ADB/Hero.adb",
            "Animation database of the player",
        ),
        CVarDef::string(
            "pl_thirdPersonControllerDefinition",
            "Animations/Mannequin/ADB/HeroControllerDefinition.xml",
            "Mannequin controller definition of the player",
        ),
    ]
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerCVars {
    pub mass: f32,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub turn_speed: f32,

    pub rotation_speed_yaw: f32,
    pub rotation_speed_pitch: f32,
    pub rotation_limits_min_pitch: f32,
    pub rotation_limits_max_pitch: f32,

    pub eye_height: f32,

    pub third_person_geometry: String,
    pub mannequin_context: String,
    pub animation_database: String,
    pub controller_definition: String,
}

impl Default for PlayerCVars {
    fn default() -> Self {
        Self {
            mass: 90.0,
            walk_speed: 1.8,
            run_speed: 3.7,
            turn_speed: 7.0,
            rotation_speed_yaw: 0.05,
            rotation_speed_pitch: 0.05,
            rotation_limits_min_pitch: -0.84,
            rotation_limits_max_pitch: 1.5,
            eye_height: 0.935,
            third_person_geometry: "Objects/Characters/Hero/hero.cdf".to_string(),
            mannequin_context: "Char3P".to_string(),
            animation_database: "Animations/Mannequin/ADB/Hero.adb".to_string(),
            controller_definition: "Animations/Mannequin/ADB/HeroControllerDefinition.xml"
                .to_string(),
        }
    }
}

impl PlayerCVars {
    /// Регистрирует pl_* cvars (парная операция к `unregister`)
    pub fn register(store: &mut CVarStore) -> Result<(), CVarError> {
        store.register_all(&player_cvar_defs())
    }

    pub fn unregister(store: &mut CVarStore) -> usize {
        store.unregister_all(&player_cvar_defs())
    }

    pub fn from_store(store: &CVarStore) -> Result<Self, CVarError> {
        Ok(Self {
            mass: store.get_float("pl_mass")?,
            walk_speed: store.get_float("pl_walkSpeed")?,
            run_speed: store.get_float("pl_runSpeed")?,
            turn_speed: store.get_float("pl_rotationSpeed")?,
            rotation_speed_yaw: store.get_float("pl_rotationSpeedYaw")?,
            rotation_speed_pitch: store.get_float("pl_rotationSpeedPitch")?,
            rotation_limits_min_pitch: store.get_float("pl_rotationLimitsMinPitch")?,
            rotation_limits_max_pitch: store.get_float("pl_rotationLimitsMaxPitch")?,
            eye_height: store.get_float("pl_eyeHeight")?,
            third_person_geometry: store.get_string("pl_thirdPersonGeometry")?.to_string(),
            mannequin_context: store.get_string("pl_thirdPersonMannequinContext")?.to_string(),
            animation_database: store.get_string("pl_thirdPersonAnimationDatabase")?.to_string(),
            controller_definition: store
                .get_string("pl_thirdPersonControllerDefinition")?
                .to_string(),
        })
    }
}
