//! Mannequin data: controller definitions, animation databases, library
//!
//! Library: Resource, владеет загруженными definitions (как database
//! manager движка). Компоненты держат `Arc` на то что загрузили.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::tags::{FragmentId, NameTable, ScopeContextId, TagDefinition, TagEntry, TagState};

#[derive(Debug, Error)]
pub enum MannequinError {
    #[error("failed to load controller definition '{0}'")]
    ControllerDefNotFound(String),

    #[error("failed to load animation database '{0}'")]
    DatabaseNotFound(String),

    #[error("scope context '{0}' not found in controller definition")]
    ScopeContextNotFound(String),

    #[error("controller definition declares more than 64 tags")]
    TooManyTags,

    #[error("invalid mannequin data: {0}")]
    Parse(#[from] serde_json::Error),
}

// ============================================================================
// Controller definition
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct RawControllerDef {
    fragments: Vec<String>,
    #[serde(default)]
    tags: Vec<TagEntry>,
    scope_contexts: Vec<String>,
}

/// Controller definition: какие fragments, tags и scope contexts существуют
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerDef {
    pub fragment_ids: FragmentTable,
    pub tags: TagDefinition,
    pub scope_contexts: ScopeContextTable,
}

impl ControllerDef {
    pub fn new(
        fragments: &[&str],
        tags: &[TagEntry],
        scope_contexts: &[&str],
    ) -> Result<Self, MannequinError> {
        Ok(Self {
            fragment_ids: FragmentTable(NameTable::new(fragments.iter().copied())),
            tags: TagDefinition::new(tags).ok_or(MannequinError::TooManyTags)?,
            scope_contexts: ScopeContextTable(NameTable::new(scope_contexts.iter().copied())),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, MannequinError> {
        Self::from_raw(serde_json::from_str(json)?)
    }

    fn from_raw(raw: RawControllerDef) -> Result<Self, MannequinError> {
        Ok(Self {
            fragment_ids: FragmentTable(NameTable::new(raw.fragments)),
            tags: TagDefinition::new(&raw.tags).ok_or(MannequinError::TooManyTags)?,
            scope_contexts: ScopeContextTable(NameTable::new(raw.scope_contexts)),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentTable(NameTable);

impl FragmentTable {
    pub fn find(&self, name: &str) -> FragmentId {
        self.0
            .find_index(name)
            .map(|i| FragmentId(i as u32))
            .unwrap_or(FragmentId::INVALID)
    }

    pub fn name(&self, id: FragmentId) -> Option<&str> {
        id.index().and_then(|i| self.0.name(i))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeContextTable(NameTable);

impl ScopeContextTable {
    pub fn find(&self, name: &str) -> ScopeContextId {
        self.0
            .find_index(name)
            .map(|i| ScopeContextId(i as u32))
            .unwrap_or(ScopeContextId::INVALID)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Animation database
// ============================================================================

/// Вариант fragment'а: выбирается по tags
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FragmentVariant {
    /// Tags, которые должны быть выставлены для этого варианта
    #[serde(default)]
    pub tags: Vec<String>,
    pub clip: String,
    /// None: клип зациклен, action не завершается сам
    #[serde(default)]
    pub duration: Option<f32>,
}

/// Animation database: fragment name → варианты
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AnimationDatabase {
    #[serde(default)]
    pub fragments: HashMap<String, Vec<FragmentVariant>>,
}

impl AnimationDatabase {
    pub fn from_json(json: &str) -> Result<Self, MannequinError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_fragment(mut self, fragment: &str, variant: FragmentVariant) -> Self {
        self.fragments
            .entry(fragment.to_string())
            .or_default()
            .push(variant);
        self
    }

    /// Лучший вариант для текущего tag state
    ///
    /// Подходят варианты, все tags которых выставлены; из них берём
    /// вариант с наибольшим числом tags (при равенстве: первый).
    pub fn find_best_match(
        &self,
        fragment: &str,
        state: TagState,
        tag_def: &TagDefinition,
    ) -> Option<&FragmentVariant> {
        let variants = self.fragments.get(fragment)?;

        let mut best: Option<(&FragmentVariant, u32)> = None;
        for variant in variants {
            let required = tag_def.state_from_names(variant.tags.iter().map(String::as_str));
            // Вариант с неизвестным tag не может совпасть
            if required.count() as usize != variant.tags.len() || !state.contains(required) {
                continue;
            }
            let score = required.count();
            if best.map_or(true, |(_, best_score)| score > best_score) {
                best = Some((variant, score));
            }
        }

        best.map(|(variant, _)| variant)
    }
}

// ============================================================================
// Library (Resource)
// ============================================================================

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    controller_definitions: HashMap<String, serde_json::Value>,
    #[serde(default)]
    databases: HashMap<String, AnimationDatabase>,
}

/// Хранилище mannequin данных, адресуемых по пути
#[derive(Resource, Debug, Default, Clone)]
pub struct MannequinLibrary {
    controller_defs: HashMap<String, Arc<ControllerDef>>,
    databases: HashMap<String, Arc<AnimationDatabase>>,
}

impl MannequinLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manifest: `{ "controller_definitions": { path: {...} }, "databases": { path: {...} } }`
    pub fn from_manifest_json(json: &str) -> Result<Self, MannequinError> {
        let manifest: RawManifest = serde_json::from_str(json)?;
        let mut library = Self::new();

        for (path, value) in manifest.controller_definitions {
            let def = ControllerDef::from_raw(serde_json::from_value(value)?)?;
            library.insert_controller_def(path, def);
        }
        for (path, database) in manifest.databases {
            library.insert_database(path, database);
        }

        Ok(library)
    }

    pub fn insert_controller_def(&mut self, path: impl Into<String>, def: ControllerDef) {
        self.controller_defs.insert(path.into(), Arc::new(def));
    }

    pub fn insert_database(&mut self, path: impl Into<String>, database: AnimationDatabase) {
        self.databases.insert(path.into(), Arc::new(database));
    }

    pub fn load_controller_def(&self, path: &str) -> Result<Arc<ControllerDef>, MannequinError> {
        self.controller_defs
            .get(path)
            .cloned()
            .ok_or_else(|| MannequinError::ControllerDefNotFound(path.to_string()))
    }

    pub fn load_database(&self, path: &str) -> Result<Arc<AnimationDatabase>, MannequinError> {
        self.databases
            .get(path)
            .cloned()
            .ok_or_else(|| MannequinError::DatabaseNotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "controller_definitions": {
            "Hero.xml": {
                "fragments": ["MotionIdle", "SelectSword"],
                "tags": [{ "name": "Sword", "group": "Weapon" }, { "name": "MotionMovement" }],
                "scope_contexts": ["Char3P"]
            }
        },
        "databases": {
            "Hero.adb": {
                "fragments": {
                    "MotionIdle": [
                        { "clip": "idle" },
                        { "tags": ["Sword"], "clip": "idle_sword" }
                    ],
                    "SelectSword": [{ "clip": "sword_draw", "duration": 0.5 }]
                }
            }
        }
    }"#;

    #[test]
    fn test_manifest_load() {
        let library = MannequinLibrary::from_manifest_json(MANIFEST).unwrap();

        let def = library.load_controller_def("Hero.xml").unwrap();
        assert_eq!(def.fragment_ids.find("SelectSword"), FragmentId(1));
        assert_eq!(def.fragment_ids.find("Dance"), FragmentId::INVALID);
        assert_eq!(def.scope_contexts.find("Char3P"), ScopeContextId(0));

        let db = library.load_database("Hero.adb").unwrap();
        assert_eq!(db.fragments.len(), 2);
    }

    #[test]
    fn test_missing_assets_are_errors() {
        let library = MannequinLibrary::from_manifest_json(MANIFEST).unwrap();

        assert!(matches!(
            library.load_controller_def("Villain.xml"),
            Err(MannequinError::ControllerDefNotFound(path)) if path == "Villain.xml"
        ));
        assert!(matches!(
            library.load_database("Villain.adb"),
            Err(MannequinError::DatabaseNotFound(_))
        ));
        assert!(matches!(
            MannequinLibrary::from_manifest_json("{ broken"),
            Err(MannequinError::Parse(_))
        ));
    }

    #[test]
    fn test_best_match_prefers_more_specific_variant() {
        let library = MannequinLibrary::from_manifest_json(MANIFEST).unwrap();
        let def = library.load_controller_def("Hero.xml").unwrap();
        let db = library.load_database("Hero.adb").unwrap();

        let plain = db.find_best_match("MotionIdle", TagState::EMPTY, &def.tags).unwrap();
        assert_eq!(plain.clip, "idle");

        let sword_state = def.tags.state_from_names(["Sword"]);
        let sword = db.find_best_match("MotionIdle", sword_state, &def.tags).unwrap();
        assert_eq!(sword.clip, "idle_sword");

        assert!(db.find_best_match("Dance", sword_state, &def.tags).is_none());
    }
}
