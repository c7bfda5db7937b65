//! CVarStore: реестр console variables
//!
//! Значения read-many / write-rare. Имена уникальны; повторная регистрация
//! того же имени: ошибка (как у engine console).

use bevy::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CVarError {
    #[error("cvar '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("cvar '{0}' is not registered")]
    NotFound(String),

    #[error("cvar '{name}' holds {actual}, requested {expected}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("cannot parse '{raw}' as value of cvar '{name}'")]
    Parse { name: String, raw: String },

    #[error("empty console line")]
    EmptyCommand,

    #[error("invalid cvar overrides: {0}")]
    Overrides(#[from] serde_json::Error),
}

/// Значение cvar
#[derive(Debug, Clone, PartialEq)]
pub enum CVarValue {
    Float(f32),
    Int(i32),
    String(String),
}

impl CVarValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            CVarValue::Float(_) => "float",
            CVarValue::Int(_) => "int",
            CVarValue::String(_) => "string",
        }
    }

    /// Парсит строку в значение того же типа что и `self`
    fn parse_same_type(&self, raw: &str) -> Option<CVarValue> {
        let raw = raw.trim();
        match self {
            CVarValue::Float(_) => raw.parse::<f32>().ok().map(CVarValue::Float),
            CVarValue::Int(_) => raw.parse::<i32>().ok().map(CVarValue::Int),
            CVarValue::String(_) => Some(CVarValue::String(raw.to_string())),
        }
    }

    fn from_json(value: &serde_json::Value) -> Option<CVarValue> {
        match value {
            serde_json::Value::Number(n) if n.is_i64() => {
                n.as_i64().and_then(|v| i32::try_from(v).ok()).map(CVarValue::Int)
            }
            serde_json::Value::Number(n) => n.as_f64().map(|v| CVarValue::Float(v as f32)),
            serde_json::Value::String(s) => Some(CVarValue::String(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for CVarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CVarValue::Float(v) => write!(f, "{}", v),
            CVarValue::Int(v) => write!(f, "{}", v),
            CVarValue::String(v) => f.write_str(v),
        }
    }
}

/// Флаги регистрации
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CVarFlags {
    /// VF_CHEAT: менять можно только при включённых cheats
    pub cheat: bool,
}

impl CVarFlags {
    pub const NONE: CVarFlags = CVarFlags { cheat: false };
    pub const CHEAT: CVarFlags = CVarFlags { cheat: true };
}

/// Описание cvar для регистрации группой
#[derive(Debug, Clone)]
pub struct CVarDef {
    pub name: &'static str,
    pub default: CVarValue,
    pub flags: CVarFlags,
    pub help: &'static str,
}

impl CVarDef {
    pub fn float(name: &'static str, default: f32, help: &'static str) -> Self {
        Self {
            name,
            default: CVarValue::Float(default),
            flags: CVarFlags::CHEAT,
            help,
        }
    }

    pub fn int(name: &'static str, default: i32, help: &'static str) -> Self {
        Self {
            name,
            default: CVarValue::Int(default),
            flags: CVarFlags::CHEAT,
            help,
        }
    }

    pub fn string(name: &'static str, default: &str, help: &'static str) -> Self {
        Self {
            name,
            default: CVarValue::String(default.to_string()),
            flags: CVarFlags::NONE,
            help,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CVarEntry {
    pub value: CVarValue,
    pub default: CVarValue,
    pub flags: CVarFlags,
    pub help: String,
}

/// Process-wide реестр console variables (Resource)
///
/// Заменяет глобальный указатель: store живёт в World, системы получают
/// его через `Res`/`ResMut`, typed snapshots: через `GameCVars`/`PlayerCVars`.
#[derive(Resource, Debug, Default)]
pub struct CVarStore {
    vars: BTreeMap<String, CVarEntry>,
    /// Разрешены ли изменения cheat-переменных через console
    pub cheats_enabled: bool,
}

impl CVarStore {
    pub fn new() -> Self {
        Self {
            vars: BTreeMap::new(),
            cheats_enabled: true,
        }
    }

    pub fn register(&mut self, def: &CVarDef) -> Result<(), CVarError> {
        if self.vars.contains_key(def.name) {
            return Err(CVarError::AlreadyRegistered(def.name.to_string()));
        }

        self.vars.insert(
            def.name.to_string(),
            CVarEntry {
                value: def.default.clone(),
                default: def.default.clone(),
                flags: def.flags,
                help: def.help.to_string(),
            },
        );
        Ok(())
    }

    /// Регистрирует группу; при конфликте ничего не регистрирует
    pub fn register_all(&mut self, defs: &[CVarDef]) -> Result<(), CVarError> {
        if let Some(taken) = defs.iter().find(|d| self.vars.contains_key(d.name)) {
            return Err(CVarError::AlreadyRegistered(taken.name.to_string()));
        }
        for def in defs {
            self.register(def)?;
        }
        Ok(())
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.vars.remove(name).is_some()
    }

    /// Возвращает число реально удалённых
    pub fn unregister_all(&mut self, defs: &[CVarDef]) -> usize {
        defs.iter().filter(|d| self.unregister(d.name)).count()
    }

    /// Module unload: освобождаем всё
    pub fn release_all(&mut self) {
        self.vars.clear();
    }

    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.keys().map(String::as_str)
    }

    pub fn entry(&self, name: &str) -> Option<&CVarEntry> {
        self.vars.get(name)
    }

    pub fn get(&self, name: &str) -> Option<&CVarValue> {
        self.vars.get(name).map(|e| &e.value)
    }

    pub fn get_float(&self, name: &str) -> Result<f32, CVarError> {
        match self.lookup(name)? {
            CVarValue::Float(v) => Ok(*v),
            CVarValue::Int(v) => Ok(*v as f32),
            other => Err(mismatch(name, "float", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<i32, CVarError> {
        match self.lookup(name)? {
            CVarValue::Int(v) => Ok(*v),
            other => Err(mismatch(name, "int", other)),
        }
    }

    pub fn get_string(&self, name: &str) -> Result<&str, CVarError> {
        match self.lookup(name)? {
            CVarValue::String(v) => Ok(v.as_str()),
            other => Err(mismatch(name, "string", other)),
        }
    }

    /// Записывает значение; тип должен совпадать с зарегистрированным.
    /// Int можно записать в float cvar.
    pub fn set(&mut self, name: &str, value: CVarValue) -> Result<(), CVarError> {
        let value = self.coerce(name, value)?;
        if let Some(entry) = self.vars.get_mut(name) {
            entry.value = value;
        }
        Ok(())
    }

    /// Приводит значение к типу зарегистрированной cvar, store не трогает
    fn coerce(&self, name: &str, value: CVarValue) -> Result<CVarValue, CVarError> {
        match (self.lookup(name)?, value) {
            (CVarValue::Float(_), CVarValue::Int(v)) => Ok(CVarValue::Float(v as f32)),
            (current, value) if current.type_name() == value.type_name() => Ok(value),
            (current, value) => Err(CVarError::TypeMismatch {
                name: name.to_string(),
                expected: current.type_name(),
                actual: value.type_name(),
            }),
        }
    }

    pub fn set_from_str(&mut self, name: &str, raw: &str) -> Result<(), CVarError> {
        let parsed = self
            .lookup(name)?
            .parse_same_type(raw)
            .ok_or_else(|| CVarError::Parse {
                name: name.to_string(),
                raw: raw.to_string(),
            })?;
        self.set(name, parsed)
    }

    pub fn reset(&mut self, name: &str) -> Result<(), CVarError> {
        let entry = self
            .vars
            .get_mut(name)
            .ok_or_else(|| CVarError::NotFound(name.to_string()))?;
        entry.value = entry.default.clone();
        Ok(())
    }

    /// Console line: `"<name>"` читает, `"<name> <value>"` записывает.
    ///
    /// Возвращает строку для вывода в console (`name = value`).
    pub fn execute(&mut self, line: &str) -> Result<String, CVarError> {
        let line = line.trim();
        let (name, raw) = match line.split_once(char::is_whitespace) {
            Some((name, raw)) => (name, Some(raw.trim())),
            None => (line, None),
        };

        if name.is_empty() {
            return Err(CVarError::EmptyCommand);
        }

        if let Some(raw) = raw {
            let cheat = self.entry(name).map(|e| e.flags.cheat).unwrap_or(false);
            if cheat && !self.cheats_enabled {
                crate::log_warning(&format!("cvar '{}' is cheat protected", name));
            } else {
                self.set_from_str(name, raw)?;
            }
        }

        Ok(format!("{} = {}", name, self.lookup(name)?))
    }

    /// Применяет JSON объект `{ "name": value, ... }` поверх текущих значений.
    ///
    /// Неизвестные имена пропускаются с warning. Все или ничего: при ошибке
    /// в любой записи store не меняется. Возвращает число применённых.
    pub fn apply_overrides_json(&mut self, json: &str) -> Result<usize, CVarError> {
        let overrides: serde_json::Map<String, serde_json::Value> = serde_json::from_str(json)?;
        let mut checked = Vec::with_capacity(overrides.len());

        for (name, raw) in &overrides {
            if !self.contains(name) {
                crate::log_warning(&format!("cvar override '{}' ignored: not registered", name));
                continue;
            }

            let value = CVarValue::from_json(raw).ok_or_else(|| CVarError::Parse {
                name: name.clone(),
                raw: raw.to_string(),
            })?;
            checked.push((name, self.coerce(name, value)?));
        }

        let applied = checked.len();
        for (name, value) in checked {
            if let Some(entry) = self.vars.get_mut(name.as_str()) {
                entry.value = value;
            }
        }

        Ok(applied)
    }

    fn lookup(&self, name: &str) -> Result<&CVarValue, CVarError> {
        self.get(name).ok_or_else(|| CVarError::NotFound(name.to_string()))
    }
}

fn mismatch(name: &str, expected: &'static str, actual: &CVarValue) -> CVarError {
    CVarError::TypeMismatch {
        name: name.to_string(),
        expected,
        actual: actual.type_name(),
    }
}
