//! Identifiers, name tables и tag state
//!
//! Любое имя резолвится в id; отсутствующее имя даёт `INVALID`
//! sentinel, операции с INVALID: no-op.

use serde::{Deserialize, Serialize};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }

            pub fn index(self) -> Option<usize> {
                self.is_valid().then_some(self.0 as usize)
            }
        }
    };
}

define_id!(
    /// Fragment (idle, sword select, ...) внутри controller definition
    FragmentId
);
define_id!(
    /// Один boolean tag
    TagId
);
define_id!(
    /// Группа взаимоисключающих tags (например Weapon: Magic | Sword | Knife)
    TagGroupId
);
define_id!(
    /// Scope context (слот анимации, связанный с character instance)
    ScopeContextId
);

/// Упорядоченная таблица имён → индекс
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    names: Vec<String>,
}

impl NameTable {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn find_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Добавляет имя если его нет, возвращает индекс
    fn intern(&mut self, name: &str) -> usize {
        match self.find_index(name) {
            Some(index) => index,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        }
    }
}

/// Максимум tags в одной definition (TagState: u64 bitset)
pub const MAX_TAGS: usize = 64;

/// Описание одного tag в JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl TagEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
        }
    }

    pub fn grouped(name: impl Into<String>, group: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: Some(group.into()),
        }
    }
}

/// Tag definition: tags + их группы
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDefinition {
    tags: NameTable,
    groups: NameTable,
    /// group каждого tag (по индексу tag)
    tag_groups: Vec<Option<TagGroupId>>,
}

impl TagDefinition {
    /// None если tags больше чем `MAX_TAGS`
    pub fn new(entries: &[TagEntry]) -> Option<Self> {
        if entries.len() > MAX_TAGS {
            return None;
        }

        let mut def = TagDefinition::default();
        for entry in entries {
            def.tags.names.push(entry.name.clone());
            let group = entry
                .group
                .as_deref()
                .map(|g| TagGroupId(def.groups.intern(g) as u32));
            def.tag_groups.push(group);
        }
        Some(def)
    }

    pub fn find(&self, name: &str) -> TagId {
        self.tags
            .find_index(name)
            .map(|i| TagId(i as u32))
            .unwrap_or(TagId::INVALID)
    }

    pub fn find_group(&self, name: &str) -> TagGroupId {
        self.groups
            .find_index(name)
            .map(|i| TagGroupId(i as u32))
            .unwrap_or(TagGroupId::INVALID)
    }

    pub fn tag_name(&self, tag: TagId) -> Option<&str> {
        tag.index().and_then(|i| self.tags.name(i))
    }

    pub fn group_of(&self, tag: TagId) -> Option<TagGroupId> {
        tag.index().and_then(|i| self.tag_groups.get(i).copied().flatten())
    }

    pub fn tag_count(&self) -> usize {
        self.tags.len()
    }

    /// Маска всех tags группы
    pub fn group_mask(&self, group: TagGroupId) -> TagState {
        let mut mask = TagState::EMPTY;
        for (index, tag_group) in self.tag_groups.iter().enumerate() {
            if *tag_group == Some(group) && group.is_valid() {
                mask.set(TagId(index as u32), true);
            }
        }
        mask
    }

    /// Собирает TagState из имён; неизвестные имена игнорируются
    pub fn state_from_names<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> TagState {
        let mut state = TagState::EMPTY;
        for name in names {
            state.set(self.find(name), true);
        }
        state
    }
}

/// Bitset tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagState(u64);

impl TagState {
    pub const EMPTY: TagState = TagState(0);

    pub fn bits(self) -> u64 {
        self.0
    }

    pub fn set(&mut self, tag: TagId, on: bool) {
        let Some(index) = tag.index().filter(|i| *i < MAX_TAGS) else {
            return;
        };
        if on {
            self.0 |= 1u64 << index;
        } else {
            self.0 &= !(1u64 << index);
        }
    }

    pub fn is_set(self, tag: TagId) -> bool {
        tag.index()
            .filter(|i| *i < MAX_TAGS)
            .is_some_and(|i| self.0 & (1u64 << i) != 0)
    }

    pub fn union(self, other: TagState) -> TagState {
        TagState(self.0 | other.0)
    }

    pub fn contains(self, other: TagState) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn without(self, mask: TagState) -> TagState {
        TagState(self.0 & !mask.0)
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}
