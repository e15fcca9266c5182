//! Field whitelist schema and payload projection.
//!
//! # Responsibility
//! - Name the item fields a caller may write.
//! - Project loose JSON payloads onto those fields.
//!
//! # Invariants
//! - `id` is never writable through a payload.
//! - Projection keeps raw JSON values; type checks happen in `Item`.

use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Caller-writable item field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ItemField {
    /// Wire key `nome`. Expects a non-empty string.
    Name,
    /// Wire key `preco`. Expects a number `>= 0` or `null`.
    Price,
    /// Wire key `ativo`. Expects a boolean.
    Active,
}

impl ItemField {
    pub const ALL: [ItemField; 3] = [ItemField::Name, ItemField::Price, ItemField::Active];

    /// Payload key for this field.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "nome",
            Self::Price => "preco",
            Self::Active => "ativo",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "nome" => Some(Self::Name),
            "preco" => Some(Self::Price),
            "ativo" => Some(Self::Active),
            _ => None,
        }
    }
}

/// Set of fields a create/update payload may carry.
///
/// Defaults to every field in `ItemField::ALL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedFields(BTreeSet<ItemField>);

impl Default for AllowedFields {
    fn default() -> Self {
        Self::only(ItemField::ALL)
    }
}

impl AllowedFields {
    pub fn only(fields: impl IntoIterator<Item = ItemField>) -> Self {
        Self(fields.into_iter().collect())
    }

    /// Builds a whitelist from payload key names. Unknown names are ignored.
    pub fn from_keys<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self(keys.into_iter().filter_map(ItemField::from_key).collect())
    }

    pub fn contains(&self, field: ItemField) -> bool {
        self.0.contains(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = ItemField> + '_ {
        self.0.iter().copied()
    }
}

/// Whitelisted, still untyped view of a caller payload.
///
/// `None` means the key was absent; `Some(Value::Null)` means it was sent
/// as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItemPatch {
    pub name: Option<Value>,
    pub price: Option<Value>,
    pub active: Option<Value>,
}

impl ItemPatch {
    /// Projects a JSON object onto the allowed fields.
    ///
    /// Non-object payloads project to an empty patch.
    pub fn from_payload(payload: &Value, allowed: &AllowedFields) -> Self {
        match payload {
            Value::Object(map) => Self::project(map, allowed),
            _ => Self::default(),
        }
    }

    pub fn project(payload: &Map<String, Value>, allowed: &AllowedFields) -> Self {
        let mut patch = Self::default();
        for field in allowed.iter() {
            if let Some(value) = payload.get(field.key()) {
                *patch.slot(field) = Some(value.clone());
            }
        }
        patch
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.active.is_none()
    }

    fn slot(&mut self, field: ItemField) -> &mut Option<Value> {
        match field {
            ItemField::Name => &mut self.name,
            ItemField::Price => &mut self.price,
            ItemField::Active => &mut self.active,
        }
    }
}
