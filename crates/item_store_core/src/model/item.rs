//! Item domain model.
//!
//! # Responsibility
//! - Define the record held by the item store.
//! - Validate candidate values before they become an `Item`.
//!
//! # Invariants
//! - `name` is never empty.
//! - `price`, when set, is finite and `>= 0`.
//! - `id` is assigned once by the store and never changes.

use crate::model::fields::ItemPatch;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Sequential item identifier, exposed as its decimal string ("1", "2", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// First id handed out by an empty store.
    pub const FIRST: ItemId = ItemId(1);

    /// Wraps a raw sequence number. Zero is not a valid id.
    pub fn new(value: u64) -> Option<Self> {
        (value > 0).then_some(Self(value))
    }

    /// Parses the canonical string form.
    ///
    /// Only exact decimal renderings match: `"01"`, `"+1"` and `" 1"` are
    /// rejected so lookups behave as exact string comparison.
    pub fn parse(value: &str) -> Option<Self> {
        let number = value.parse::<u64>().ok()?;
        let id = Self::new(number)?;
        (id.to_string() == value).then_some(id)
    }

    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }

    /// Following id, or `None` once the sequence is exhausted.
    pub(crate) fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid item id `{raw}`")))
    }
}

/// Single field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemValidationError {
    /// `nome` is absent, not a string, or empty.
    MissingName,
    /// `preco` is not a finite number `>= 0`.
    InvalidPrice,
    /// `ativo` is not a boolean.
    InvalidActive,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "nome is required and must be a non-empty string"),
            Self::InvalidPrice => write!(f, "preco must be a number >= 0"),
            Self::InvalidActive => write!(f, "ativo must be a boolean"),
        }
    }
}

impl Error for ItemValidationError {}

/// Every validation failure found for one candidate, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemValidationErrors(Vec<ItemValidationError>);

impl ItemValidationErrors {
    pub fn as_slice(&self) -> &[ItemValidationError] {
        &self.0
    }

    pub fn contains(&self, error: ItemValidationError) -> bool {
        self.0.contains(&error)
    }

    /// Human-readable messages, one per failure.
    pub fn messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl Display for ItemValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.messages().join("; "))
    }
}

impl Error for ItemValidationErrors {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.first().map(|err| err as &(dyn Error + 'static))
    }
}

/// Canonical item record.
///
/// Wire names follow the external schema (`nome`, `preco`, `ativo`).
/// Deserialization goes through the same checks as `validate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ItemRecord")]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "nome")]
    pub name: String,
    /// Serialized as `null` when unset.
    #[serde(rename = "preco")]
    pub price: Option<f64>,
    #[serde(rename = "ativo")]
    pub active: bool,
}

#[derive(Deserialize)]
struct ItemRecord {
    id: ItemId,
    nome: String,
    #[serde(default)]
    preco: Option<f64>,
    ativo: bool,
}

impl TryFrom<ItemRecord> for Item {
    type Error = ItemValidationErrors;

    fn try_from(value: ItemRecord) -> Result<Self, Self::Error> {
        let item = Self {
            id: value.id,
            name: value.nome,
            price: value.preco,
            active: value.ativo,
        };
        item.validate()?;
        Ok(item)
    }
}

impl Item {
    /// Builds a new item from a projected create payload.
    ///
    /// # Invariants
    /// - `active` defaults to `true` when the patch does not carry it.
    /// - All failures are reported together; nothing is built on error.
    pub fn from_patch(id: ItemId, patch: &ItemPatch) -> Result<Self, ItemValidationErrors> {
        Self::from_values(
            id,
            patch.name.as_ref().unwrap_or(&Value::Null),
            patch.price.as_ref().unwrap_or(&Value::Null),
            patch.active.as_ref().unwrap_or(&Value::Bool(true)),
        )
    }

    /// Shallow-merges `patch` over a copy of this item and validates the result.
    ///
    /// Fields absent from the patch keep their current value. `self` is
    /// never modified.
    pub fn merge(&self, patch: &ItemPatch) -> Result<Self, ItemValidationErrors> {
        let name = patch
            .name
            .clone()
            .unwrap_or_else(|| Value::String(self.name.clone()));
        let price = patch.price.clone().unwrap_or_else(|| {
            self.price
                .and_then(Number::from_f64)
                .map_or(Value::Null, Value::Number)
        });
        let active = patch.active.clone().unwrap_or(Value::Bool(self.active));
        Self::from_values(self.id, &name, &price, &active)
    }

    /// Checks typed field invariants.
    pub fn validate(&self) -> Result<(), ItemValidationErrors> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(ItemValidationError::MissingName);
        }
        if self.price.is_some_and(|price| !is_valid_price(price)) {
            errors.push(ItemValidationError::InvalidPrice);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ItemValidationErrors(errors))
        }
    }

    /// Marks this item inactive without removing it.
    pub fn soft_delete(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    fn from_values(
        id: ItemId,
        name: &Value,
        price: &Value,
        active: &Value,
    ) -> Result<Self, ItemValidationErrors> {
        let mut errors = Vec::new();

        let name = match name {
            Value::String(value) if !value.is_empty() => Some(value.clone()),
            _ => {
                errors.push(ItemValidationError::MissingName);
                None
            }
        };

        let price = match price {
            Value::Null => Some(None),
            Value::Number(number) => match number.as_f64() {
                Some(value) if is_valid_price(value) => Some(Some(value)),
                _ => {
                    errors.push(ItemValidationError::InvalidPrice);
                    None
                }
            },
            _ => {
                errors.push(ItemValidationError::InvalidPrice);
                None
            }
        };

        let active = match active {
            Value::Bool(value) => Some(*value),
            _ => {
                errors.push(ItemValidationError::InvalidActive);
                None
            }
        };

        match (name, price, active) {
            (Some(name), Some(price), Some(active)) => Ok(Self {
                id,
                name,
                price,
                active,
            }),
            _ => Err(ItemValidationErrors(errors)),
        }
    }
}

fn is_valid_price(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}
