//! Domain model for item records.
//!
//! # Responsibility
//! - Define the canonical item record and its identifier.
//! - Define the field whitelist schema used to project caller payloads.
//!
//! # Invariants
//! - Every stored item is built through a validating constructor.
//! - Caller payload keys outside the whitelist never reach an item.

pub mod fields;
pub mod item;
