//! Repository layer contracts and the in-memory item store.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Own the item collection and its id sequence.
//!
//! # Invariants
//! - Write paths validate through `Item` constructors before mutating.
//! - Repository APIs return semantic errors (`Validation`, `NotFound`).

pub mod item_repo;
