//! Core use-case services.
//!
//! # Responsibility
//! - Turn loose caller payloads into typed repository calls.
//! - Wrap repository outcomes in status-bearing result envelopes.

pub mod item_service;
