//! Domain model for categories, note sets and session display flags.
//!
//! # Responsibility
//! - Define the fixed category set and its built-in sample content.
//! - Provide immutable note sets shared between store, selector and session.
//!
//! # Invariants
//! - The category set is closed; unknown ids never reach storage.
//! - Note sets are replaced wholesale, never mutated in place.

pub mod category;
pub mod note;
