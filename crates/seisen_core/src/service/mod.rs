//! Session use-case services.
//!
//! # Responsibility
//! - Orchestrate store and selector calls into user-level operations.
//! - Serialize session mutations on one context and publish snapshots.
//!
//! # Invariants
//! - The controller is the only owner of session state.
//! - Hosts talk to a running session through `SessionHandle` messages.

pub mod actor;
pub mod session;
