//! Random note selection.
//!
//! # Responsibility
//! - Pick one note uniformly at random from a loaded note set.
//! - Keep the random source injectable so tests can pin outcomes.

pub mod random;
