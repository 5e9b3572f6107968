//! Uniform note selection over an injectable random source.
//!
//! # Invariants
//! - Selection never mutates the note set.
//! - An empty set yields `SelectError::EmptySet`, never a value.
//! - Same seed and same note set yield the same note.

use crate::model::note::NoteSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Selection failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectError {
    /// The note set has no entries.
    EmptySet,
}

impl Display for SelectError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySet => write!(f, "no notes available"),
        }
    }
}

impl Error for SelectError {}

/// Source of random indices.
///
/// Implementations should return a value in `0..len`; out-of-range values
/// are reduced modulo `len` by [`select_note`].
pub trait RandomSource {
    /// Returns an index for a collection of `len` items. `len` is never zero.
    fn next_index(&mut self, len: usize) -> usize;
}

/// Production source type used by hosts.
pub type DefaultRandomSource = RngSource<StdRng>;

/// Adapter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<StdRng> {
    /// Deterministic source for reproducible selection.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Non-deterministic source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Returns one note chosen uniformly at random.
///
/// # Errors
/// - `SelectError::EmptySet` when `notes` is empty.
pub fn select_note<'a, S>(notes: &'a NoteSet, source: &mut S) -> Result<&'a str, SelectError>
where
    S: RandomSource + ?Sized,
{
    let len = notes.len();
    if len == 0 {
        return Err(SelectError::EmptySet);
    }
    let index = source.next_index(len) % len;
    notes.get(index).ok_or(SelectError::EmptySet)
}
