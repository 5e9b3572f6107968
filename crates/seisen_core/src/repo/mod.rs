//! Note storage contracts and the plain-text file implementation.
//!
//! # Responsibility
//! - Define the storage seam used by session orchestration.
//! - Keep file layout and line-separator rules inside the store.
//!
//! # Invariants
//! - Storage failures surface as `NoteStoreError::StorageUnavailable`.
//! - Category files are append-only; no edit or delete API exists.

pub mod note_store;
