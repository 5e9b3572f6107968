//! Core domain logic for Seisen.
//! This crate owns note storage, random selection, session state and the
//! periodic notification timer; hosts only render and deliver.

pub mod config;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod select;
pub mod service;

pub use config::{
    ConfigError, SeisenConfig, DEFAULT_EMPTY_FALLBACK, DEFAULT_NOTIFICATION_TITLE,
    LOADING_PLACEHOLDER,
};
pub use logging::{default_log_level, init_logging, init_logging_for, logging_status};
pub use model::category::{parse_category, Category, CategoryError};
pub use model::note::{NoteSet, Theme};
pub use notify::scheduler::{NoteSupplier, NotificationScheduler, SchedulerError};
pub use notify::{Notification, Notifier, NotifyError};
pub use repo::note_store::{
    Appended, DefaultsReport, FileNoteStore, NoteStore, NoteStoreError, StoreResult,
};
pub use select::random::{
    select_note, DefaultRandomSource, RandomSource, RngSource, SelectError,
};
pub use service::actor::{spawn_session, SessionHandle};
pub use service::session::{
    reduce, AddNoteOutcome, SessionAction, SessionController, SessionError, SessionOptions,
    SessionPhase, SessionState,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
