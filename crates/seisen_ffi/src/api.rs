//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose session operations to Dart via FRB.
//! - Flatten session state into plain view envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Calls that may touch the notes folder or wait on the session lock are
//!   plain FRB calls and run on the FRB worker pool, never on the UI isolate.
//!   Only health checks, `list_categories` and `session_snapshot` are `sync`.
//! - All session calls are serialized through one process-wide mutex.
//! - Session failures come back as `ok=false` envelopes with the last
//!   known view, never as raw errors.

use log::warn;
use seisen_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    AddNoteOutcome, Category, DefaultRandomSource, FileNoteStore, SeisenConfig, SessionController,
    SessionError, SessionOptions, SessionPhase, SessionState,
};
use std::sync::{Mutex, OnceLock, PoisonError};

type FfiSession = SessionController<FileNoteStore, DefaultRandomSource>;
type SessionSlot = Mutex<Option<FfiSession>>;

static SESSION: OnceLock<SessionSlot> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Async on the Dart side; creates the log directory on a worker thread.
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.trim()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One selectable category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryItem {
    /// Stable id passed back to `session_change_category`.
    pub id: String,
    /// Short user-facing label.
    pub label: String,
}

/// Flattened session state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub ready: bool,
    pub category: String,
    pub category_label: String,
    pub current_note: String,
    pub dark_mode: bool,
    pub theme_label: String,
    pub draft_text: String,
}

/// Response envelope for every session call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionResponse {
    /// Whether the operation succeeded.
    pub ok: bool,
    /// Human-readable message for diagnostics/UI.
    pub message: String,
    /// View after the operation (unchanged on failure).
    pub view: SessionView,
}

/// Lists categories in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn list_categories() -> Vec<CategoryItem> {
    Category::all()
        .iter()
        .map(|category| CategoryItem {
            id: category.as_str().to_string(),
            label: category.display_name().to_string(),
        })
        .collect()
}

/// Starts the process session, seeding default notes.
///
/// `notes_dir` overrides the configured folder when non-empty. Calling it
/// again returns the running session unchanged.
///
/// # FFI contract
/// - Async on the Dart side; seeding and loading run on an FRB worker.
/// - The remaining `session_*` mutators follow the same contract.
pub fn session_init(notes_dir: Option<String>) -> SessionResponse {
    init_in(session_slot(), notes_dir)
}

/// Returns the current view without side effects.
///
/// # FFI contract
/// - Sync call; reads in-memory state only.
#[flutter_rust_bridge::frb(sync)]
pub fn session_snapshot() -> SessionResponse {
    with_session(session_slot(), |_| Ok("Session ready.".to_string()))
}

/// Switches to another category.
pub fn session_change_category(category: String) -> SessionResponse {
    with_session(session_slot(), |session| {
        let category = session.change_category(&category)?;
        Ok(format!("Category `{category}` loaded."))
    })
}

/// Shows another random note from the loaded category.
pub fn session_new_note() -> SessionResponse {
    with_session(session_slot(), |session| {
        session.request_new_note()?;
        Ok("New note selected.".to_string())
    })
}

/// Stores the in-progress draft text.
pub fn session_set_draft(text: String) -> SessionResponse {
    with_session(session_slot(), |session| {
        session.set_draft(text)?;
        Ok("Draft updated.".to_string())
    })
}

/// Adds `text` to the active category.
pub fn session_add_note(text: String) -> SessionResponse {
    with_session(session_slot(), |session| {
        add_message(session.add_note(&text)?)
    })
}

/// Adds the current draft to the active category.
pub fn session_submit_draft() -> SessionResponse {
    with_session(session_slot(), |session| {
        add_message(session.submit_draft()?)
    })
}

/// Flips light/dark mode.
pub fn session_toggle_theme() -> SessionResponse {
    with_session(session_slot(), |session| {
        let theme = session.toggle_theme()?;
        Ok(format!("{} enabled.", theme.label()))
    })
}

fn session_slot() -> &'static SessionSlot {
    SESSION.get_or_init(|| Mutex::new(None))
}

fn init_in(slot: &SessionSlot, notes_dir: Option<String>) -> SessionResponse {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(session) = guard.as_ref() {
        return success("Session already initialized.", session.state());
    }

    let mut config = match SeisenConfig::from_env() {
        Ok(config) => config,
        Err(err) => return failure(format!("session_init failed: {err}"), None),
    };
    if let Some(dir) = notes_dir.map(|raw| raw.trim().to_string()) {
        if !dir.is_empty() {
            config.notes_dir = dir.into();
        }
    }

    let mut session = SessionController::new(
        FileNoteStore::new(&config.notes_dir),
        DefaultRandomSource::from_entropy(),
        SessionOptions::from(&config),
    );
    session.initialize();
    let response = success("Session initialized.", session.state());
    *guard = Some(session);
    response
}

fn with_session(
    slot: &SessionSlot,
    op: impl FnOnce(&mut FfiSession) -> Result<String, SessionError>,
) -> SessionResponse {
    let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
    let Some(session) = guard.as_mut() else {
        return failure(SessionError::NotReady.to_string(), None);
    };

    match op(session) {
        Ok(message) => success(message, session.state()),
        Err(err) => {
            warn!(
                "event=ffi_session_call module=ffi status=error error={}",
                err
            );
            failure(err.to_string(), Some(session.state()))
        }
    }
}

fn add_message(outcome: AddNoteOutcome) -> Result<String, SessionError> {
    Ok(match outcome {
        AddNoteOutcome::Added(_) => "Note added.".to_string(),
        AddNoteOutcome::Ignored => "Nothing to add.".to_string(),
    })
}

fn success(message: impl Into<String>, state: &SessionState) -> SessionResponse {
    SessionResponse {
        ok: true,
        message: message.into(),
        view: to_view(state),
    }
}

fn failure(message: impl Into<String>, state: Option<&SessionState>) -> SessionResponse {
    SessionResponse {
        ok: false,
        message: message.into(),
        view: to_view(state.unwrap_or(&SessionState::default())),
    }
}

fn to_view(state: &SessionState) -> SessionView {
    SessionView {
        ready: state.phase == SessionPhase::Ready,
        category: state.active_category.as_str().to_string(),
        category_label: state.active_category.display_name().to_string(),
        current_note: state.current_note.clone(),
        dark_mode: state.theme.is_dark(),
        theme_label: state.theme.label().to_string(),
        draft_text: state.draft_text.clone(),
    }
}
