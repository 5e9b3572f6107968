//! Session state machine and controller.
//!
//! # Responsibility
//! - Own the only business state: active category, displayed note, theme
//!   and draft text.
//! - Orchestrate store loads/appends and random selection per user action.
//! - Publish immutable state snapshots to subscribers.
//!
//! # Invariants
//! - State changes only through `reduce`, a pure function of
//!   `(state, action)`.
//! - Every mutating operation except `initialize` requires `Ready`.
//! - A rejected operation leaves state untouched.
//! - Storage and empty-set failures degrade to the fallback note, never
//!   to a panic.

use crate::config::{SeisenConfig, DEFAULT_EMPTY_FALLBACK, LOADING_PLACEHOLDER};
use crate::model::category::{parse_category, Category, CategoryError};
use crate::model::note::{NoteSet, Theme};
use crate::repo::note_store::{Appended, NoteStore, NoteStoreError};
use crate::select::random::{select_note, RandomSource, SelectError};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use tokio::sync::watch;

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    Ready,
}

/// Snapshot of everything the rendering layer displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub active_category: Category,
    pub current_note: String,
    pub theme: Theme,
    pub draft_text: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            active_category: Category::DEFAULT,
            current_note: LOADING_PLACEHOLDER.to_string(),
            theme: Theme::Light,
            draft_text: String::new(),
        }
    }
}

/// State transitions understood by [`reduce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Initialization finished.
    Ready,
    /// A category was (re)loaded and `note` selected from it.
    CategoryLoaded { category: Category, note: String },
    /// A new note was selected from the already loaded set.
    NoteShown(String),
    DraftEdited(String),
    DraftCleared,
    ThemeToggled,
}

/// Applies one action to a state snapshot.
pub fn reduce(state: SessionState, action: SessionAction) -> SessionState {
    match action {
        SessionAction::Ready => SessionState {
            phase: SessionPhase::Ready,
            ..state
        },
        SessionAction::CategoryLoaded { category, note } => SessionState {
            active_category: category,
            current_note: note,
            ..state
        },
        SessionAction::NoteShown(note) => SessionState {
            current_note: note,
            ..state
        },
        SessionAction::DraftEdited(text) => SessionState {
            draft_text: text,
            ..state
        },
        SessionAction::DraftCleared => SessionState {
            draft_text: String::new(),
            ..state
        },
        SessionAction::ThemeToggled => SessionState {
            theme: state.theme.toggled(),
            ..state
        },
    }
}

/// Session operation errors.
#[derive(Debug)]
pub enum SessionError {
    /// Operation requires `initialize()` first.
    NotReady,
    /// Category id is outside the fixed set; state is unchanged.
    UnknownCategory(String),
    /// A note could not be written.
    Storage(NoteStoreError),
    /// The session actor has shut down.
    Closed,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "session is not initialized"),
            Self::UnknownCategory(value) => write!(f, "unknown category: `{value}`"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Closed => write!(f, "session is closed"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CategoryError> for SessionError {
    fn from(value: CategoryError) -> Self {
        match value {
            CategoryError::UnknownCategory(raw) => Self::UnknownCategory(raw),
        }
    }
}

impl From<NoteStoreError> for SessionError {
    fn from(value: NoteStoreError) -> Self {
        Self::Storage(value)
    }
}

/// Result of an add-note request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddNoteOutcome {
    /// Note stored; holds the normalized text.
    Added(String),
    /// Input was blank; nothing changed.
    Ignored,
}

/// Behavior knobs taken from host configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub default_category: Category,
    pub empty_fallback: String,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_category: Category::DEFAULT,
            empty_fallback: DEFAULT_EMPTY_FALLBACK.to_string(),
        }
    }
}

impl From<&SeisenConfig> for SessionOptions {
    fn from(config: &SeisenConfig) -> Self {
        Self {
            default_category: config.default_category,
            empty_fallback: config.empty_fallback.clone(),
        }
    }
}

/// Session orchestrator over a note store and a random source.
pub struct SessionController<S: NoteStore, R: RandomSource> {
    store: S,
    rng: R,
    options: SessionOptions,
    notes: NoteSet,
    state: SessionState,
    updates: watch::Sender<SessionState>,
}

impl<S: NoteStore, R: RandomSource> SessionController<S, R> {
    /// Creates an uninitialized controller.
    pub fn new(store: S, rng: R, options: SessionOptions) -> Self {
        let state = SessionState {
            active_category: options.default_category,
            ..SessionState::default()
        };
        let (updates, _) = watch::channel(state.clone());
        Self {
            store,
            rng,
            notes: NoteSet::empty(options.default_category),
            options,
            state,
            updates,
        }
    }

    /// Seeds defaults, loads the default category and selects a first note.
    ///
    /// Calling it again once `Ready` is a no-op.
    pub fn initialize(&mut self) -> &SessionState {
        if self.state.phase == SessionPhase::Ready {
            return &self.state;
        }

        if let Err(err) = self.store.ensure_defaults() {
            warn!(
                "event=session_init module=session status=degraded error_code=defaults_failed error={}",
                err
            );
        }
        self.load_category(self.options.default_category);
        self.dispatch(SessionAction::Ready);
        info!(
            "event=session_init module=session status=ok category={} notes={}",
            self.state.active_category,
            self.notes.len()
        );
        &self.state
    }

    /// Switches to another category and selects a note from it.
    ///
    /// # Errors
    /// - `NotReady` before initialization.
    /// - `UnknownCategory` for ids outside the fixed set; state is unchanged.
    pub fn change_category(&mut self, category: &str) -> Result<Category, SessionError> {
        self.ensure_ready()?;
        let category = match parse_category(category) {
            Ok(category) => category,
            Err(err) => {
                info!(
                    "event=category_change module=session status=rejected error_code=unknown_category"
                );
                return Err(err.into());
            }
        };

        self.load_category(category);
        info!(
            "event=category_change module=session status=ok category={} notes={}",
            category,
            self.notes.len()
        );
        Ok(category)
    }

    /// Selects another note from the loaded set without touching storage.
    pub fn request_new_note(&mut self) -> Result<&str, SessionError> {
        self.ensure_ready()?;
        let note = self.pick_note();
        self.dispatch(SessionAction::NoteShown(note));
        Ok(&self.state.current_note)
    }

    /// Replaces the draft text.
    pub fn set_draft(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        self.ensure_ready()?;
        self.dispatch(SessionAction::DraftEdited(text.into()));
        Ok(())
    }

    /// Appends `text` to the active category.
    ///
    /// Blank input is ignored. On success the set is reloaded, a note is
    /// re-selected and the draft is cleared.
    ///
    /// # Errors
    /// - `NotReady` before initialization.
    /// - `Storage` when the append fails; the draft is kept.
    pub fn add_note(&mut self, text: &str) -> Result<AddNoteOutcome, SessionError> {
        self.ensure_ready()?;
        let category = self.state.active_category;
        match self.store.append(category, text)? {
            Appended::Skipped => Ok(AddNoteOutcome::Ignored),
            Appended::Written(line) => {
                self.load_category(category);
                self.dispatch(SessionAction::DraftCleared);
                Ok(AddNoteOutcome::Added(line))
            }
        }
    }

    /// Adds the current draft as a note.
    pub fn submit_draft(&mut self) -> Result<AddNoteOutcome, SessionError> {
        self.ensure_ready()?;
        let draft = self.state.draft_text.clone();
        self.add_note(&draft)
    }

    /// Flips the light/dark theme.
    pub fn toggle_theme(&mut self) -> Result<Theme, SessionError> {
        self.ensure_ready()?;
        self.dispatch(SessionAction::ThemeToggled);
        debug!(
            "event=theme_toggle module=session status=ok theme={:?}",
            self.state.theme
        );
        Ok(self.state.theme)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_note(&self) -> &str {
        &self.state.current_note
    }

    /// Notes loaded for the active category.
    pub fn notes(&self) -> &NoteSet {
        &self.notes
    }

    /// Receives a snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.updates.subscribe()
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        match self.state.phase {
            SessionPhase::Ready => Ok(()),
            SessionPhase::Uninitialized => Err(SessionError::NotReady),
        }
    }

    fn load_category(&mut self, category: Category) {
        self.notes = match self.store.load(category) {
            Ok(notes) => notes,
            Err(err) => {
                warn!(
                    "event=category_load module=session status=degraded category={} error={}",
                    category, err
                );
                NoteSet::empty(category)
            }
        };
        let note = self.pick_note();
        self.dispatch(SessionAction::CategoryLoaded { category, note });
    }

    fn pick_note(&mut self) -> String {
        match select_note(&self.notes, &mut self.rng) {
            Ok(note) => note.to_string(),
            Err(SelectError::EmptySet) => {
                debug!(
                    "event=note_select module=session status=empty category={}",
                    self.notes.category()
                );
                self.options.empty_fallback.clone()
            }
        }
    }

    fn dispatch(&mut self, action: SessionAction) {
        let previous = std::mem::take(&mut self.state);
        self.state = reduce(previous, action);
        self.updates.send_replace(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::{reduce, SessionAction, SessionPhase, SessionState};
    use crate::model::category::Category;
    use crate::model::note::Theme;

    #[test]
    fn reduce_category_loaded_keeps_theme_and_draft() {
        let state = SessionState {
            theme: Theme::Dark,
            draft_text: "draft".to_string(),
            ..SessionState::default()
        };
        let next = reduce(
            state,
            SessionAction::CategoryLoaded {
                category: Category::Zen,
                note: "Respire.".to_string(),
            },
        );
        assert_eq!(next.active_category, Category::Zen);
        assert_eq!(next.current_note, "Respire.");
        assert_eq!(next.theme, Theme::Dark);
        assert_eq!(next.draft_text, "draft");
        assert_eq!(next.phase, SessionPhase::Uninitialized);
    }

    #[test]
    fn reduce_is_pure_over_snapshots() {
        let state = SessionState::default();
        let toggled = reduce(state.clone(), SessionAction::ThemeToggled);
        assert_eq!(state.theme, Theme::Light);
        assert_eq!(toggled.theme, Theme::Dark);
        assert_eq!(reduce(toggled, SessionAction::ThemeToggled), state);
    }

    #[test]
    fn reduce_draft_edit_then_clear() {
        let edited = reduce(
            SessionState::default(),
            SessionAction::DraftEdited("Bois de l'eau.".to_string()),
        );
        assert_eq!(edited.draft_text, "Bois de l'eau.");
        let cleared = reduce(edited, SessionAction::DraftCleared);
        assert!(cleared.draft_text.is_empty());
    }

    #[test]
    fn default_state_shows_loading_placeholder() {
        let state = SessionState::default();
        assert_eq!(state.current_note, "Chargement…");
        assert_eq!(reduce(state, SessionAction::Ready).phase, SessionPhase::Ready);
    }
}
