use seisen_core::{
    AddNoteOutcome, Category, FileNoteStore, NoteStore, RandomSource, RngSource,
    SessionController, SessionError, SessionOptions, SessionPhase, Theme,
};
use std::fs;
use tempfile::TempDir;

/// Always picks the most recently appended note.
struct LastIndex;

impl RandomSource for LastIndex {
    fn next_index(&mut self, len: usize) -> usize {
        len - 1
    }
}

const SENSEI_SAMPLE: [&str; 3] = ["Respire profondément.", "Continue.", "Tu vas réussir."];
const FALLBACK: &str = "Aucune note disponible";

fn fresh_session<R: RandomSource>(rng: R) -> (TempDir, SessionController<FileNoteStore, R>) {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(dir.path().join("Seisen"));
    let session = SessionController::new(store, rng, SessionOptions::default());
    (dir, session)
}

#[test]
fn fresh_install_initializes_with_a_sensei_note() {
    let (_dir, mut session) = fresh_session(RngSource::seeded(11));
    assert_eq!(session.state().phase, SessionPhase::Uninitialized);
    assert_eq!(session.current_note(), "Chargement…");

    let state = session.initialize().clone();
    assert_eq!(state.phase, SessionPhase::Ready);
    assert_eq!(state.active_category, Category::Sensei);
    assert!(SENSEI_SAMPLE.contains(&state.current_note.as_str()));
    assert_eq!(state.theme, Theme::Light);
    assert!(state.draft_text.is_empty());
}

#[test]
fn initialize_twice_keeps_state() {
    let (_dir, mut session) = fresh_session(RngSource::seeded(5));
    session.initialize();
    session.toggle_theme().unwrap();
    let before = session.state().clone();

    session.initialize();
    assert_eq!(session.state(), &before);
}

#[test]
fn operations_before_initialize_are_rejected() {
    let (_dir, mut session) = fresh_session(RngSource::seeded(1));
    assert!(matches!(session.change_category("zen"), Err(SessionError::NotReady)));
    assert!(matches!(session.request_new_note(), Err(SessionError::NotReady)));
    assert!(matches!(session.add_note("x"), Err(SessionError::NotReady)));
    assert!(matches!(session.toggle_theme(), Err(SessionError::NotReady)));
    assert!(matches!(session.set_draft("x"), Err(SessionError::NotReady)));
}

#[test]
fn zen_category_only_yields_zen_notes() {
    let (dir, mut session) = fresh_session(RngSource::seeded(99));
    session.initialize();

    assert_eq!(session.change_category("zen").unwrap(), Category::Zen);
    let zen = FileNoteStore::new(dir.path().join("Seisen"))
        .load(Category::Zen)
        .unwrap();

    assert!(zen.iter().any(|note| note == session.current_note()));
    for _ in 0..50 {
        let note = session.request_new_note().unwrap().to_string();
        assert!(zen.iter().any(|candidate| candidate == note), "{note} is not zen");
    }
    assert_eq!(session.state().active_category, Category::Zen);
}

#[test]
fn unknown_category_leaves_state_unchanged() {
    let (_dir, mut session) = fresh_session(RngSource::seeded(3));
    session.initialize();
    session.change_category("samurai").unwrap();
    let before = session.state().clone();

    let err = session.change_category("nonexistent").unwrap_err();
    assert!(matches!(err, SessionError::UnknownCategory(ref raw) if raw == "nonexistent"));
    assert_eq!(session.state(), &before);
    assert_eq!(session.notes().category(), Category::Samurai);
}

#[test]
fn add_note_on_life_appends_clears_draft_and_becomes_selectable() {
    let (dir, mut session) = fresh_session(LastIndex);
    session.initialize();
    session.change_category("life").unwrap();
    let life_path = dir.path().join("Seisen").join("life.txt");
    let lines_before = fs::read_to_string(&life_path).unwrap().lines().count();

    session.set_draft("Breathe deeply").unwrap();
    let outcome = session.submit_draft().unwrap();
    assert_eq!(outcome, AddNoteOutcome::Added("Breathe deeply".to_string()));

    let lines_after = fs::read_to_string(&life_path).unwrap().lines().count();
    assert_eq!(lines_after, lines_before + 1);
    assert!(session.state().draft_text.is_empty());
    assert_eq!(session.request_new_note().unwrap(), "Breathe deeply");
}

#[test]
fn blank_add_note_is_ignored_and_keeps_draft() {
    let (dir, mut session) = fresh_session(RngSource::seeded(8));
    session.initialize();
    session.set_draft("   ").unwrap();
    let path = dir.path().join("Seisen").join("sensei_notes.txt");
    let before = fs::read_to_string(&path).unwrap();

    assert_eq!(session.submit_draft().unwrap(), AddNoteOutcome::Ignored);
    assert_eq!(session.add_note("").unwrap(), AddNoteOutcome::Ignored);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
    assert_eq!(session.state().draft_text, "   ");
}

#[test]
fn unreadable_category_degrades_to_fallback_note() {
    let (dir, mut session) = fresh_session(RngSource::seeded(2));
    fs::create_dir_all(dir.path().join("Seisen").join("zen.txt")).unwrap();
    session.initialize();

    session.change_category("zen").unwrap();
    assert_eq!(session.state().active_category, Category::Zen);
    assert_eq!(session.current_note(), FALLBACK);
    assert!(session.notes().is_empty());
    assert_eq!(session.request_new_note().unwrap(), FALLBACK);
}

#[test]
fn notes_dir_that_is_a_file_still_reaches_ready_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("Seisen");
    fs::write(&blocker, "not a folder").unwrap();
    let store = FileNoteStore::new(&blocker);
    let mut session = SessionController::new(store, RngSource::seeded(3), SessionOptions::default());

    let state = session.initialize().clone();
    assert_eq!(state.phase, SessionPhase::Ready);
    assert_eq!(state.active_category, Category::Sensei);
    assert_eq!(state.current_note, FALLBACK);
    assert!(session.notes().is_empty());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a folder");
}

#[test]
fn failed_append_reports_storage_error_and_keeps_draft() {
    let (dir, mut session) = fresh_session(RngSource::seeded(2));
    fs::create_dir_all(dir.path().join("Seisen").join("custom.txt")).unwrap();
    session.initialize();
    session.change_category("custom").unwrap();
    session.set_draft("Garde le cap.").unwrap();

    let err = session.submit_draft().unwrap_err();
    assert!(matches!(err, SessionError::Storage(_)));
    assert_eq!(session.state().draft_text, "Garde le cap.");
}

#[test]
fn empty_category_file_uses_configured_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileNoteStore::new(dir.path());
    fs::write(store.path_for(Category::Custom), "\n\n").unwrap();
    let options = SessionOptions {
        default_category: Category::Custom,
        empty_fallback: "no notes yet".to_string(),
    };
    let mut session = SessionController::new(store, RngSource::seeded(4), options);

    session.initialize();
    assert_eq!(session.state().active_category, Category::Custom);
    assert_eq!(session.current_note(), "no notes yet");

    session.add_note("Première pensée").unwrap();
    assert_eq!(session.current_note(), "Première pensée");
}

#[test]
fn toggle_theme_does_not_touch_note_or_category() {
    let (_dir, mut session) = fresh_session(RngSource::seeded(6));
    session.initialize();
    let note = session.current_note().to_string();

    assert_eq!(session.toggle_theme().unwrap(), Theme::Dark);
    assert_eq!(session.toggle_theme().unwrap(), Theme::Light);
    assert_eq!(session.current_note(), note);
    assert_eq!(session.state().active_category, Category::Sensei);
}

#[test]
fn subscribers_observe_every_published_snapshot() {
    let (_dir, mut session) = fresh_session(RngSource::seeded(7));
    let mut updates = session.subscribe();
    assert_eq!(updates.borrow_and_update().phase, SessionPhase::Uninitialized);

    session.initialize();
    assert!(updates.has_changed().unwrap());
    assert_eq!(updates.borrow_and_update().phase, SessionPhase::Ready);

    session.toggle_theme().unwrap();
    assert_eq!(updates.borrow_and_update().theme, Theme::Dark);
}
