//! Note store contracts and plain-text file implementation.
//!
//! # Responsibility
//! - Map every category to one UTF-8 text file inside the notes folder.
//! - Seed missing category files with built-in sample content.
//! - Read and append notes using one-note-per-line semantics.
//!
//! # Invariants
//! - `ensure_defaults` never overwrites an existing file.
//! - `append` adds exactly one line per non-empty note and is durable
//!   (`fsync`) before returning.
//! - Files never gain blank lines or glued lines through `append`.
//! - Log events carry metadata only, never note text.

use crate::model::category::Category;
use crate::model::note::NoteSet;
use log::{debug, error, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\r|\n").expect("valid line break regex"));

pub type StoreResult<T> = Result<T, NoteStoreError>;

/// Note store failure.
#[derive(Debug)]
pub enum NoteStoreError {
    /// The backing file or folder could not be read or written.
    StorageUnavailable {
        /// Affected category, `None` for folder-level failures.
        category: Option<Category>,
        path: PathBuf,
        source: io::Error,
    },
}

impl NoteStoreError {
    fn unavailable(category: Option<Category>, path: &Path, source: io::Error) -> Self {
        Self::StorageUnavailable {
            category,
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Display for NoteStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StorageUnavailable {
                category: Some(category),
                path,
                source,
            } => write!(
                f,
                "storage unavailable for category `{category}` at `{}`: {source}",
                path.display()
            ),
            Self::StorageUnavailable {
                category: None,
                path,
                source,
            } => write!(f, "storage unavailable at `{}`: {source}", path.display()),
        }
    }
}

impl Error for NoteStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageUnavailable { source, .. } => Some(source),
        }
    }
}

/// Outcome of one append request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Appended {
    /// The note was written; holds the normalized single-line text.
    Written(String),
    /// Input was empty after trimming; storage was not touched.
    Skipped,
}

/// Summary of one `ensure_defaults` pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultsReport {
    /// Categories whose file was created by this pass.
    pub created: Vec<Category>,
}

/// Storage contract used by the session controller.
pub trait NoteStore {
    /// Creates every missing category file with its sample content.
    fn ensure_defaults(&self) -> StoreResult<DefaultsReport>;
    /// Reads all notes of one category.
    fn load(&self, category: Category) -> StoreResult<NoteSet>;
    /// Appends one note line to a category.
    fn append(&self, category: Category, text: &str) -> StoreResult<Appended>;
}

/// Plain-text note store rooted at one folder.
#[derive(Debug, Clone)]
pub struct FileNoteStore {
    notes_dir: PathBuf,
}

impl FileNoteStore {
    /// Creates a store for `notes_dir`. The folder is created lazily.
    pub fn new(notes_dir: impl Into<PathBuf>) -> Self {
        Self {
            notes_dir: notes_dir.into(),
        }
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Backing file location for one category.
    pub fn path_for(&self, category: Category) -> PathBuf {
        self.notes_dir.join(category.file_name())
    }

    fn ensure_dir(&self) -> StoreResult<()> {
        fs::create_dir_all(&self.notes_dir)
            .map_err(|err| NoteStoreError::unavailable(None, &self.notes_dir, err))
    }

    /// Seeds every category with `seed`, continuing past per-category
    /// failures. Returns the first failure once all categories were tried.
    fn seed_missing(
        &self,
        seed: impl Fn(&Path, &str) -> io::Result<bool>,
    ) -> StoreResult<DefaultsReport> {
        let mut report = DefaultsReport::default();
        let mut first_error = None;
        for category in Category::all().iter().copied() {
            let path = self.path_for(category);
            match seed(&path, category.sample_text()) {
                Ok(true) => {
                    info!(
                        "event=notes_seeded module=store status=ok category={}",
                        category
                    );
                    report.created.push(category);
                }
                Ok(false) => {}
                Err(err) => {
                    error!(
                        "event=notes_seeded module=store status=error category={} error_code=seed_failed error={}",
                        category, err
                    );
                    first_error.get_or_insert(NoteStoreError::unavailable(
                        Some(category),
                        &path,
                        err,
                    ));
                }
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }
}

impl NoteStore for FileNoteStore {
    fn ensure_defaults(&self) -> StoreResult<DefaultsReport> {
        let started_at = Instant::now();
        if let Err(err) = self.ensure_dir() {
            error!(
                "event=notes_ensure_defaults module=store status=error error_code=dir_create_failed error={}",
                err
            );
            return Err(err);
        }

        let result = self.seed_missing(|path, text| {
            create_new_with(path, |file| {
                file.write_all(text.as_bytes())?;
                file.sync_all()
            })
        });
        if let Ok(report) = &result {
            info!(
                "event=notes_ensure_defaults module=store status=ok created={} duration_ms={}",
                report.created.len(),
                started_at.elapsed().as_millis()
            );
        }
        result
    }

    fn load(&self, category: Category) -> StoreResult<NoteSet> {
        let path = self.path_for(category);
        match fs::read_to_string(&path) {
            Ok(content) => {
                let notes = split_notes(&content);
                debug!(
                    "event=notes_load module=store status=ok category={} count={}",
                    category,
                    notes.len()
                );
                Ok(NoteSet::new(category, notes))
            }
            Err(err) => {
                warn!(
                    "event=notes_load module=store status=error category={} error_code=read_failed error={}",
                    category, err
                );
                Err(NoteStoreError::unavailable(Some(category), &path, err))
            }
        }
    }

    fn append(&self, category: Category, text: &str) -> StoreResult<Appended> {
        let Some(line) = normalize_note_line(text) else {
            debug!(
                "event=notes_append module=store status=skip category={} reason=empty_input",
                category
            );
            return Ok(Appended::Skipped);
        };

        self.ensure_dir()?;
        let path = self.path_for(category);
        match append_line(&path, &line) {
            Ok(()) => {
                info!(
                    "event=notes_append module=store status=ok category={} chars={}",
                    category,
                    line.chars().count()
                );
                Ok(Appended::Written(line))
            }
            Err(err) => {
                error!(
                    "event=notes_append module=store status=error category={} error_code=write_failed error={}",
                    category, err
                );
                Err(NoteStoreError::unavailable(Some(category), &path, err))
            }
        }
    }
}

/// Splits raw file content into trimmed, non-empty note lines.
pub fn split_notes(content: &str) -> Vec<String> {
    LINE_BREAK_RE
        .split(content)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalizes user input into one storable line.
///
/// Returns `None` when the input is empty after trimming. Interior line
/// breaks collapse to single spaces so one input always yields one note.
pub fn normalize_note_line(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parts = LINE_BREAK_RE
        .split(trimmed)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>();
    Some(parts.join(" "))
}

/// Runs `write` on a freshly created `path`. Returns `false` without
/// writing when `path` already exists. A failed write removes the partial
/// file so a later pass can seed it again.
fn create_new_with(
    path: &Path,
    write: impl FnOnce(&mut File) -> io::Result<()>,
) -> io::Result<bool> {
    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
        Err(err) => return Err(err),
    };
    if let Err(err) = write(&mut file) {
        drop(file);
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(
                "event=notes_seed_cleanup module=store status=error error={}",
                cleanup
            );
        }
        return Err(err);
    }
    Ok(true)
}

fn append_line(path: &Path, line: &str) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)?;

    let payload = if needs_separator(&mut file)? {
        format!("\n{line}")
    } else {
        line.to_string()
    };
    file.write_all(payload.as_bytes())?;
    file.sync_all()
}

/// True when the file has content that does not end with a line break.
fn needs_separator(file: &mut File) -> io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(false);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0_u8; 1];
    file.read_exact(&mut last)?;
    Ok(!matches!(last[0], b'\n' | b'\r'))
}

#[cfg(test)]
mod tests {
    use super::{create_new_with, normalize_note_line, split_notes, FileNoteStore, NoteStoreError};
    use crate::model::category::Category;
    use std::io::{self, Write};

    #[test]
    fn split_handles_mixed_line_endings_and_blank_lines() {
        let notes = split_notes("one\r\ntwo\n\n  three  \rfour\n");
        assert_eq!(notes, vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn split_of_empty_content_is_empty() {
        assert!(split_notes("").is_empty());
        assert!(split_notes("\n \n").is_empty());
    }

    #[test]
    fn normalize_rejects_whitespace_only_input() {
        assert_eq!(normalize_note_line(""), None);
        assert_eq!(normalize_note_line(" \t\n "), None);
    }

    #[test]
    fn normalize_collapses_interior_line_breaks() {
        assert_eq!(
            normalize_note_line("  Breathe\r\n deeply \n"),
            Some("Breathe deeply".to_string())
        );
    }

    #[test]
    fn failed_seed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("zen.txt");

        let err = create_new_with(&path, |file| {
            file.write_all(b"Respire")?;
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        })
        .expect_err("write failure must surface");
        assert_eq!(err.to_string(), "disk full");
        assert!(!path.exists());

        let created = create_new_with(&path, |file| file.write_all(b"Respire.\nSouris."))
            .expect("retry should seed");
        assert!(created);
        assert_eq!(
            std::fs::read_to_string(&path).expect("seeded file"),
            "Respire.\nSouris."
        );
    }

    #[test]
    fn seeding_continues_past_a_failing_category() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = FileNoteStore::new(dir.path());
        let zen_path = store.path_for(Category::Zen);

        let err = store
            .seed_missing(|path, text| {
                if path == zen_path {
                    return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
                }
                std::fs::write(path, text)?;
                Ok(true)
            })
            .expect_err("zen failure must be reported");

        match err {
            NoteStoreError::StorageUnavailable { category, .. } => {
                assert_eq!(category, Some(Category::Zen));
            }
        }
        for category in Category::all() {
            assert_eq!(
                store.path_for(*category).is_file(),
                *category != Category::Zen,
                "{category}"
            );
        }
    }
}
