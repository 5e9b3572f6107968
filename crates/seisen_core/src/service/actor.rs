//! Serialized session actor.
//!
//! # Responsibility
//! - Run one `SessionController` on a dedicated blocking worker so file I/O
//!   never blocks async or UI threads.
//! - Serialize every session command through one bounded queue.
//!
//! # Invariants
//! - Commands are processed strictly one at a time, in arrival order.
//! - Handles never hold a reference to the controller; they only send
//!   messages. Once the actor stops, every call returns `Closed`.

use crate::model::note::Theme;
use crate::repo::note_store::NoteStore;
use crate::select::random::RandomSource;
use crate::service::session::{AddNoteOutcome, SessionController, SessionError, SessionState};
use log::{debug, info};
use tokio::sync::{mpsc, oneshot, watch};

type Reply<T> = oneshot::Sender<Result<T, SessionError>>;

enum SessionCommand {
    Initialize(Reply<SessionState>),
    ChangeCategory(String, Reply<SessionState>),
    RequestNewNote(Reply<String>),
    SetDraft(String, Reply<()>),
    AddNote(String, Reply<AddNoteOutcome>),
    SubmitDraft(Reply<AddNoteOutcome>),
    ToggleTheme(Reply<Theme>),
    Snapshot(Reply<SessionState>),
    CurrentNote(Reply<String>),
    Subscribe(Reply<watch::Receiver<SessionState>>),
    Shutdown(Reply<()>),
}

impl std::fmt::Debug for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Initialize(_) => "initialize",
            Self::ChangeCategory(..) => "change_category",
            Self::RequestNewNote(_) => "request_new_note",
            Self::SetDraft(..) => "set_draft",
            Self::AddNote(..) => "add_note",
            Self::SubmitDraft(_) => "submit_draft",
            Self::ToggleTheme(_) => "toggle_theme",
            Self::Snapshot(_) => "snapshot",
            Self::CurrentNote(_) => "current_note",
            Self::Subscribe(_) => "subscribe",
            Self::Shutdown(_) => "shutdown",
        };
        f.write_str(name)
    }
}

/// Cloneable async handle to a running session actor.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<SessionCommand>,
}

/// Moves `controller` onto a blocking worker and returns its handle.
///
/// Must be called from within a Tokio runtime. `capacity` bounds the number
/// of queued commands (minimum 1).
pub fn spawn_session<S, R>(controller: SessionController<S, R>, capacity: usize) -> SessionHandle
where
    S: NoteStore + Send + 'static,
    R: RandomSource + Send + 'static,
{
    let (commands, receiver) = mpsc::channel(capacity.max(1));
    tokio::task::spawn_blocking(move || run_actor(controller, receiver));
    SessionHandle { commands }
}

fn run_actor<S, R>(
    mut controller: SessionController<S, R>,
    mut receiver: mpsc::Receiver<SessionCommand>,
) where
    S: NoteStore,
    R: RandomSource,
{
    info!("event=session_actor module=actor status=start");
    while let Some(command) = receiver.blocking_recv() {
        debug!("event=session_command module=actor command={:?}", command);
        match command {
            SessionCommand::Initialize(reply) => {
                let _ = reply.send(Ok(controller.initialize().clone()));
            }
            SessionCommand::ChangeCategory(category, reply) => {
                let result = controller
                    .change_category(&category)
                    .map(|_| controller.state().clone());
                let _ = reply.send(result);
            }
            SessionCommand::RequestNewNote(reply) => {
                let _ = reply.send(controller.request_new_note().map(str::to_string));
            }
            SessionCommand::SetDraft(text, reply) => {
                let _ = reply.send(controller.set_draft(text));
            }
            SessionCommand::AddNote(text, reply) => {
                let _ = reply.send(controller.add_note(&text));
            }
            SessionCommand::SubmitDraft(reply) => {
                let _ = reply.send(controller.submit_draft());
            }
            SessionCommand::ToggleTheme(reply) => {
                let _ = reply.send(controller.toggle_theme());
            }
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(Ok(controller.state().clone()));
            }
            SessionCommand::CurrentNote(reply) => {
                let _ = reply.send(Ok(controller.current_note().to_string()));
            }
            SessionCommand::Subscribe(reply) => {
                let _ = reply.send(Ok(controller.subscribe()));
            }
            SessionCommand::Shutdown(reply) => {
                let _ = reply.send(Ok(()));
                break;
            }
        }
    }
    info!("event=session_actor module=actor status=stopped");
}

impl SessionHandle {
    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> SessionCommand,
    ) -> Result<T, SessionError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| SessionError::Closed)?;
        response.await.map_err(|_| SessionError::Closed)?
    }

    pub async fn initialize(&self) -> Result<SessionState, SessionError> {
        self.request(SessionCommand::Initialize).await
    }

    /// Switches category; returns the resulting snapshot.
    pub async fn change_category(
        &self,
        category: impl Into<String>,
    ) -> Result<SessionState, SessionError> {
        let category = category.into();
        self.request(|reply| SessionCommand::ChangeCategory(category, reply))
            .await
    }

    pub async fn request_new_note(&self) -> Result<String, SessionError> {
        self.request(SessionCommand::RequestNewNote).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        self.request(|reply| SessionCommand::SetDraft(text, reply))
            .await
    }

    pub async fn add_note(&self, text: impl Into<String>) -> Result<AddNoteOutcome, SessionError> {
        let text = text.into();
        self.request(|reply| SessionCommand::AddNote(text, reply))
            .await
    }

    pub async fn submit_draft(&self) -> Result<AddNoteOutcome, SessionError> {
        self.request(SessionCommand::SubmitDraft).await
    }

    pub async fn toggle_theme(&self) -> Result<Theme, SessionError> {
        self.request(SessionCommand::ToggleTheme).await
    }

    pub async fn snapshot(&self) -> Result<SessionState, SessionError> {
        self.request(SessionCommand::Snapshot).await
    }

    /// Text currently displayed, as read on the serialized context.
    pub async fn current_note(&self) -> Result<String, SessionError> {
        self.request(SessionCommand::CurrentNote).await
    }

    pub async fn subscribe(&self) -> Result<watch::Receiver<SessionState>, SessionError> {
        self.request(SessionCommand::Subscribe).await
    }

    /// Stops the actor after already queued commands.
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        self.request(SessionCommand::Shutdown).await
    }
}
