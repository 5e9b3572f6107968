//! Owned periodic notification timer.
//!
//! # Responsibility
//! - Every interval, ask a `NoteSupplier` for the current note and hand it
//!   to a `Notifier`.
//!
//! # Invariants
//! - First firing happens one full interval after `start`.
//! - `stop` is idempotent and runs on drop, so the timer task never
//!   outlives its owner.
//! - The scheduler holds no reference to session state; it only queries.

use crate::notify::{Notification, Notifier};
use crate::service::actor::SessionHandle;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Scheduler setup errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Interval must be strictly positive.
    InvalidInterval,
}

impl Display for SchedulerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInterval => write!(f, "notification interval must be greater than zero"),
        }
    }
}

impl Error for SchedulerError {}

/// Query for the note to deliver on each firing.
///
/// `None` skips the firing (for example after the session shut down).
pub trait NoteSupplier: Send + Sync + 'static {
    fn supply_note(&self) -> impl Future<Output = Option<String>> + Send;
}

impl NoteSupplier for SessionHandle {
    fn supply_note(&self) -> impl Future<Output = Option<String>> + Send {
        let handle = self.clone();
        async move { handle.current_note().await.ok() }
    }
}

/// Running periodic notification task.
#[derive(Debug)]
pub struct NotificationScheduler {
    interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl NotificationScheduler {
    /// Starts firing every `interval` on the current Tokio runtime.
    ///
    /// # Errors
    /// - `InvalidInterval` for a zero interval.
    pub fn start<S, N>(
        interval: Duration,
        title: impl Into<String>,
        supplier: S,
        notifier: N,
    ) -> Result<Self, SchedulerError>
    where
        S: NoteSupplier,
        N: Notifier + 'static,
    {
        if interval.is_zero() {
            return Err(SchedulerError::InvalidInterval);
        }

        let title = title.into();
        let first_tick = Instant::now() + interval;
        let task = tokio::spawn(async move {
            let mut ticker = time::interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                fire_once(&title, &supplier, &notifier).await;
            }
        });

        info!(
            "event=scheduler_start module=notify status=ok interval_secs={}",
            interval.as_secs()
        );
        Ok(Self {
            interval,
            task: Some(task),
        })
    }

    /// Cancels future firings. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            info!("event=scheduler_stop module=notify status=ok");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl Drop for NotificationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn fire_once<S, N>(title: &str, supplier: &S, notifier: &N)
where
    S: NoteSupplier,
    N: Notifier,
{
    let Some(body) = supplier.supply_note().await else {
        debug!("event=notification_fire module=notify status=skip reason=no_note");
        return;
    };

    let notification = Notification::new(title, body);
    match notifier.deliver(&notification) {
        Ok(()) => debug!(
            "event=notification_fire module=notify status=ok id={}",
            notification.id
        ),
        Err(err) => warn!(
            "event=notification_fire module=notify status=error id={} error={}",
            notification.id, err
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::{NoteSupplier, NotificationScheduler, SchedulerError};
    use crate::notify::{Notification, Notifier, NotifyError};
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    struct FixedNote(Option<&'static str>);

    impl NoteSupplier for FixedNote {
        fn supply_note(&self) -> impl Future<Output = Option<String>> + Send {
            std::future::ready(self.0.map(str::to_string))
        }
    }

    #[derive(Default)]
    struct Recorder {
        delivered: Mutex<Vec<Notification>>,
    }

    impl Notifier for Recorder {
        fn deliver(&self, notification: &Notification) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .expect("recorder lock")
                .push(notification.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Rejecting {
        attempts: AtomicUsize,
    }

    impl Notifier for Rejecting {
        fn deliver(&self, _notification: &Notification) -> Result<(), NotifyError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(NotifyError::Delivery("permission denied".to_string()))
        }
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test(start_paused = true)]
    async fn fires_every_interval_until_stopped() {
        let recorder = Arc::new(Recorder::default());
        let mut scheduler = NotificationScheduler::start(
            HOUR,
            "🧘 Message du Sensei",
            FixedNote(Some("Continue.")),
            Arc::clone(&recorder),
        )
        .expect("scheduler should start");

        tokio::time::sleep(HOUR / 2).await;
        assert!(recorder.delivered.lock().expect("lock").is_empty());

        tokio::time::sleep(HOUR * 3).await;
        {
            let delivered = recorder.delivered.lock().expect("lock");
            assert_eq!(delivered.len(), 3);
            assert!(delivered.iter().all(|n| n.body == "Continue."));
            assert!(delivered.iter().all(|n| n.title == "🧘 Message du Sensei"));
            assert_ne!(delivered[0].id, delivered[1].id);
        }

        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());
        tokio::time::sleep(HOUR * 5).await;
        assert_eq!(recorder.delivered.lock().expect("lock").len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn delivery_failures_do_not_stop_the_timer() {
        let rejecting = Arc::new(Rejecting::default());
        let scheduler = NotificationScheduler::start(
            HOUR,
            "title",
            FixedNote(Some("Respire.")),
            Arc::clone(&rejecting),
        )
        .expect("scheduler should start");

        tokio::time::sleep(HOUR * 2 + HOUR / 2).await;
        assert_eq!(rejecting.attempts.load(Ordering::SeqCst), 2);
        assert!(scheduler.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn missing_note_skips_delivery() {
        let recorder = Arc::new(Recorder::default());
        let _scheduler =
            NotificationScheduler::start(HOUR, "title", FixedNote(None), Arc::clone(&recorder))
                .expect("scheduler should start");

        tokio::time::sleep(HOUR * 3).await;
        assert!(recorder.delivered.lock().expect("lock").is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_releases_the_timer() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = NotificationScheduler::start(
            HOUR,
            "title",
            FixedNote(Some("Zen")),
            Arc::clone(&recorder),
        )
        .expect("scheduler should start");
        drop(scheduler);

        tokio::time::sleep(HOUR * 2).await;
        assert!(recorder.delivered.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn zero_interval_is_rejected() {
        let result = NotificationScheduler::start(
            Duration::ZERO,
            "title",
            FixedNote(Some("x")),
            Recorder::default(),
        );
        assert_eq!(result.err(), Some(SchedulerError::InvalidInterval));
    }
}
