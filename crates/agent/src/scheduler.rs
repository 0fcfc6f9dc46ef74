//! Delayed UI actions
//!
//! Replies such as the pricing redirect open another storefront surface a
//! fixed delay after they are composed. Each open runs as its own tokio task
//! and fires exactly once. Opens are not deduplicated: asking for a price
//! twice inside the delay window schedules two opens.
//!
//! Every scheduled open returns a [`ScheduledAction`] handle that can cancel
//! it. Dropping the [`ActionScheduler`] cancels whatever is still pending, so
//! a torn-down widget never receives a late callback.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use harvest_chat_core::{ActionSink, UiAction};
use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;
use tokio::time::Instant;

use crate::events::SessionEvent;

/// Handle to one pending open
#[derive(Debug, Clone)]
pub struct ScheduledAction {
    action: UiAction,
    due: Instant,
    abort: AbortHandle,
    fired: Arc<AtomicBool>,
}

impl ScheduledAction {
    pub fn action(&self) -> UiAction {
        self.action
    }

    /// When the open is due to fire
    pub fn due(&self) -> Instant {
        self.due
    }

    /// Cancel the open if it has not fired yet
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Fired or canceled
    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// Spawns and tracks delayed opens for one session
pub struct ActionScheduler {
    sink: Arc<dyn ActionSink>,
    delay: Duration,
    pending: Mutex<Vec<ScheduledAction>>,
    event_tx: Option<broadcast::Sender<SessionEvent>>,
}

impl ActionScheduler {
    pub fn new(sink: Arc<dyn ActionSink>, delay: Duration) -> Self {
        Self {
            sink,
            delay,
            pending: Mutex::new(Vec::new()),
            event_tx: None,
        }
    }

    /// Also report fired actions on a session event channel
    pub fn with_events(mut self, event_tx: broadcast::Sender<SessionEvent>) -> Self {
        self.event_tx = Some(event_tx);
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Open `action` after the configured delay
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, action: UiAction) -> ScheduledAction {
        let sink = Arc::clone(&self.sink);
        let fired = Arc::new(AtomicBool::new(false));
        let fired_flag = Arc::clone(&fired);
        let event_tx = self.event_tx.clone();
        let delay = self.delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fired_flag.store(true, Ordering::SeqCst);
            sink.open(action);
            tracing::debug!(%action, "Delayed action fired");
            if let Some(tx) = event_tx {
                let _ = tx.send(SessionEvent::ActionFired { action });
            }
        });

        let scheduled = ScheduledAction {
            action,
            due: Instant::now() + delay,
            abort: handle.abort_handle(),
            fired,
        };

        let mut pending = self.pending.lock();
        pending.retain(|p| !p.is_finished());
        pending.push(scheduled.clone());

        tracing::debug!(%action, delay_ms = delay.as_millis() as u64, "Action scheduled");
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(SessionEvent::ActionScheduled { action, delay });
        }

        scheduled
    }

    /// Opens that have neither fired nor been canceled
    pub fn pending(&self) -> Vec<ScheduledAction> {
        let mut pending = self.pending.lock();
        pending.retain(|p| !p.is_finished());
        pending.clone()
    }

    /// Cancel everything still pending; returns how many were canceled
    pub fn cancel_all(&self) -> usize {
        let mut pending = self.pending.lock();
        let mut canceled = 0;
        for action in pending.drain(..) {
            if !action.has_fired() && !action.is_finished() {
                action.cancel();
                canceled += 1;
            }
        }
        if canceled > 0 {
            tracing::info!(canceled, "Canceled pending actions");
        }
        canceled
    }
}

impl Drop for ActionScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Sink that remembers every open
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub opened: Mutex<Vec<UiAction>>,
    }

    impl ActionSink for RecordingSink {
        fn open(&self, action: UiAction) {
            self.opened.lock().push(action);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_delay() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ActionScheduler::new(sink.clone(), Duration::from_millis(2000));

        let start = Instant::now();
        let handle = scheduler.schedule(UiAction::OpenQuoteForm);
        assert_eq!(handle.due(), start + Duration::from_millis(2000));
        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(sink.opened.lock().is_empty());
        assert!(!handle.has_fired());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*sink.opened.lock(), vec![UiAction::OpenQuoteForm]);
        assert!(handle.has_fired());

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert_eq!(sink.opened.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_deduplicated() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ActionScheduler::new(sink.clone(), Duration::from_millis(100));

        scheduler.schedule(UiAction::OpenQuoteForm);
        scheduler.schedule(UiAction::OpenQuoteForm);
        assert_eq!(scheduler.pending().len(), 2);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(sink.opened.lock().len(), 2);
        assert!(scheduler.pending().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_single() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ActionScheduler::new(sink.clone(), Duration::from_millis(100));

        let first = scheduler.schedule(UiAction::OpenContactForm);
        scheduler.schedule(UiAction::OpenQuoteForm);
        first.cancel();

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(*sink.opened.lock(), vec![UiAction::OpenQuoteForm]);
        assert!(!first.has_fired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ActionScheduler::new(sink.clone(), Duration::from_millis(100));
        scheduler.schedule(UiAction::OpenAppointmentScheduler);
        drop(scheduler);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(sink.opened.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_reported() {
        let (tx, mut rx) = broadcast::channel(16);
        let sink = Arc::new(RecordingSink::default());
        let scheduler = ActionScheduler::new(sink, Duration::from_millis(10)).with_events(tx);

        scheduler.schedule(UiAction::OpenQuoteForm);
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::ActionScheduled {
                action: UiAction::OpenQuoteForm,
                delay: Duration::from_millis(10),
            }
        );
        assert_eq!(
            rx.recv().await.unwrap(),
            SessionEvent::ActionFired {
                action: UiAction::OpenQuoteForm
            }
        );
    }
}
