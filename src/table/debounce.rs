//! Debounced search input
//!
//! Keeps the raw (pending) text separate from the committed text the table
//! filters with. Every keystroke cancels the scheduled commit and schedules
//! a new one, so only text that stayed unchanged for the whole quiet period
//! reaches the filter.

use crate::constants::SEARCH_DEBOUNCE_MS;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct DebouncedInput {
    pending: String,
    delay: Duration,
    committed_tx: watch::Sender<String>,
    timer: Option<JoinHandle<()>>,
}

impl Default for DebouncedInput {
    fn default() -> Self {
        Self::new(Duration::from_millis(SEARCH_DEBOUNCE_MS))
    }
}

impl DebouncedInput {
    pub fn new(delay: Duration) -> Self {
        let (committed_tx, _) = watch::channel(String::new());
        Self {
            pending: String::new(),
            delay,
            committed_tx,
            timer: None,
        }
    }

    /// Records a keystroke and reschedules the commit
    ///
    /// Must be called inside a tokio runtime.
    pub fn input(&mut self, text: impl Into<String>) {
        self.pending = text.into();
        self.cancel();

        let tx = self.committed_tx.clone();
        let delay = self.delay;
        let text = self.pending.clone();
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            commit(&tx, text);
        }));
    }

    /// Commits the pending text now
    pub fn flush(&mut self) {
        self.cancel();
        commit(&self.committed_tx, self.pending.clone());
    }

    /// Raw text as typed
    pub fn pending(&self) -> &str {
        &self.pending
    }

    /// Text the filter should use
    pub fn committed(&self) -> String {
        self.committed_tx.borrow().clone()
    }

    /// True while a commit is scheduled
    pub fn is_settling(&self) -> bool {
        self.timer
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Watches committed values
    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.committed_tx.subscribe()
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl Drop for DebouncedInput {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Publishes `text` unless it is already the committed value
fn commit(tx: &watch::Sender<String>, text: String) {
    tx.send_if_modified(|current| {
        if *current == text {
            false
        } else {
            *current = text;
            true
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_commits_after_quiet_period() {
        let mut input = DebouncedInput::default();
        input.input("bit");
        assert_eq!(input.pending(), "bit");
        assert_eq!(input.committed(), "");
        assert!(input.is_settling());

        tokio::time::sleep(Duration::from_millis(299)).await;
        assert_eq!(input.committed(), "");

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(input.committed(), "bit");
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_cancels_pending_commit() {
        let mut input = DebouncedInput::default();
        let mut rx = input.subscribe();

        input.input("b");
        tokio::time::sleep(Duration::from_millis(200)).await;
        input.input("bi");
        tokio::time::sleep(Duration::from_millis(200)).await;
        input.input("bitcoin");

        // 400ms after the first keystroke nothing has been committed
        assert_eq!(input.committed(), "");

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "bitcoin");

        // Only the final text was ever published
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_flush_commits_immediately() {
        let mut input = DebouncedInput::default();
        input.input("eth");
        input.flush();
        assert_eq!(input.committed(), "eth");
        assert!(!input.is_settling());
    }
}
