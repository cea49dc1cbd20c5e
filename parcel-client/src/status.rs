use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::client::{uploading_message, UploadOutcome};

/// A single line of upload status for a presentation layer to watch.
///
/// Terminal messages clear themselves after the outcome's delay unless a
/// newer message has replaced them in the meantime.
#[derive(Clone)]
pub struct StatusLine {
    tx: Arc<watch::Sender<String>>,
    generation: Arc<AtomicU64>,
}

impl Default for StatusLine {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLine {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self {
            tx: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> String {
        self.tx.borrow().clone()
    }

    /// Replace the message; returns its generation.
    pub fn show(&self, message: impl Into<String>) -> u64 {
        let message = message.into();
        let mut generation = 0;
        self.tx.send_modify(|current| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *current = message;
        });
        generation
    }

    /// Clear the line if `generation` is still the latest message.
    fn clear_if_current(&self, generation: u64) -> bool {
        self.tx.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            current.clear();
            true
        })
    }

    pub fn uploading(&self, label: &str) -> u64 {
        self.show(uploading_message(label))
    }

    /// Show the terminal message and schedule it to clear.
    pub fn finish(&self, outcome: &UploadOutcome) -> JoinHandle<()> {
        let generation = self.show(outcome.message.clone());
        let delay = outcome.clear_after();
        let line = self.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            line.clear_if_current(generation);
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::UploadStatus;

    fn outcome(message: &str) -> UploadOutcome {
        UploadOutcome {
            status: UploadStatus::Failed,
            message: message.to_string(),
            result: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_message_clears_after_three_seconds() {
        let line = StatusLine::new();
        line.uploading("expo/fetch");
        assert_eq!(line.current(), "Uploading with expo/fetch...");

        let start = tokio::time::Instant::now();
        let clear = line.finish(&outcome("expo/fetch upload failed: boom"));

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(line.current(), "expo/fetch upload failed: boom");

        clear.await.unwrap();
        assert_eq!(line.current(), "");
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn newer_message_is_not_cleared_by_older_timer() {
        let line = StatusLine::new();
        let first = line.finish(&outcome("first"));

        tokio::time::sleep(Duration::from_secs(1)).await;
        let second = line.finish(&outcome("second"));

        first.await.unwrap();
        assert_eq!(line.current(), "second");

        second.await.unwrap();
        assert_eq!(line.current(), "");
    }

    #[test]
    fn stale_generation_never_clears() {
        let line = StatusLine::new();
        let first = line.show("first");
        let second = line.show("second");

        assert!(!line.clear_if_current(first));
        assert_eq!(line.current(), "second");
        assert!(line.clear_if_current(second));
        assert_eq!(line.current(), "");
    }

    #[tokio::test]
    async fn subscribers_see_updates() {
        let line = StatusLine::new();
        let mut rx = line.subscribe();
        line.show("hello");
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), "hello");
    }
}
