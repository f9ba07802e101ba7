//! Speech session seam. A recognizer yields exactly one event per session.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    /// Final transcript, as produced by the engine.
    Recognized(String),
    /// Engine error code, e.g. `no-speech` or `audio-capture`.
    Failed(String),
    Ended,
}

#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    fn is_supported(&self) -> bool {
        true
    }

    async fn listen(&self) -> SpeechEvent;
}

pub struct UnsupportedRecognizer;

#[async_trait]
impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    async fn listen(&self) -> SpeechEvent {
        SpeechEvent::Failed("not-supported".to_string())
    }
}

/// Replays queued events, one per session, then reports `Ended`.
#[derive(Default)]
pub struct ScriptedRecognizer {
    events: Mutex<VecDeque<SpeechEvent>>,
}

impl ScriptedRecognizer {
    pub fn new(events: impl IntoIterator<Item = SpeechEvent>) -> Self {
        Self {
            events: Mutex::new(events.into_iter().collect()),
        }
    }

    pub fn transcript(text: impl Into<String>) -> Self {
        Self::new([SpeechEvent::Recognized(text.into())])
    }
}

#[async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn listen(&self) -> SpeechEvent {
        self.events
            .lock()
            .await
            .pop_front()
            .unwrap_or(SpeechEvent::Ended)
    }
}

/// Shared "listening" indicator; at most one session holds it.
#[derive(Debug, Clone, Default)]
pub struct ListeningFlag {
    active: Arc<AtomicBool>,
}

impl ListeningFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_listening(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn try_begin(&self) -> Result<ListeningGuard, CommandError> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| CommandError::SessionActive)?;
        Ok(ListeningGuard {
            active: Arc::clone(&self.active),
        })
    }
}

/// Clears the listening flag however the session terminates.
#[derive(Debug)]
pub struct ListeningGuard {
    active: Arc<AtomicBool>,
}

impl Drop for ListeningGuard {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_session_at_a_time() {
        let flag = ListeningFlag::new();
        let guard = flag.try_begin().expect("first session");
        assert!(flag.is_listening());
        assert_eq!(
            flag.try_begin().expect_err("second session"),
            CommandError::SessionActive
        );
        drop(guard);
        assert!(!flag.is_listening());
        assert!(flag.try_begin().is_ok());
    }

    #[tokio::test]
    async fn scripted_recognizer_ends_after_queue() {
        let recognizer = ScriptedRecognizer::new([
            SpeechEvent::Recognized("dos".to_string()),
            SpeechEvent::Failed("no-speech".to_string()),
        ]);
        assert_eq!(
            recognizer.listen().await,
            SpeechEvent::Recognized("dos".to_string())
        );
        assert_eq!(
            recognizer.listen().await,
            SpeechEvent::Failed("no-speech".to_string())
        );
        assert_eq!(recognizer.listen().await, SpeechEvent::Ended);
    }

    #[test]
    fn unsupported_recognizer_reports_itself() {
        assert!(!UnsupportedRecognizer.is_supported());
    }
}
