//! Operator-visible state: the status line, the transient message and the endpoint.

use std::time::{Duration, Instant};

use client_core::{speech::ListeningFlag, EndpointConfig};

/// How long a transient message stays visible.
pub const MESSAGE_LIFETIME: Duration = Duration::from_secs(4);
pub const INITIAL_STATUS: &str = "Esperando activación...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    pub text: String,
    pub kind: MessageKind,
    shown_at: Instant,
}

impl TransientMessage {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= MESSAGE_LIFETIME
    }
}

#[derive(Debug)]
pub struct OperatorState {
    pub status: String,
    pub endpoint: Option<EndpointConfig>,
    /// Set when the operator must be asked for an endpoint.
    pub settings_open: bool,
    pub listening: ListeningFlag,
    message: Option<TransientMessage>,
}

impl Default for OperatorState {
    fn default() -> Self {
        Self {
            status: INITIAL_STATUS.to_string(),
            endpoint: None,
            settings_open: false,
            listening: ListeningFlag::new(),
            message: None,
        }
    }
}

impl OperatorState {
    pub fn new(endpoint: Option<EndpointConfig>) -> Self {
        Self {
            settings_open: endpoint.is_none(),
            endpoint,
            ..Self::default()
        }
    }

    /// Replaces any current message; the newest message always wins.
    pub fn show_message(&mut self, text: impl Into<String>, kind: MessageKind, now: Instant) {
        self.message = Some(TransientMessage {
            text: text.into(),
            kind,
            shown_at: now,
        });
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    pub fn visible_message(&self, now: Instant) -> Option<&TransientMessage> {
        self.message.as_ref().filter(|message| !message.is_expired(now))
    }

    pub fn is_listening(&self) -> bool {
        self.listening.is_listening()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_waiting_and_prompts_without_endpoint() {
        let state = OperatorState::new(None);
        assert_eq!(state.status, INITIAL_STATUS);
        assert!(state.settings_open);
        assert!(!state.is_listening());

        let configured =
            OperatorState::new(Some(EndpointConfig::parse("http://plc.local").expect("url")));
        assert!(!configured.settings_open);
    }

    #[test]
    fn message_expires_after_four_seconds() {
        let mut state = OperatorState::default();
        let shown = Instant::now();
        state.show_message("hola", MessageKind::Info, shown);

        assert!(state
            .visible_message(shown + Duration::from_millis(3999))
            .is_some());
        assert!(state.visible_message(shown + MESSAGE_LIFETIME).is_none());
    }

    #[test]
    fn newer_message_replaces_older_and_restarts_lifetime() {
        let mut state = OperatorState::default();
        let first = Instant::now();
        state.show_message("primero", MessageKind::Info, first);
        let second = first + Duration::from_secs(3);
        state.show_message("segundo", MessageKind::Error, second);

        let visible = state
            .visible_message(first + Duration::from_secs(5))
            .expect("still visible");
        assert_eq!(visible.text, "segundo");
        assert_eq!(visible.kind, MessageKind::Error);
    }
}
