//! Controller layer: operator actions in, dispatch outcomes rendered into state.

pub mod events;
pub mod state;

use std::{sync::Arc, time::Instant};

use client_core::{
    resolve,
    settings::{load_endpoint, save_endpoint},
    speech::{SpeechEvent, SpeechRecognizer},
    CommandError, DispatchOutcome, EndpointConfig, HttpTransport, PlcClient, SettingsError,
    SettingsStore, SignalTransport,
};
use rand::Rng;
use shared::domain::{ActivationSource, SignalValue, MAX_SIGNAL, MIN_SIGNAL};
use tracing::{info, warn};

use events::{
    command_error_feedback, outcome_feedback, recognized_feedback, sending_status,
    settings_error_feedback, Feedback, LISTENING_STATUS, SETTINGS_SAVED_MESSAGE,
};
use state::{MessageKind, OperatorState};

pub struct OperatorController<T: SignalTransport = HttpTransport> {
    client: PlcClient<T>,
    store: Arc<dyn SettingsStore>,
    pub state: OperatorState,
}

impl<T: SignalTransport> OperatorController<T> {
    /// Loads the endpoint once. `endpoint_override` wins over the store for this session only.
    pub fn load(
        client: PlcClient<T>,
        store: Arc<dyn SettingsStore>,
        endpoint_override: Option<&str>,
    ) -> Result<Self, SettingsError> {
        let overridden = endpoint_override.and_then(|raw| match EndpointConfig::parse(raw) {
            Ok(endpoint) => Some(endpoint),
            Err(err) => {
                warn!(error = %err, "ignoring endpoint override");
                None
            }
        });
        let endpoint = match overridden {
            Some(endpoint) => Some(endpoint),
            None => load_endpoint(store.as_ref())?,
        };
        match &endpoint {
            Some(endpoint) => info!(endpoint = endpoint.url(), "endpoint loaded"),
            None => info!("no endpoint configured; prompting operator"),
        }

        Ok(Self {
            client,
            store,
            state: OperatorState::new(endpoint),
        })
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        self.client.transport()
    }

    pub fn endpoint(&self) -> Option<&EndpointConfig> {
        self.state.endpoint.as_ref()
    }

    pub fn save_endpoint(&mut self, url: &str) -> Result<(), SettingsError> {
        match save_endpoint(self.store.as_ref(), url) {
            Ok(endpoint) => {
                info!(endpoint = endpoint.url(), "endpoint saved");
                self.state.endpoint = Some(endpoint);
                self.state.settings_open = false;
                self.state
                    .show_message(SETTINGS_SAVED_MESSAGE, MessageKind::Success, Instant::now());
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "endpoint not saved");
                self.apply(settings_error_feedback(&err));
                Err(err)
            }
        }
    }

    pub async fn manual(&mut self, value: i64) -> DispatchOutcome {
        self.send(value, ActivationSource::Manual).await
    }

    pub async fn random(&mut self) -> DispatchOutcome {
        let value = rand::thread_rng().gen_range(MIN_SIGNAL..=MAX_SIGNAL);
        self.send(value, ActivationSource::Random).await
    }

    pub async fn send(&mut self, value: i64, source: ActivationSource) -> DispatchOutcome {
        if self.state.endpoint.is_some() {
            if let Ok(signal) = SignalValue::new(value) {
                self.state.set_status(sending_status(signal, source));
            }
        }

        let outcome = self
            .client
            .dispatch(value, source, self.state.endpoint.as_ref())
            .await;
        let feedback = outcome_feedback(&outcome, value, source, self.state.endpoint.as_ref());
        self.apply(feedback);
        outcome
    }

    /// Runs one listening session and, if a number is recognized, dispatches it.
    pub async fn voice(
        &mut self,
        recognizer: &dyn SpeechRecognizer,
    ) -> Result<DispatchOutcome, CommandError> {
        if !recognizer.is_supported() {
            return Err(self.fail_command(CommandError::UnsupportedSpeechPlatform));
        }
        let guard = match self.state.listening.try_begin() {
            Ok(guard) => guard,
            Err(err) => return Err(self.fail_command(err)),
        };

        self.state.set_status(LISTENING_STATUS);
        let event = recognizer.listen().await;
        drop(guard);

        match event {
            SpeechEvent::Recognized(raw) => {
                let command = raw.to_lowercase();
                match resolve(&command) {
                    Ok(value) => {
                        info!(transcript = %command, value = value.get(), "voice command recognized");
                        self.apply(recognized_feedback(&command, value));
                        Ok(self.send(value.get(), ActivationSource::Voice).await)
                    }
                    Err(err) => Err(self.fail_command(err)),
                }
            }
            SpeechEvent::Failed(code) => Err(self.fail_command(CommandError::Recognition(code))),
            SpeechEvent::Ended => Err(self.fail_command(CommandError::NoResult)),
        }
    }

    fn fail_command(&mut self, err: CommandError) -> CommandError {
        warn!(error = %err, "voice activation failed");
        self.apply(command_error_feedback(&err));
        err
    }

    fn apply(&mut self, feedback: Feedback) {
        if let Some((text, kind)) = feedback.message {
            self.state.show_message(text, kind, Instant::now());
        }
        if let Some(status) = feedback.status {
            self.state.set_status(status);
        }
        if feedback.prompt_config {
            self.state.settings_open = true;
        }
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
