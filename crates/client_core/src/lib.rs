use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde_json::Value;
use shared::{
    domain::{ActivationSource, SignalValue},
    error::JsonRpcError,
    protocol::JsonRpcRequest,
};
use tracing::{debug, info, warn};

pub mod error;
pub mod resolver;
pub mod settings;
pub mod speech;
pub mod transport;

pub use error::{CommandError, EndpointError, SettingsError, TransportFailure};
pub use resolver::resolve;
pub use settings::{EndpointConfig, SettingsStore};
pub use transport::{HttpTransport, RawResponse, SignalTransport};

/// Terminal result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Success(SignalValue),
    /// No endpoint configured; the operator should be asked for one.
    ConfigMissing,
    ValueOutOfRange(i64),
    ApiError { code: i64, message: String },
    TransportError { status: u16, body: String },
    ConnectionFailure { reason: String },
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DispatchOutcome::Success(_))
    }

    /// Precondition failures return before any request is built.
    pub fn reached_network(&self) -> bool {
        !matches!(
            self,
            DispatchOutcome::ConfigMissing | DispatchOutcome::ValueOutOfRange(_)
        )
    }

    pub fn phase(&self) -> DispatchPhase {
        if self.is_success() {
            DispatchPhase::Succeeded
        } else {
            DispatchPhase::Failed
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchPhase {
    Idle,
    Validating,
    AwaitingResponse,
    Succeeded,
    Failed,
}

/// Millisecond timestamps, bumped when two calls land in the same millisecond.
#[derive(Debug, Default)]
pub struct RequestIdGenerator {
    last: AtomicI64,
}

impl RequestIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |prev| {
                Some(now.max(prev + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }
}

/// Sends `writeValue` requests to the controller endpoint.
pub struct PlcClient<T: SignalTransport = HttpTransport> {
    transport: T,
    ids: RequestIdGenerator,
}

impl PlcClient<HttpTransport> {
    pub fn new() -> Self {
        Self::with_transport(HttpTransport::new())
    }
}

impl Default for PlcClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: SignalTransport> PlcClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            ids: RequestIdGenerator::new(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn dispatch(
        &self,
        value: i64,
        source: ActivationSource,
        endpoint: Option<&EndpointConfig>,
    ) -> DispatchOutcome {
        let mut phase = DispatchPhase::Idle;
        debug!(?phase, value, %source, "dispatch requested");

        phase = DispatchPhase::Validating;
        let Some(endpoint) = endpoint else {
            warn!(?phase, value, "dispatch rejected: endpoint not configured");
            return DispatchOutcome::ConfigMissing;
        };
        let signal = match SignalValue::new(value) {
            Ok(signal) => signal,
            Err(err) => {
                warn!(?phase, error = %err, "dispatch rejected");
                return DispatchOutcome::ValueOutOfRange(value);
            }
        };

        let request = JsonRpcRequest::write_value(signal, source, self.ids.next_id());
        phase = DispatchPhase::AwaitingResponse;
        info!(
            ?phase,
            value = signal.get(),
            %source,
            id = request.id,
            endpoint = endpoint.url(),
            "sending signal"
        );

        let outcome = match self.transport.post_json(endpoint.url(), &request).await {
            Ok(response) => interpret_response(signal, response),
            Err(err) => DispatchOutcome::ConnectionFailure {
                reason: err.to_string(),
            },
        };

        match &outcome {
            DispatchOutcome::Success(_) => {
                info!(phase = ?outcome.phase(), value = signal.get(), id = request.id, "signal accepted")
            }
            other => {
                warn!(phase = ?outcome.phase(), value = signal.get(), id = request.id, outcome = ?other, "signal dispatch failed")
            }
        }
        outcome
    }
}

/// Maps a received response onto an outcome: status first, then the JSON-RPC error object.
pub fn interpret_response(value: SignalValue, response: RawResponse) -> DispatchOutcome {
    if !response.is_success() {
        return DispatchOutcome::TransportError {
            status: response.status,
            body: response.body,
        };
    }

    let body = response.body.trim();
    if body.is_empty() {
        return DispatchOutcome::Success(value);
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            return DispatchOutcome::ConnectionFailure {
                reason: format!("invalid JSON in response body: {err}"),
            }
        }
    };

    if parsed.is_null() {
        return DispatchOutcome::ConnectionFailure {
            reason: "response body is JSON null".to_string(),
        };
    }

    match parsed.get("error") {
        None => DispatchOutcome::Success(value),
        Some(error) if is_blank_error(error) => DispatchOutcome::Success(value),
        Some(error) => {
            let (code, message) = match serde_json::from_value::<JsonRpcError>(error.clone()) {
                Ok(error) => (error.code, error.message),
                Err(_) => (0, error.to_string()),
            };
            DispatchOutcome::ApiError { code, message }
        }
    }
}

/// Gateways that report success with `"error": 0`, `""`, `false` or `null`.
fn is_blank_error(error: &Value) -> bool {
    match error {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
