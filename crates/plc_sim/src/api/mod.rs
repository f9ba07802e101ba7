//! `writeValue` handling for the simulated controller.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use shared::{
    domain::{ActivationSource, SignalValue},
    error::{ErrorCode, JsonRpcError},
    protocol::{JsonRpcResponse, JSONRPC_VERSION, WRITE_VALUE_METHOD},
};

/// Server-defined code for in-range values the controller refuses.
pub const REJECTED_VALUE_CODE: i64 = -32000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrittenSignal {
    pub value: SignalValue,
    pub source: ActivationSource,
    pub request_id: Option<i64>,
    pub written_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct Register {
    last: Option<WrittenSignal>,
    writes: u64,
    reject_values: HashSet<i64>,
}

impl Register {
    pub fn new(reject_values: impl IntoIterator<Item = i64>) -> Self {
        Self {
            last: None,
            writes: 0,
            reject_values: reject_values.into_iter().collect(),
        }
    }

    pub fn last(&self) -> Option<WrittenSignal> {
        self.last
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Applies one decoded request body and produces the response envelope.
    pub fn handle(&mut self, request: &Value) -> JsonRpcResponse {
        let id = request.get("id").and_then(Value::as_i64);

        if request.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return JsonRpcResponse::failure(
                id,
                JsonRpcError::new(ErrorCode::InvalidRequest, "Invalid Request"),
            );
        }

        match request.get("method").and_then(Value::as_str) {
            Some(WRITE_VALUE_METHOD) => {}
            Some(other) => {
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(
                        ErrorCode::MethodNotFound,
                        format!("Method not found: {other}"),
                    ),
                )
            }
            None => {
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(ErrorCode::InvalidRequest, "Invalid Request"),
                )
            }
        }

        let params = request.get("params").cloned().unwrap_or(Value::Null);
        let Some(raw_value) = params.get("value").and_then(Value::as_i64) else {
            return JsonRpcResponse::failure(
                id,
                JsonRpcError::new(ErrorCode::InvalidParams, "params.value must be an integer"),
            );
        };
        let value = match SignalValue::new(raw_value) {
            Ok(value) => value,
            Err(err) => {
                return JsonRpcResponse::failure(
                    id,
                    JsonRpcError::new(ErrorCode::InvalidParams, err.to_string()),
                )
            }
        };
        let source = match params.get("source") {
            Some(raw) => match serde_json::from_value::<ActivationSource>(raw.clone()) {
                Ok(source) => source,
                Err(_) => {
                    return JsonRpcResponse::failure(
                        id,
                        JsonRpcError::new(
                            ErrorCode::InvalidParams,
                            format!("unknown activation source: {raw}"),
                        ),
                    )
                }
            },
            None => ActivationSource::Manual,
        };

        if self.reject_values.contains(&raw_value) {
            return JsonRpcResponse::failure(
                id,
                JsonRpcError::new(
                    ErrorCode::Server(REJECTED_VALUE_CODE),
                    format!("value {value} rejected by controller"),
                ),
            );
        }

        self.last = Some(WrittenSignal {
            value,
            source,
            request_id: id,
            written_at: Utc::now(),
        });
        self.writes += 1;

        JsonRpcResponse::success(id, json!({ "written": value, "source": source }))
    }
}

pub fn parse_error() -> JsonRpcResponse {
    JsonRpcResponse::failure(None, JsonRpcError::new(ErrorCode::ParseError, "Parse error"))
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
