use serde::{Deserialize, Serialize};

use crate::{
    domain::{ActivationSource, SignalValue},
    error::JsonRpcError,
};

pub const JSONRPC_VERSION: &str = "2.0";
pub const WRITE_VALUE_METHOD: &str = "writeValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteValueParams {
    pub value: SignalValue,
    pub source: ActivationSource,
}

/// Outbound `writeValue` envelope. Built fresh for every dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub params: WriteValueParams,
    pub id: i64,
}

impl JsonRpcRequest {
    pub fn write_value(value: SignalValue, source: ActivationSource, id: i64) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: WRITE_VALUE_METHOD.to_string(),
            params: WriteValueParams { value, source },
            id,
        }
    }
}

/// Response envelope. Only `error` matters to the operator; `result` is opaque.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Option<i64>,
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

impl JsonRpcResponse {
    pub fn success(id: Option<i64>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Option<i64>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}
