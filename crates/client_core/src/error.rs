use std::{io, path::PathBuf};

use thiserror::Error;

/// The network layer never produced a response.
#[derive(Debug, Error)]
pub enum TransportFailure {
    #[error("failed to build http client: {0}")]
    Client(String),
    #[error("request could not be delivered: {0}")]
    Unreachable(String),
    #[error("response body could not be read: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("endpoint url is empty")]
    Empty,
    #[error("endpoint url must start with http:// or https:// (got '{0}')")]
    InvalidScheme(String),
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write settings file '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("settings file '{}' is not a JSON object of strings: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    InvalidEndpoint(#[from] EndpointError),
}

/// Failures on the voice path before a value reaches the dispatch service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("no valid number (1-5) recognized in '{transcript}'")]
    Unrecognized { transcript: String },
    #[error("speech recognition is not supported on this platform")]
    UnsupportedSpeechPlatform,
    #[error("speech recognition failed: {0}")]
    Recognition(String),
    #[error("a listening session is already active")]
    SessionActive,
    #[error("listening ended without a result")]
    NoResult,
}
