//! Typed errors for schema resolution, model operations and transport.

use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("unknown schema: {0}")]
    Unknown(String),
    #[error("can't redefine schema once it has been set")]
    AlreadySet,
    #[error("invalid schema '{schema}': {reason}")]
    Invalid { schema: String, reason: String },
    #[error("schema load: {0}")]
    Load(String),
    #[error("invalid setting {key}={value}")]
    Setting { key: &'static str, value: String },
}

/// Failure reported by a [`Transport`](crate::transport::Transport).
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    /// The server answered with a non-success status; `body` is the decoded response.
    #[error("http status {status}")]
    Status { status: u16, body: Value },
    #[error("network: {0}")]
    Network(String),
}

impl TransportError {
    /// Raw failure payload, `null` when the request never reached a server.
    pub fn body(&self) -> &Value {
        match self {
            TransportError::Status { body, .. } => body,
            TransportError::Network(_) => &Value::Null,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Network(_) => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Network(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum RestError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("there is no relationship defined for {0}")]
    UndefinedRelation(String),
    #[error("relation '{relation}' needs a value for '{property}'")]
    MissingForeignKey { relation: String, property: String },
    #[error("model has no remote record to delete")]
    NotPersisted,
    #[error("validation: {0}")]
    Validation(String),
    #[error(transparent)]
    Transport(#[from] TransportError),
}
