//! Typed errors and exit-code mapping.

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate collection: {0}")]
    DuplicateCollection(String),
    #[error("duplicate field: {collection}.{field}")]
    DuplicateField { collection: String, field: String },
    #[error("config load: {0}")]
    Load(String),
    #[error("validation: {0}")]
    Validation(String),
}

/// Failure talking to the remote admin API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("transport: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Status {
        status: u16,
        message: String,
        data: Option<serde_json::Value>,
    },
    #[error("decode: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        ApiError::Status {
            status,
            message: message.into(),
            data: None,
        }
    }

    /// Machine-readable detail for reports: the server's `data` object when it sent one.
    pub fn detail(&self) -> Option<&serde_json::Value> {
        match self {
            ApiError::Status { data, .. } => data.as_ref().filter(|d| !is_empty_object(d)),
            _ => None,
        }
    }
}

fn is_empty_object(v: &serde_json::Value) -> bool {
    v.as_object().map(|o| o.is_empty()).unwrap_or(false)
}

/// A catalog field could not be turned into an admin API field definition.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    #[error("field '{field}': relation target '{target}' does not exist remotely")]
    UnresolvedRelation { field: String, target: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("authentication failed: {0}")]
    Auth(ApiError),
    #[error("listing collections: {0}")]
    Api(#[from] ApiError),
    #[error("run finished with {0} failed step(s)")]
    Incomplete(usize),
}

impl AppError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Auth(_) => 1,
            AppError::Config(_) => 2,
            AppError::Api(_) => 3,
            AppError::Incomplete(_) => 4,
        }
    }
}

/// Serializable error shape used in reports.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&ApiError> for ErrorDetail {
    fn from(e: &ApiError) -> Self {
        let code = match e {
            ApiError::Transport(_) => "transport_error".to_string(),
            ApiError::Status { status, .. } => format!("http_{}", status),
            ApiError::Decode(_) => "decode_error".to_string(),
        };
        ErrorDetail {
            code,
            message: e.to_string(),
            details: e.detail().cloned(),
        }
    }
}
