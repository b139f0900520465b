use crate::state::FormState;
use thiserror::Error;

/// Every way a submit attempt can fail.
///
/// Validation variants never reach the gateway; `SubmissionFailed` is never
/// retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("email is empty")]
    ValidationEmpty,
    #[error("email is malformed")]
    ValidationMalformed,
    #[error("submission failed: {0}")]
    SubmissionFailed(String),
    #[error("form does not accept submit while {0}")]
    NotAccepting(FormState),
    #[error("submit needs a tokio runtime to run the gateway call")]
    NoRuntime,
}

impl FormError {
    /// Validation failures leave the input editable.
    pub fn is_validation(&self) -> bool {
        matches!(self, FormError::ValidationEmpty | FormError::ValidationMalformed)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}
