//! Form configuration, loaded from TOML.
//!
//! Every field has a default, so an empty document is a valid config.
//!
//! ```toml
//! form_id = "newsletter"
//! loading_floor_ms = 2000
//! reset_after_ms = 2000
//! # submit_timeout_ms = 15000
//!
//! [messages]
//! failed = "Something went wrong. Please reload the page and try again"
//! ```

use crate::error::{ConfigError, FormError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_FORM_ID: &str = "newsletter";
pub const DEFAULT_LOADING_FLOOR_MS: u64 = 2000;
pub const DEFAULT_RESET_AFTER_MS: u64 = 2000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormConfig {
    /// Identifier of the marketing form submissions are filed under.
    pub form_id: String,
    /// Minimum time the loading indicator stays visible.
    pub loading_floor_ms: u64,
    /// Delay between `Success` and the automatic return to `Default`.
    pub reset_after_ms: u64,
    /// Upper bound on one gateway call. Absent means wait forever.
    pub submit_timeout_ms: Option<u64>,
    pub messages: Messages,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            form_id: DEFAULT_FORM_ID.to_string(),
            loading_floor_ms: DEFAULT_LOADING_FLOOR_MS,
            reset_after_ms: DEFAULT_RESET_AFTER_MS,
            submit_timeout_ms: None,
            messages: Messages::default(),
        }
    }
}

impl FormConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: FormConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.form_id.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "form_id",
                reason: "must not be blank".to_string(),
            });
        }
        if self.submit_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid {
                field: "submit_timeout_ms",
                reason: "must be greater than zero; omit it to disable the timeout".to_string(),
            });
        }
        Ok(())
    }

    pub fn loading_floor(&self) -> Duration {
        Duration::from_millis(self.loading_floor_ms)
    }

    pub fn reset_after(&self) -> Duration {
        Duration::from_millis(self.reset_after_ms)
    }

    pub fn submit_timeout(&self) -> Option<Duration> {
        self.submit_timeout_ms.map(Duration::from_millis)
    }
}

/// User-facing texts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Messages {
    pub empty: String,
    pub malformed: String,
    pub failed: String,
    /// Shown in place of the input value after a successful submit.
    pub success: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            empty: "Please enter your email".to_string(),
            malformed: "Please enter a valid email".to_string(),
            failed: "Something went wrong. Please reload the page and try again".to_string(),
            success: "Thanks for subscribing!".to_string(),
        }
    }
}

impl Messages {
    /// Inline text for an error that puts the form into `Error`.
    pub fn text_for(&self, error: &FormError) -> &str {
        match error {
            FormError::ValidationEmpty => &self.empty,
            FormError::ValidationMalformed => &self.malformed,
            FormError::SubmissionFailed(_)
            | FormError::NotAccepting(_)
            | FormError::NoRuntime => &self.failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = FormConfig::from_toml_str("").unwrap();
        assert_eq!(config, FormConfig::default());
        assert_eq!(config.loading_floor(), Duration::from_secs(2));
        assert_eq!(config.reset_after(), Duration::from_secs(2));
        assert_eq!(config.submit_timeout(), None);
    }

    #[test]
    fn test_partial_override() {
        let config = FormConfig::from_toml_str(
            r#"
            form_id = "product-updates"
            submit_timeout_ms = 15000

            [messages]
            success = "You're in!"
            "#,
        )
        .unwrap();

        assert_eq!(config.form_id, "product-updates");
        assert_eq!(config.submit_timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.messages.success, "You're in!");
        assert_eq!(config.messages.empty, "Please enter your email");
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            FormConfig::from_toml_str("form_id = \"  \""),
            Err(ConfigError::Invalid { field: "form_id", .. })
        ));
        assert!(matches!(
            FormConfig::from_toml_str("submit_timeout_ms = 0"),
            Err(ConfigError::Invalid { field: "submit_timeout_ms", .. })
        ));
        assert!(matches!(
            FormConfig::from_toml_str("floor = 5"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = FormConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_message_for_each_error() {
        let messages = Messages::default();
        assert_eq!(messages.text_for(&FormError::ValidationEmpty), "Please enter your email");
        assert_eq!(
            messages.text_for(&FormError::ValidationMalformed),
            "Please enter a valid email"
        );
        assert_eq!(
            messages.text_for(&FormError::SubmissionFailed("boom".into())),
            "Something went wrong. Please reload the page and try again"
        );
    }
}
