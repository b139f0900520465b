//! Per-attempt snapshots handed to the gateway.
//!
//! Both types are built fresh on every submit and never persisted.

use serde::{Deserialize, Serialize};

/// Field name the email value is submitted under.
pub const EMAIL_FIELD: &str = "email";

/// Ambient values captured at submit time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionContext {
    /// Opaque visitor token; absent when the visitor has none.
    #[serde(rename = "hutk", skip_serializing_if = "Option::is_none", default)]
    pub tracking_token: Option<String>,
    /// Address of the page the form was submitted from.
    #[serde(rename = "pageUri")]
    pub page_locator: String,
}

impl SubmissionContext {
    pub fn new(tracking_token: Option<String>, page_locator: impl Into<String>) -> Self {
        Self {
            tracking_token,
            page_locator: page_locator.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// Everything one gateway call needs, passed by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub form_id: String,
    pub context: SubmissionContext,
    pub fields: Vec<FormField>,
}

impl SubmissionPayload {
    /// Builds the single-field newsletter payload. `email` must already be trimmed.
    pub fn email(form_id: impl Into<String>, context: SubmissionContext, email: String) -> Self {
        Self {
            form_id: form_id.into(),
            context,
            fields: vec![FormField {
                name: EMAIL_FIELD.to_string(),
                value: email,
            }],
        }
    }

    /// Looks up a field value by name.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
