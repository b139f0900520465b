use serde::{Deserialize, Serialize};
use std::fmt;

/// The four mutually exclusive states of a subscription form.
///
/// There is no terminal state: a successful cycle returns to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormState {
    /// Idle, input editable.
    #[default]
    Default,
    /// Submission in flight.
    Loading,
    /// Submission accepted; showing the confirmation text.
    Success,
    /// Validation or submission failed; error text is shown.
    Error,
}

impl FormState {
    /// Submit is only accepted from `Default`.
    pub fn accepts_submit(self) -> bool {
        matches!(self, FormState::Default)
    }

    pub fn is_error(self) -> bool {
        matches!(self, FormState::Error)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormState::Default => "default",
            FormState::Loading => "loading",
            FormState::Success => "success",
            FormState::Error => "error",
        }
    }
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
