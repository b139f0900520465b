//! View - What the Presentation Layer Renders
//!
//! A `View` is a pure function of the form's state, value and failure. It is
//! rebuilt and published on every transition, so a renderer never sees a
//! state paired with a stale value.

use serde::Serialize;
use subscription_core::config::Messages;
use subscription_core::{FormError, FormState};

/// Icon shown at the end of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    /// The submit button.
    Send,
    Spinner,
    Check,
    Cross,
}

impl Indicator {
    pub fn for_state(state: FormState) -> Self {
        match state {
            FormState::Default => Indicator::Send,
            FormState::Loading => Indicator::Spinner,
            FormState::Success => Indicator::Check,
            FormState::Error => Indicator::Cross,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct View {
    pub state: FormState,
    /// Input contents: the trimmed email, or the confirmation text on success.
    pub value: String,
    /// Empty unless `state` is `Error`.
    pub error_text: String,
    pub read_only: bool,
    /// The submit affordance exists only in `Default`.
    pub submit_enabled: bool,
    pub indicator: Indicator,
}

impl View {
    pub(crate) fn render(
        state: FormState,
        value: &str,
        failure: Option<&FormError>,
        messages: &Messages,
    ) -> Self {
        let error_text = match (state, failure) {
            (FormState::Error, Some(error)) => messages.text_for(error).to_string(),
            _ => String::new(),
        };
        Self {
            state,
            value: value.to_string(),
            error_text,
            read_only: !is_editable(state, failure),
            submit_enabled: state.accepts_submit(),
            indicator: Indicator::for_state(state),
        }
    }

    /// The input border is highlighted whenever an error is shown.
    pub fn highlight_error(&self) -> bool {
        !self.error_text.is_empty()
    }
}

impl Default for View {
    fn default() -> Self {
        Self::render(FormState::Default, "", None, &Messages::default())
    }
}

/// `Default` and validation errors are editable; everything else is read-only.
pub(crate) fn is_editable(state: FormState, failure: Option<&FormError>) -> bool {
    match state {
        FormState::Default => true,
        FormState::Error => failure.is_some_and(FormError::is_validation),
        FormState::Loading | FormState::Success => false,
    }
}
