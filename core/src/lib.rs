//! Subscription Core - validation, payloads and collaborator contracts
//!
//! This crate is synchronous and protocol-agnostic. Timers, task spawning and
//! the state machine itself live in `subscription-runtime`.

pub mod config;
pub mod error;
pub mod gateway;
pub mod outcome;
pub mod payload;
pub mod state;
pub mod telemetry;
pub mod validate;

pub mod prelude {
    pub use crate::config::{FormConfig, Messages};
    pub use crate::error::{ConfigError, FormError};
    pub use crate::gateway::{
        ContextSources, GatewayResponse, PageLocatorSource, StaticContext, SubmissionGateway,
        TrackingTokenSource,
    };
    pub use crate::outcome::SubmitOutcome;
    pub use crate::payload::{EMAIL_FIELD, FormField, SubmissionContext, SubmissionPayload};
    pub use crate::state::FormState;
    pub use crate::telemetry::Traced;
    pub use crate::validate::{ValidationResult, validate};
}

pub use config::FormConfig;
pub use error::FormError;
pub use gateway::{ContextSources, GatewayResponse, SubmissionGateway};
pub use outcome::SubmitOutcome;
pub use payload::{SubmissionContext, SubmissionPayload};
pub use state::FormState;
pub use validate::{ValidationResult, validate};
