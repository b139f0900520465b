//! # Telemetry: Observability Decorators
//!
//! Wraps a gateway so every call runs inside its own span and reports its
//! outcome and duration.

use crate::gateway::{GatewayResponse, SubmissionGateway};
use crate::payload::{EMAIL_FIELD, SubmissionPayload};
use crate::validate::email_domain;
use async_trait::async_trait;
use tracing::{Instrument, info_span};

/// A gateway that adds tracing to any inner gateway.
#[derive(Debug, Clone)]
pub struct Traced<G> {
    inner: G,
    name: String,
}

impl<G> Traced<G> {
    pub fn new(inner: G, name: &str) -> Self {
        Self {
            inner,
            name: name.to_string(),
        }
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }
}

#[async_trait]
impl<G: SubmissionGateway> SubmissionGateway for Traced<G> {
    async fn submit(&self, payload: SubmissionPayload) -> anyhow::Result<GatewayResponse> {
        let span = info_span!(
            "Gateway",
            gateway = %self.name,
            form_id = %payload.form_id,
            email_domain = %email_domain(payload.field(EMAIL_FIELD).unwrap_or_default()),
        );

        async move {
            tracing::debug!(has_token = payload.context.tracking_token.is_some(), "Submitting form");
            let start = std::time::Instant::now();

            let result = self.inner.submit(payload).await;

            let duration = start.elapsed();
            match &result {
                Ok(GatewayResponse { ok: true }) => {
                    tracing::info!(?duration, "Gateway accepted submission");
                }
                Ok(GatewayResponse { ok: false }) => {
                    tracing::warn!(?duration, "Gateway rejected submission");
                }
                Err(e) => {
                    tracing::error!(error = %e, ?duration, "Gateway call failed");
                }
            }
            result
        }
        .instrument(span)
        .await
    }
}
