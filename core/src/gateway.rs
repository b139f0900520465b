//! Contracts for the collaborators the form consumes.
//!
//! The gateway is opaque: the form hands it a payload and only looks at the
//! `ok` flag. Ambient readers (tracking cookie, page address) are injected
//! explicitly instead of being looked up globally, and are read once per
//! submit attempt.

use crate::payload::{SubmissionContext, SubmissionPayload};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Reply of the submission endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub ok: bool,
}

impl GatewayResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }

    pub fn rejected() -> Self {
        Self { ok: false }
    }
}

/// The submission endpoint.
///
/// `Err` and `Ok(GatewayResponse { ok: false })` are both failures.
#[async_trait]
pub trait SubmissionGateway: Send + Sync + 'static {
    async fn submit(&self, payload: SubmissionPayload) -> anyhow::Result<GatewayResponse>;
}

#[async_trait]
impl<G: SubmissionGateway + ?Sized> SubmissionGateway for Arc<G> {
    async fn submit(&self, payload: SubmissionPayload) -> anyhow::Result<GatewayResponse> {
        (**self).submit(payload).await
    }
}

/// Reads the visitor's tracking token, if any.
pub trait TrackingTokenSource: Send + Sync {
    fn read_tracking_token(&self) -> Option<String>;
}

impl<F> TrackingTokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn read_tracking_token(&self) -> Option<String> {
        self()
    }
}

/// Reads the address of the current page.
pub trait PageLocatorSource: Send + Sync {
    fn read_page_locator(&self) -> String;
}

impl<F> PageLocatorSource for F
where
    F: Fn() -> String + Send + Sync,
{
    fn read_page_locator(&self) -> String {
        self()
    }
}

/// Fixed values, for callers whose ambient context never changes.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    pub tracking_token: Option<String>,
    pub page_locator: String,
}

impl TrackingTokenSource for StaticContext {
    fn read_tracking_token(&self) -> Option<String> {
        self.tracking_token.clone()
    }
}

impl PageLocatorSource for StaticContext {
    fn read_page_locator(&self) -> String {
        self.page_locator.clone()
    }
}

/// The injected ambient readers, captured into a [`SubmissionContext`] on submit.
#[derive(Clone)]
pub struct ContextSources {
    token: Arc<dyn TrackingTokenSource>,
    locator: Arc<dyn PageLocatorSource>,
}

impl ContextSources {
    pub fn new(
        token: impl TrackingTokenSource + 'static,
        locator: impl PageLocatorSource + 'static,
    ) -> Self {
        Self {
            token: Arc::new(token),
            locator: Arc::new(locator),
        }
    }

    /// Both readers backed by one fixed [`StaticContext`].
    pub fn fixed(tracking_token: Option<String>, page_locator: impl Into<String>) -> Self {
        let ctx = Arc::new(StaticContext {
            tracking_token,
            page_locator: page_locator.into(),
        });
        Self {
            token: ctx.clone(),
            locator: ctx,
        }
    }

    /// Reads both sources once.
    pub fn capture(&self) -> SubmissionContext {
        SubmissionContext::new(
            self.token.read_tracking_token(),
            self.locator.read_page_locator(),
        )
    }
}

impl std::fmt::Debug for ContextSources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextSources").finish_non_exhaustive()
    }
}
