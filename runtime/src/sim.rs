//! Simulated gateway for demos and tests.
//!
//! Stands in for the real submission endpoint: waits a configurable latency,
//! then replies according to its [`Behavior`]. It records every payload and
//! the peak number of concurrent calls.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use subscription_core::{GatewayResponse, SubmissionGateway, SubmissionPayload};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    /// Reply `{ ok: true }`.
    #[default]
    Accept,
    /// Reply `{ ok: false }`.
    Reject,
    /// Fail the call with an error.
    Fail,
    /// Never reply.
    Hang,
}

#[derive(Debug, Default)]
pub struct SimulatedGateway {
    latency: Duration,
    behavior: Behavior,
    calls: Mutex<Vec<SubmissionPayload>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl SimulatedGateway {
    pub fn new(behavior: Behavior, latency: Duration) -> Self {
        Self {
            latency,
            behavior,
            ..Self::default()
        }
    }

    /// Payloads received so far, in arrival order.
    pub fn calls(&self) -> Vec<SubmissionPayload> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Highest number of calls that were ever in flight at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SubmissionGateway for SimulatedGateway {
    async fn submit(&self, payload: SubmissionPayload) -> anyhow::Result<GatewayResponse> {
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(current, Ordering::SeqCst);
        self.calls.lock().push(payload);

        tokio::time::sleep(self.latency).await;
        match self.behavior {
            Behavior::Accept => Ok(GatewayResponse::ok()),
            Behavior::Reject => Ok(GatewayResponse::rejected()),
            Behavior::Fail => Err(anyhow::anyhow!("simulated network failure")),
            Behavior::Hang => std::future::pending().await,
        }
    }
}
