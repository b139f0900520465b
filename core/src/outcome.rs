use serde::{Deserialize, Serialize};

use crate::gateway::GatewayResponse;

/// The explicit result of one gateway round trip.
///
/// An `{ ok: false }` reply and a raised error both collapse into `Failed`;
/// the form treats them identically and never retries on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmitOutcome {
    /// The gateway accepted the submission.
    Accepted,
    /// Non-ok reply, transport error or timeout. Carries a reason for logs only.
    Failed(String),
}

impl SubmitOutcome {
    /// Classifies a raw gateway result.
    pub fn from_response(result: anyhow::Result<GatewayResponse>) -> Self {
        match result {
            Ok(GatewayResponse { ok: true }) => SubmitOutcome::Accepted,
            Ok(GatewayResponse { ok: false }) => {
                SubmitOutcome::Failed("gateway replied ok=false".to_string())
            }
            Err(e) => SubmitOutcome::Failed(format!("{e:#}")),
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmitOutcome::Accepted)
    }
}
