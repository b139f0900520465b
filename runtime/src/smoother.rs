//! Smoother - Minimum Visible Duration
//!
//! A loading indicator that flashes for a few milliseconds is worse than one
//! that stays up a little longer. These helpers hold an operation's result
//! back until a floor has elapsed, without adding any delay to operations
//! that are already slower than the floor.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Awaits `operation`, then resolves no earlier than `floor` after the call.
///
/// The output (including an `Err`) is returned unchanged.
pub async fn run_with_floor<F>(operation: F, floor: Duration) -> F::Output
where
    F: Future,
{
    run_with_floor_since(operation, Instant::now(), floor).await
}

/// Like [`run_with_floor`], measuring from an explicit start.
///
/// The form uses this with the instant it entered `Loading`, so time spent
/// before the operation was polled counts towards the floor.
pub async fn run_with_floor_since<F>(operation: F, started: Instant, floor: Duration) -> F::Output
where
    F: Future,
{
    let output = operation.await;
    let deadline = started + floor;
    if Instant::now() < deadline {
        tracing::trace!(remaining = ?(deadline - Instant::now()), "Holding result until floor");
        tokio::time::sleep_until(deadline).await;
    }
    output
}
