//! # Machine: The Subscription Form State Machine
//!
//! `SubscriptionForm` owns the form's state, input value and failure, reacts
//! to input-change and submit events, and drives the gateway call.
//!
//! ## Cycle
//!
//! * `Default --submit(valid)--> Loading --accepted--> Success --reset timer--> Default`
//! * `Default --submit(invalid)--> Error` (input stays editable)
//! * `Loading --failed--> Error` (sticky, input read-only)
//!
//! Event handlers apply their transition synchronously under one lock and
//! publish a fresh [`View`] before returning. The only suspension points are
//! the gateway call (held back by the loading floor) and the auto-reset timer.
//! Both run as background tasks holding a weak reference to the form, and
//! both are aborted when the form is dropped.

use crate::smoother::run_with_floor_since;
use crate::task::TaskSlot;
use crate::view::{View, is_editable};
use parking_lot::Mutex;
use std::sync::{Arc, Weak};
use std::time::Duration;
use subscription_core::payload::EMAIL_FIELD;
use subscription_core::validate::email_domain;
use subscription_core::{
    ContextSources, FormConfig, FormError, FormState, SubmissionGateway, SubmissionPayload,
    SubmitOutcome, validate,
};
use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// One rendered subscription form.
///
/// Created when the form mounts, dropped when it unmounts. Not `Clone`: the
/// state has exactly one owner.
pub struct SubscriptionForm {
    shared: Arc<Shared>,
}

struct Shared {
    config: FormConfig,
    gateway: Arc<dyn SubmissionGateway>,
    sources: ContextSources,
    inner: Mutex<Inner>,
    views: watch::Sender<View>,
}

#[derive(Debug, Default)]
struct Inner {
    state: FormState,
    value: String,
    /// Set exactly when `state` is `Error`.
    failure: Option<FormError>,
    /// Bumped on every accepted submit; late tasks from older cycles are ignored.
    cycle: u64,
    /// Set by `Drop`; tasks that reach the lock afterwards stand down.
    torn_down: bool,
    in_flight: TaskSlot,
    reset_timer: TaskSlot,
}

impl Inner {
    fn enter(&mut self, state: FormState, failure: Option<FormError>) {
        debug_assert_eq!(state.is_error(), failure.is_some());
        self.state = state;
        self.failure = failure;
    }
}

impl SubscriptionForm {
    pub fn new(
        config: FormConfig,
        gateway: impl SubmissionGateway,
        sources: ContextSources,
    ) -> Self {
        Self::with_shared_gateway(config, Arc::new(gateway), sources)
    }

    /// Like [`SubscriptionForm::new`], for a gateway the caller keeps a handle to.
    pub fn with_shared_gateway(
        config: FormConfig,
        gateway: Arc<dyn SubmissionGateway>,
        sources: ContextSources,
    ) -> Self {
        let inner = Inner::default();
        let (views, _) = watch::channel(View::render(
            inner.state,
            &inner.value,
            None,
            &config.messages,
        ));
        Self {
            shared: Arc::new(Shared {
                config,
                gateway,
                sources,
                inner: Mutex::new(inner),
                views,
            }),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.shared.config
    }

    pub fn state(&self) -> FormState {
        self.shared.inner.lock().state
    }

    /// The current rendering snapshot.
    pub fn view(&self) -> View {
        self.shared.views.borrow().clone()
    }

    /// Stream of views, one per transition. The current view is marked seen.
    pub fn subscribe(&self) -> watch::Receiver<View> {
        self.shared.views.subscribe()
    }

    /// Input-change event. Stores the trimmed input.
    ///
    /// Returns `false` when the input is read-only (`Loading`, `Success`, or a
    /// sticky submission `Error`). After a validation error, editing moves the
    /// form back to `Default` and clears the error text.
    pub fn on_input_change(&self, raw: &str) -> bool {
        let mut inner = self.shared.inner.lock();
        if !is_editable(inner.state, inner.failure.as_ref()) {
            debug!(state = %inner.state, "Ignoring input change on read-only form");
            return false;
        }

        if inner.state.is_error() {
            debug!("Input edited after validation error");
            inner.enter(FormState::Default, None);
        }
        inner.value = raw.trim().to_string();
        self.shared.publish(&inner);
        true
    }

    /// Submit event.
    ///
    /// Validation failures move the form to `Error` and are returned without
    /// touching the gateway. A valid email moves the form to `Loading` and
    /// starts the gateway call in the background; the result arrives through
    /// [`SubscriptionForm::subscribe`]. Submit is refused outside `Default`,
    /// so at most one gateway call is ever in flight.
    ///
    /// The gateway call runs on the current tokio runtime. Without one, submit
    /// fails with [`FormError::NoRuntime`] and the state is left untouched.
    ///
    /// The ambient readers are called before the form is locked, so they may
    /// query the form themselves.
    pub fn on_submit(&self) -> Result<(), FormError> {
        let context = self.shared.sources.capture();
        let mut inner = self.shared.inner.lock();
        if !inner.state.accepts_submit() {
            warn!(state = %inner.state, "Submit refused");
            return Err(FormError::NotAccepting(inner.state));
        }

        let email = match validate(&inner.value).into_result() {
            Ok(email) => email,
            Err(error) => {
                warn!(reason = %error, "Submit rejected by validation");
                inner.enter(FormState::Error, Some(error.clone()));
                self.shared.publish(&inner);
                return Err(error);
            }
        };

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("Submit refused outside a tokio runtime");
            return Err(FormError::NoRuntime);
        };

        let started = Instant::now();
        inner.cycle += 1;
        inner.enter(FormState::Loading, None);
        self.shared.publish(&inner);

        let payload =
            SubmissionPayload::email(self.shared.config.form_id.clone(), context, email);
        info!(
            cycle = inner.cycle,
            email_domain = %email_domain(payload.field(EMAIL_FIELD).unwrap_or_default()),
            "Submitting subscription"
        );

        let task = runtime.spawn(run_submission(
            Arc::downgrade(&self.shared),
            payload,
            started,
            inner.cycle,
        ));
        inner.in_flight.arm(task.abort_handle());
        Ok(())
    }
}

impl Drop for SubscriptionForm {
    fn drop(&mut self) {
        let mut inner = self.shared.inner.lock();
        inner.torn_down = true;
        let submission = inner.in_flight.cancel();
        let reset = inner.reset_timer.cancel();
        if submission || reset {
            debug!(submission, reset, "Form torn down, cancelled pending tasks");
        }
    }
}

impl std::fmt::Debug for SubscriptionForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionForm")
            .field("form_id", &self.shared.config.form_id)
            .field("inner", &*self.shared.inner.lock())
            .finish()
    }
}

impl Shared {
    /// Publishes the view for `inner`. Callers hold the lock, so state and
    /// value always reach renderers together.
    fn publish(&self, inner: &Inner) {
        self.views.send_replace(View::render(
            inner.state,
            &inner.value,
            inner.failure.as_ref(),
            &self.config.messages,
        ));
    }

    fn settle(self: &Arc<Self>, outcome: SubmitOutcome, cycle: u64) {
        let mut inner = self.inner.lock();
        inner.in_flight.disarm();
        if inner.torn_down {
            debug!(cycle, "Form torn down, dropping submission result");
            return;
        }
        if inner.state != FormState::Loading || inner.cycle != cycle {
            debug!(cycle, "Discarding stale submission result");
            return;
        }

        match outcome {
            SubmitOutcome::Accepted => {
                info!(cycle, "Subscription accepted");
                inner.enter(FormState::Success, None);
                inner.value = self.config.messages.success.clone();

                let timer = tokio::spawn(reset_after(
                    Arc::downgrade(self),
                    self.config.reset_after(),
                    cycle,
                ));
                inner.reset_timer.arm(timer.abort_handle());
            }
            SubmitOutcome::Failed(reason) => {
                warn!(cycle, %reason, "Subscription failed");
                inner.enter(FormState::Error, Some(FormError::SubmissionFailed(reason)));
            }
        }
        self.publish(&inner);
    }

    fn reset(&self, cycle: u64) {
        let mut inner = self.inner.lock();
        inner.reset_timer.disarm();
        if inner.torn_down || inner.state != FormState::Success || inner.cycle != cycle {
            return;
        }
        info!(cycle, "Resetting form after success");
        inner.enter(FormState::Default, None);
        inner.value.clear();
        self.publish(&inner);
    }
}

async fn run_submission(
    shared: Weak<Shared>,
    payload: SubmissionPayload,
    started: Instant,
    cycle: u64,
) {
    let Some((gateway, floor, timeout)) = shared.upgrade().map(|s| {
        (
            s.gateway.clone(),
            s.config.loading_floor(),
            s.config.submit_timeout(),
        )
    }) else {
        return;
    };

    let outcome = run_with_floor_since(call_gateway(gateway, payload, timeout), started, floor).await;

    match shared.upgrade() {
        Some(shared) => shared.settle(outcome, cycle),
        None => debug!(cycle, "Form dropped before submission settled"),
    }
}

async fn call_gateway(
    gateway: Arc<dyn SubmissionGateway>,
    payload: SubmissionPayload,
    timeout: Option<Duration>,
) -> SubmitOutcome {
    match timeout {
        None => SubmitOutcome::from_response(gateway.submit(payload).await),
        Some(limit) => match tokio::time::timeout(limit, gateway.submit(payload)).await {
            Ok(result) => SubmitOutcome::from_response(result),
            Err(_) => SubmitOutcome::Failed(format!("gateway timed out after {limit:?}")),
        },
    }
}

async fn reset_after(shared: Weak<Shared>, delay: Duration, cycle: u64) {
    tokio::time::sleep(delay).await;
    if let Some(shared) = shared.upgrade() {
        shared.reset(cycle);
    }
}
