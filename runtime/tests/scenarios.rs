//! End-to-end submit cycles, run in virtual time.

use std::sync::Arc;
use std::time::Duration;
use subscription_runtime::prelude::*;
use tokio::sync::watch;
use tokio::time::Instant;

const FAILED: &str = "Something went wrong. Please reload the page and try again";

struct Harness {
    form: SubscriptionForm,
    gateway: Arc<SimulatedGateway>,
    views: watch::Receiver<View>,
    start: Instant,
}

impl Harness {
    fn new(behavior: Behavior, latency_ms: u64) -> Self {
        let gateway = Arc::new(SimulatedGateway::new(
            behavior,
            Duration::from_millis(latency_ms),
        ));
        let form = SubscriptionForm::with_shared_gateway(
            FormConfig::default(),
            gateway.clone(),
            ContextSources::fixed(Some("visitor-42".into()), "https://example.com/blog"),
        );
        let views = form.subscribe();
        Self {
            form,
            gateway,
            views,
            start: Instant::now(),
        }
    }

    /// Waits for the next published view.
    async fn next(&mut self) -> View {
        self.views.changed().await.expect("form still alive");
        self.views.borrow_and_update().clone()
    }
}

#[tokio::test(start_paused = true)]
async fn empty_submit_shows_inline_error_without_gateway_call() {
    let h = Harness::new(Behavior::Accept, 100);
    h.form.on_input_change("");

    assert_eq!(h.form.on_submit(), Err(FormError::ValidationEmpty));
    let view = h.form.view();
    assert_eq!(view.state, FormState::Error);
    assert_eq!(view.error_text, "Please enter your email");
    assert!(!view.read_only);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.gateway.call_count(), 0);
    assert_eq!(h.form.state(), FormState::Error);
}

#[tokio::test(start_paused = true)]
async fn malformed_submit_shows_inline_error_without_gateway_call() {
    let h = Harness::new(Behavior::Accept, 100);
    h.form.on_input_change("notanemail");

    assert_eq!(h.form.on_submit(), Err(FormError::ValidationMalformed));
    assert_eq!(h.form.state(), FormState::Error);
    assert_eq!(h.form.view().error_text, "Please enter a valid email");

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(h.gateway.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn successful_cycle_respects_floor_and_resets() {
    let mut h = Harness::new(Behavior::Accept, 100);
    h.form.on_input_change("user@example.com");
    h.form.on_submit().unwrap();

    let loading = h.next().await;
    assert_eq!(loading.state, FormState::Loading);
    assert_eq!(loading.indicator, Indicator::Spinner);
    assert!(loading.read_only);
    assert!(!loading.submit_enabled);

    let success = h.next().await;
    let loading_visible = h.start.elapsed();
    assert_eq!(success.state, FormState::Success);
    assert_eq!(success.value, "Thanks for subscribing!");
    assert!(success.error_text.is_empty());
    assert!(loading_visible >= Duration::from_millis(2000), "{loading_visible:?}");

    let reset = h.next().await;
    assert_eq!(reset.state, FormState::Default);
    assert!(reset.value.is_empty());
    assert!(reset.error_text.is_empty());
    assert!(h.start.elapsed() - loading_visible >= Duration::from_millis(2000));

    // The cycle repeats.
    assert!(h.form.on_input_change("second@example.com"));
    h.form.on_submit().unwrap();
    assert_eq!(h.next().await.state, FormState::Loading);
    assert_eq!(h.next().await.state, FormState::Success);
    assert_eq!(h.gateway.call_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn slow_gateway_gets_no_extra_delay() {
    let mut h = Harness::new(Behavior::Accept, 3000);
    h.form.on_input_change("user@example.com");
    h.form.on_submit().unwrap();

    h.next().await;
    let success = h.next().await;
    assert_eq!(success.state, FormState::Success);
    let elapsed = h.start.elapsed();
    assert!(
        elapsed >= Duration::from_millis(3000) && elapsed < Duration::from_millis(3010),
        "{elapsed:?}"
    );
}

#[tokio::test(start_paused = true)]
async fn gateway_failure_is_sticky() {
    for behavior in [Behavior::Reject, Behavior::Fail] {
        let mut h = Harness::new(behavior, 100);
        h.form.on_input_change("user@example.com");
        h.form.on_submit().unwrap();

        assert_eq!(h.next().await.state, FormState::Loading);
        let error = h.next().await;
        assert_eq!(error.state, FormState::Error);
        assert_eq!(error.error_text, FAILED);
        assert_eq!(error.indicator, Indicator::Cross);
        assert!(h.start.elapsed() >= Duration::from_millis(2000));

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(h.form.state(), FormState::Error);
        assert_eq!(h.form.view().error_text, FAILED);
    }
}

#[tokio::test(start_paused = true)]
async fn stuck_gateway_stays_loading_without_timeout() {
    let h = Harness::new(Behavior::Hang, 0);
    h.form.on_input_change("user@example.com");
    h.form.on_submit().unwrap();

    tokio::time::sleep(Duration::from_secs(3600)).await;
    assert_eq!(h.form.state(), FormState::Loading);
}

#[tokio::test(start_paused = true)]
async fn at_most_one_gateway_call_in_flight() {
    let h = Harness::new(Behavior::Accept, 500);
    h.form.on_input_change("user@example.com");
    h.form.on_submit().unwrap();

    for _ in 0..5 {
        assert_eq!(
            h.form.on_submit(),
            Err(FormError::NotAccepting(FormState::Loading))
        );
    }

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(h.gateway.call_count(), 1);
    assert_eq!(h.gateway.peak_in_flight(), 1);
}

#[tokio::test(start_paused = true)]
async fn teardown_cancels_pending_reset() {
    let mut h = Harness::new(Behavior::Accept, 100);
    h.form.on_input_change("user@example.com");
    h.form.on_submit().unwrap();
    h.next().await;
    assert_eq!(h.next().await.state, FormState::Success);

    let Harness { form, mut views, .. } = h;
    drop(form);
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(views.borrow().state, FormState::Success);
    assert!(views.changed().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn validation_error_recovers_on_edit() {
    let mut h = Harness::new(Behavior::Accept, 100);
    h.form.on_input_change("user@");
    assert!(h.form.on_submit().is_err());
    assert!(h.form.view().highlight_error());

    assert!(h.form.on_input_change("user@example.com"));
    let view = h.form.view();
    assert_eq!(view.state, FormState::Default);
    assert!(view.error_text.is_empty());
    assert!(view.submit_enabled);

    h.form.on_submit().unwrap();
    h.views.mark_unchanged();
    assert_eq!(h.next().await.state, FormState::Success);
}
