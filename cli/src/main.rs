//! subscribe - drive a subscription form from the terminal
//!
//! Types each `--email` into one form instance, submits it against a
//! simulated gateway and prints every view the form publishes.
//!
//! ```text
//! subscribe --email user@example.com --latency-ms 300
//! subscribe --email "" --email nope --email a@b.co --behavior reject
//! ```

mod render;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use subscription_core::telemetry::Traced;
use subscription_core::{ContextSources, FormConfig, FormState};
use subscription_runtime::sim::{Behavior, SimulatedGateway};
use subscription_runtime::{SubscriptionForm, View};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Subscription form driver
#[derive(Parser)]
#[command(name = "subscribe")]
#[command(author, version, about = "Drive a subscription form against a simulated gateway")]
struct Cli {
    /// Form configuration (TOML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Email to type and submit; repeat for several attempts
    #[arg(short, long = "email", default_value = "user@example.com")]
    emails: Vec<String>,

    /// Simulated gateway latency
    #[arg(long, default_value_t = 300)]
    latency_ms: u64,

    /// How the simulated gateway replies
    #[arg(long, value_enum, default_value_t = GatewayMode::Accept)]
    behavior: GatewayMode,

    /// Tracking token to attach to submissions
    #[arg(long)]
    token: Option<String>,

    /// Page address to attach to submissions
    #[arg(long, default_value = "https://example.com/")]
    page: String,

    /// Stop waiting on a single attempt after this many seconds
    #[arg(long, default_value_t = 30)]
    give_up_after_secs: u64,

    /// Print views as JSON lines
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum GatewayMode {
    Accept,
    Reject,
    Fail,
    Hang,
}

impl From<GatewayMode> for Behavior {
    fn from(mode: GatewayMode) -> Self {
        match mode {
            GatewayMode::Accept => Behavior::Accept,
            GatewayMode::Reject => Behavior::Reject,
            GatewayMode::Fail => Behavior::Fail,
            GatewayMode::Hang => Behavior::Hang,
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,subscription_runtime=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_view(view: &View, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(view)?);
    } else {
        println!("{}", render::render(view));
    }
    Ok(())
}

/// Prints views until the form settles back in `Default` or in a sticky `Error`.
async fn follow(views: &mut watch::Receiver<View>, json: bool) -> Result<View> {
    loop {
        views
            .changed()
            .await
            .context("form dropped while a submission was pending")?;
        let view = views.borrow_and_update().clone();
        print_view(&view, json)?;
        if matches!(view.state, FormState::Default | FormState::Error) {
            return Ok(view);
        }
    }
}

/// Wires one form to a traced simulated gateway. The returned handle is the
/// untraced gateway, for call counts.
fn build_form(cli: &Cli, config: FormConfig) -> (SubscriptionForm, Arc<SimulatedGateway>) {
    let gateway = Arc::new(SimulatedGateway::new(
        cli.behavior.into(),
        Duration::from_millis(cli.latency_ms),
    ));
    let form = SubscriptionForm::new(
        config,
        Traced::new(gateway.clone(), "simulated"),
        ContextSources::fixed(cli.token.clone(), cli.page.clone()),
    );
    (form, gateway)
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => FormConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => FormConfig::default(),
    };

    let (form, gateway) = build_form(&cli, config);
    let mut views = form.subscribe();
    print_view(&form.view(), cli.json)?;

    for email in &cli.emails {
        if !form.on_input_change(email) {
            println!("input is read-only; reload the page to try again");
            break;
        }
        views.mark_unchanged();
        print_view(&form.view(), cli.json)?;

        if let Err(e) = form.on_submit() {
            if e.is_validation() {
                print_view(&form.view(), cli.json)?;
                views.mark_unchanged();
                continue;
            }
            return Err(e.into());
        }

        let limit = Duration::from_secs(cli.give_up_after_secs);
        match tokio::time::timeout(limit, follow(&mut views, cli.json)).await {
            Ok(view) => {
                if view?.state == FormState::Error {
                    break;
                }
            }
            Err(_) => {
                println!("no reply after {limit:?}; the form is still loading");
                break;
            }
        }
    }

    tracing::info!(
        submissions = gateway.call_count(),
        final_state = %form.state(),
        "Done"
    );
    Ok(())
}
