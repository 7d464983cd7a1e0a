// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Urbane command-line client.
//!
//! Drives the client core against a live directory: resolve the lifecycle
//! stage, sign in and out, list discovery candidates, friends and events.

use anyhow::{bail, Context, Result};
use pico_args::Arguments;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use urbane_client::{
    config::Config,
    models::{EventQuery, LifecycleStage},
    services::{Route, RouteDecision},
    ClientState,
};

const HELP: &str = "\
Urbane client

USAGE:
  urbane-client <COMMAND> [OPTIONS]

COMMANDS:
  status                Resolve and print the lifecycle stage
  login                 Sign in (requires --email and --password)
  logout                Destroy the cached session
  matches               Load and list discovery candidates
  friends               List accepted connections
  events                List events (optionally --state and --city)
  interests             List the interest catalog

OPTIONS:
  --email EMAIL         Account email
  --password PASS       Account password
  --state STATE         Event state filter
  --city CITY           Event city filter (needs --state)

FLAGS:
  -h, --help            Print help information

ENVIRONMENT:
  API_BASE_URL, URBANE_STORE_PATH, REQUEST_TIMEOUT_SECS, MIN_AGE,
  LOG_FORMAT=json, RUST_LOG
";

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;

    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        return Ok(());
    }

    let command: Option<String> = pargs.subcommand()?;
    let email: Option<String> = pargs.opt_value_from_str("--email")?;
    let password: Option<String> = pargs.opt_value_from_str("--password")?;
    let query = EventQuery {
        state: pargs.opt_value_from_str("--state")?,
        city: pargs.opt_value_from_str("--city")?,
    };

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!(api = %config.api_base_url, store = %config.store_path.display(), "Starting");

    let state = ClientState::from_config(config).context("Failed to initialize client")?;

    match command.as_deref() {
        Some("status") => status(&state).await,
        Some("login") => {
            let (Some(email), Some(password)) = (email, password) else {
                bail!("login requires --email and --password");
            };
            login(&state, &email, &password).await
        }
        Some("logout") => {
            state.logout().await?;
            println!("Logged out");
            Ok(())
        }
        Some("matches") => matches(&state).await,
        Some("friends") => friends(&state).await,
        Some("events") => events(&state, &query).await,
        Some("interests") => {
            for tag in state.profiles.interest_catalog().await? {
                println!("{:>4}  {}", tag.id, tag.name);
            }
            Ok(())
        }
        Some(other) => bail!("unknown command: {other}\n\n{HELP}"),
        None => {
            print!("{HELP}");
            Ok(())
        }
    }
}

async fn status(state: &ClientState) -> Result<()> {
    let stage = state.resolver.resolve().await?;
    match stage {
        LifecycleStage::Anonymous => println!("Not signed in"),
        LifecycleStage::AuthenticatedIncomplete => println!("Signed in, onboarding required"),
        LifecycleStage::AuthenticatedComplete => {
            let who = state
                .cache
                .load()?
                .map(|s| match (s.display_identity.first_name, s.display_identity.last_name) {
                    (Some(first), Some(last)) => format!("{first} {last}"),
                    _ => s.display_identity.email,
                })
                .unwrap_or_default();
            println!("Signed in as {who}");
        }
    }
    Ok(())
}

async fn login(state: &ClientState, email: &str, password: &str) -> Result<()> {
    let session = state.auth.login(email, password).await?;
    println!("Logged in as {}", session.display_identity.email);

    let stage = state.resolver.resolve().await?;
    if stage == LifecycleStage::AuthenticatedIncomplete {
        println!("Profile incomplete, finish onboarding to see matches");
    }
    Ok(())
}

async fn matches(state: &ClientState) -> Result<()> {
    let subject_id = signed_in(state, Route::Discover).await?;

    let count = state.matches.load(subject_id).await?;
    if count == 0 {
        println!("No candidates right now");
        return Ok(());
    }

    for candidate in state.matches.snapshot().candidates() {
        let reasons = candidate.similarity_reasons.join(", ");
        println!(
            "{:>8}  {:<24}  {}",
            candidate.subject_id,
            candidate.profile_snapshot.display_name(),
            reasons
        );
    }
    Ok(())
}

async fn friends(state: &ClientState) -> Result<()> {
    let subject_id = signed_in(state, Route::Discover).await?;
    let friends = state.matches.friends(subject_id).await?;
    if friends.is_empty() {
        println!("No connections yet");
    }
    for friend in friends {
        println!(
            "{:>8}  {}",
            friend.subject_id,
            friend.profile_snapshot.display_name()
        );
    }
    Ok(())
}

async fn events(state: &ClientState, query: &EventQuery) -> Result<()> {
    let events = state.events.discover(query).await?;
    if events.is_empty() {
        println!("No events found");
    }
    for event in events {
        let place = [event.city.as_deref(), event.state.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        println!("{:>6}  {:<32}  {}", event.id, event.title, place);
    }
    Ok(())
}

/// Enter `route` and return the signed-in subject.
async fn signed_in(state: &ClientState, route: Route) -> Result<u64> {
    match state.guard.enter(route).await? {
        RouteDecision::Allow => {}
        RouteDecision::Redirect(Route::Login) => bail!("not signed in"),
        RouteDecision::Redirect(_) => bail!("finish onboarding first"),
    }
    match state.cache.load()? {
        Some(session) => Ok(session.subject_id),
        None => bail!("not signed in"),
    }
}

/// Initialize logging on stderr. `LOG_FORMAT=json` selects structured JSON.
fn init_logging() -> Result<()> {
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("urbane_client=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(json_layer)
        .with(text_layer)
        .try_init()?;
    Ok(())
}
