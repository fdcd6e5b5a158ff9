mod config;
mod errors;
mod interview;
mod loader;
mod models;
mod routes;
mod speech;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, InterviewMode};
use crate::interview::chooser::RandomChooser;
use crate::interview::session::InterviewSession;
use crate::loader::{load_job_description, load_resume};
use crate::routes::build_router;
use crate::speech::console::ConsoleIo;
use crate::speech::driver::{run_interview, InterviewOutcome, TurnPolicy};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting Interviewer v{}", env!("CARGO_PKG_VERSION"));

    match config.mode {
        InterviewMode::Server => serve(config).await,
        InterviewMode::Console => run_console(config).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let state = AppState::new(config.clone());
    info!(
        "Session store ready (max {} sessions, idle TTL {:?})",
        config.max_sessions,
        state.sessions.idle_ttl()
    );
    let sweep_period = state
        .sessions
        .idle_ttl()
        .clamp(Duration::from_secs(1), Duration::from_secs(60));
    state.sessions.spawn_sweeper(sweep_period);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Runs one interview on stdin/stdout using the resume and job description on disk.
async fn run_console(config: Config) -> Result<()> {
    let resume_path = config
        .resume_path
        .as_deref()
        .context("RESUME_PATH is required in console mode")?;
    let jd_path = config
        .job_description_path
        .as_deref()
        .context("JOB_DESCRIPTION_PATH is required in console mode")?;

    let resume = load_resume(resume_path).await?;
    let job_description = load_job_description(jd_path).await?;

    let mut session = InterviewSession::new(
        &resume,
        &job_description,
        None,
        Box::new(RandomChooser::from_seed_option(config.interview_seed)),
    );
    let mut io = ConsoleIo::stdio();
    let policy = TurnPolicy::from_config(&config);

    match run_interview(&mut session, &mut io, &policy).await? {
        InterviewOutcome::Completed { turns } => {
            info!("Console interview completed after {turns} turns")
        }
        InterviewOutcome::Abandoned {
            question_index,
            followup_index,
        } => info!(
            "Console interview abandoned at question {question_index} followup {followup_index}"
        ),
    }

    Ok(())
}
