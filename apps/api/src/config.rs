use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

/// How the binary runs: as an HTTP service or a single console interview.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewMode {
    Server,
    Console,
}

impl FromStr for InterviewMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "server" => Ok(InterviewMode::Server),
            "console" => Ok(InterviewMode::Console),
            other => bail!("INTERVIEW_MODE must be 'server' or 'console', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub mode: InterviewMode,
    /// Required in console mode.
    pub resume_path: Option<PathBuf>,
    /// Required in console mode.
    pub job_description_path: Option<PathBuf>,
    pub max_sessions: usize,
    pub interview_seed: Option<u64>,
    pub intro_timeout_secs: u64,
    pub answer_timeout_secs: u64,
    pub max_listen_retries: u32,
    /// Sessions untouched for this long are evicted from the store.
    pub session_idle_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let mode: InterviewMode = std::env::var("INTERVIEW_MODE")
            .unwrap_or_else(|_| "server".to_string())
            .parse()?;

        let (resume_path, job_description_path) = match mode {
            InterviewMode::Console => (
                Some(PathBuf::from(require_env("RESUME_PATH")?)),
                Some(PathBuf::from(require_env("JOB_DESCRIPTION_PATH")?)),
            ),
            InterviewMode::Server => (
                std::env::var("RESUME_PATH").ok().map(PathBuf::from),
                std::env::var("JOB_DESCRIPTION_PATH").ok().map(PathBuf::from),
            ),
        };

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            mode,
            resume_path,
            job_description_path,
            max_sessions: parse_env("MAX_SESSIONS", 1000)?,
            interview_seed: std::env::var("INTERVIEW_SEED")
                .ok()
                .map(|s| s.parse::<u64>())
                .transpose()
                .context("INTERVIEW_SEED must be an unsigned integer")?,
            intro_timeout_secs: parse_env("INTRO_TIMEOUT_SECS", 60)?,
            answer_timeout_secs: parse_env("ANSWER_TIMEOUT_SECS", 90)?,
            max_listen_retries: parse_env("MAX_LISTEN_RETRIES", 2)?,
            session_idle_secs: parse_env("SESSION_IDLE_SECS", 1800)?,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            mode: InterviewMode::Server,
            resume_path: None,
            job_description_path: None,
            max_sessions: 1000,
            interview_seed: None,
            intro_timeout_secs: 60,
            answer_timeout_secs: 90,
            max_listen_retries: 2,
            session_idle_secs: 1800,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
