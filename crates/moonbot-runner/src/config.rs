//! Configuration for the report runner.
//!
//! All configuration is loaded from environment variables. The runner
//! needs to know how to reach the chat bridge (NATS), where the report
//! service lives and how to authenticate against it, and which command
//! triggers a report.

use std::num::NonZeroU32;
use std::path::PathBuf;
use std::time::Duration;

use moonbot_core::window::DEFAULT_LEDGER_BUCKET_SECS;

use crate::error::RunnerError;

/// Default trigger command.
pub const DEFAULT_PREFIX: &str = "!!moons";

/// Default report fetch timeout in milliseconds.
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;

/// Complete runner configuration loaded from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    /// NATS server URL (e.g. `nats://localhost:4222`).
    pub nats_url: String,
    /// Report service connection settings.
    pub seat: SeatConfig,
    /// Exact chat command that triggers a report.
    pub trigger: String,
    /// Author id of the bot itself; its messages never trigger.
    pub bot_user_id: Option<String>,
    /// Optional path to a YAML ore substitution table.
    pub ore_table_path: Option<PathBuf>,
    /// Ledger tolerance bucket width in seconds.
    pub ledger_bucket_secs: NonZeroU32,
}

/// Report service connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct SeatConfig {
    /// Base URL, e.g. `https://seat.example.com`.
    pub host: String,
    /// Public report slug.
    pub slug: String,
    /// Value sent in the `Authorization` header.
    pub token: String,
    /// HTTP client timeout for the report fetch.
    pub timeout: Duration,
}

impl core::fmt::Debug for SeatConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SeatConfig")
            .field("host", &self.host)
            .field("slug", &self.slug)
            .field("token", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl RunnerConfig {
    /// Load configuration from environment variables.
    ///
    /// Required variables:
    /// - `NATS_URL` -- NATS server connection string
    /// - `SEAT_HOST` -- report service base URL
    /// - `SEAT_SLUG` -- public report slug
    /// - `SEAT_TOKEN` -- report service authorization token
    ///
    /// Optional variables:
    /// - `PREFIX` -- trigger command (default `!!moons`)
    /// - `FETCH_TIMEOUT_MS` -- report fetch timeout in milliseconds (default 30000)
    /// - `ORE_TABLE_PATH` -- YAML ore substitution table (default: built-in table)
    /// - `LEDGER_BUCKET_SECS` -- ledger tolerance bucket in seconds (default 86400)
    /// - `BOT_USER_ID` -- chat author id of the bot itself
    pub fn from_env() -> Result<Self, RunnerError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let require = |name: &str| {
            get(name)
                .ok_or_else(|| RunnerError::Config(format!("missing required env var {name}")))
        };

        let nats_url = require("NATS_URL")?;
        let host = require("SEAT_HOST")?;
        let slug = require("SEAT_SLUG")?;
        let token = require("SEAT_TOKEN")?;

        let timeout_ms: u64 = get("FETCH_TIMEOUT_MS")
            .map_or(Ok(DEFAULT_FETCH_TIMEOUT_MS), |raw| raw.trim().parse())
            .map_err(|e| RunnerError::Config(format!("invalid FETCH_TIMEOUT_MS: {e}")))?;

        let bucket_secs: u32 = get("LEDGER_BUCKET_SECS")
            .map_or(Ok(DEFAULT_LEDGER_BUCKET_SECS), |raw| raw.trim().parse())
            .map_err(|e| RunnerError::Config(format!("invalid LEDGER_BUCKET_SECS: {e}")))?;
        let ledger_bucket_secs = NonZeroU32::new(bucket_secs)
            .ok_or_else(|| RunnerError::Config("LEDGER_BUCKET_SECS must be at least 1".to_owned()))?;

        Ok(Self {
            nats_url,
            seat: SeatConfig {
                host: host.trim_end_matches('/').to_owned(),
                slug,
                token,
                timeout: Duration::from_millis(timeout_ms),
            },
            trigger: get("PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_owned()),
            bot_user_id: get("BOT_USER_ID"),
            ore_table_path: get("ORE_TABLE_PATH").map(PathBuf::from),
            ledger_bucket_secs,
        })
    }
}
