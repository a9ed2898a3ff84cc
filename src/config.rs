//! Run configuration, built once at startup from the environment.
//!
//! Store and bus identity/credentials are mandatory: any missing value
//! aborts before a single blob is scanned. The interval and prefix are
//! deliberately lenient (warn and fall back) - the interval default is a
//! long-standing operational quirk of this tool, kept on purpose for that
//! one setting rather than unified with the abort policy.

use std::time::Duration;

use anyhow::Result;
use tracing::warn;

use replay_types::ConfigError;

use crate::args::Args;

/// Pacing default when `MESSAGE_INTERVAL_MS` is unset or non-numeric.
pub const DEFAULT_INTERVAL_MS: u64 = 100;

/// Everything a replay run needs, resolved up front.
#[derive(Debug, Clone)]
pub struct ReplayConfig {
    /// Object store account name.
    pub storage_account: String,
    /// Opaque SAS credential for the store.
    pub storage_sas_token: String,
    /// Container holding the capture blobs.
    pub container: String,
    /// Bus namespace.
    pub hub_namespace: String,
    /// Destination event hub within the namespace.
    pub hub_name: String,
    /// SAS policy name for the bus. Token building from name + key belongs
    /// to the credential layer; it is validated here because a run without
    /// it can never authenticate.
    pub hub_sas_name: String,
    /// Opaque SAS credential for the bus.
    pub hub_sas_token: String,
    /// Pause applied after every sent message.
    pub interval: Duration,
    /// Optional blob path prefix; `None` scans from the container root.
    pub prefix: Option<String>,
}

impl ReplayConfig {
    /// Resolve configuration from the environment, with CLI overrides for
    /// the lenient settings.
    pub fn from_env(args: &Args) -> Result<Self> {
        let storage_account = require("STORAGE_ACCOUNT_NAME")?;
        let storage_sas_token = require("STORAGE_SAS_KEY")?;
        let container = require("STORAGE_CONTAINER_NAME")?;
        let hub_namespace = require("EVENT_HUB_NAMESPACE")?;
        let hub_name = require("EVENT_HUB_NAME")?;
        let hub_sas_name = require("EVENT_HUB_SAS_NAME")?;
        let hub_sas_token = require("EVENT_HUB_SAS_KEY")?;

        let interval_ms = match args.interval_ms {
            Some(ms) => ms,
            None => interval_from_env(),
        };

        let prefix = args.prefix.clone().or_else(prefix_from_env);

        Ok(Self {
            storage_account,
            storage_sas_token,
            container,
            hub_namespace,
            hub_name,
            hub_sas_name,
            hub_sas_token,
            interval: Duration::from_millis(interval_ms),
            prefix,
        })
    }
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn interval_from_env() -> u64 {
    match std::env::var("MESSAGE_INTERVAL_MS") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!(
                value = %value,
                default = DEFAULT_INTERVAL_MS,
                "MESSAGE_INTERVAL_MS is not numeric, using default"
            );
            DEFAULT_INTERVAL_MS
        }),
        Err(_) => {
            warn!(
                default = DEFAULT_INTERVAL_MS,
                "MESSAGE_INTERVAL_MS not defined, using default"
            );
            DEFAULT_INTERVAL_MS
        }
    }
}

fn prefix_from_env() -> Option<String> {
    match std::env::var("PATH_PREFIX") {
        Ok(prefix) if !prefix.is_empty() => Some(prefix),
        _ => {
            warn!("PATH_PREFIX not defined, scanning from root of container");
            None
        }
    }
}
