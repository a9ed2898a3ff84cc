use clap::Parser;

/// Replay captured event blobs from an object store onto a message bus.
///
/// Connection identity and credentials come from the environment; these
/// flags tune a single run without touching the environment.
#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// Override the inter-message interval in milliseconds.
    #[arg(long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Override the blob path prefix to scan (default: container root).
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Rehearse the replay against an in-memory bus instead of the live hub.
    /// Bus identity variables are still required; nothing is sent anywhere.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Log every payload as it is sent (debug level, very noisy).
    #[arg(long, default_value_t = false)]
    pub log_payloads: bool,
}
