//! Logging setup for hosts that do not install their own subscriber.

use anyhow::Result;

/// Install a global `tracing` subscriber.
///
/// Respects `RUST_LOG` if set; otherwise logs tubemeta at `debug`
/// (`trace` when `verbose`) and HTTP internals at `info`.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter(verbose));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter.as_str())
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}

fn default_filter(verbose: bool) -> String {
    if verbose {
        "tubemeta=trace,tubemeta_common=trace,reqwest=debug".to_string()
    } else {
        "tubemeta=debug,tubemeta_common=debug,reqwest=info".to_string()
    }
}
