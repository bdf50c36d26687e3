use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Per-statement sqlx logs are noisy at `info`; keep them unless asked for.
const QUIET_DIRECTIVES: &str = "sqlx::query=warn";

pub(crate) fn init_logging(default_level: &str) -> Result<()> {
    fmt()
        .with_env_filter(build_filter(default_level))
        .with_target(true)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}

/// `RUST_LOG` wins over `LOG_LEVEL`; an unparsable level falls back to `info`.
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{default_level},{QUIET_DIRECTIVES}")))
        .unwrap_or_else(|_| EnvFilter::new(format!("info,{QUIET_DIRECTIVES}")))
}
