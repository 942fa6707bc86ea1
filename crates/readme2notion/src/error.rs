//! CLI error types.

use r2n_config::ConfigError;
use r2n_notion::SyncError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("sync failed at {stage} stage: {0}", stage = .0.stage())]
    Sync(#[from] SyncError),

    #[error("cannot determine hostname: {0}")]
    Hostname(#[source] std::io::Error),
}
