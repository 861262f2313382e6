pub mod capsule;
pub mod extract;
pub mod serve;
pub mod sweep;

use anyhow::Context;
use visionary_core::config::Config;

/// Load configuration from the environment with a readable error.
pub(crate) fn load_config() -> anyhow::Result<Config> {
    Config::from_env().context("failed to load configuration from environment")
}
