//! Merge rules: defaults and override order.
//!
//! Later sources replace earlier values key by key; arrays are replaced whole.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("commit.ignore", vec![".git"])?
        .set_default("ui.confirm", true)?
        .set_default("ui.color", true)?
        .set_default("logging.level", "warn")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("logging.color", true)
}
