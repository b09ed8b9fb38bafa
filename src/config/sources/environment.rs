//! Environment source: `VCONTROL_<SECTION>__<KEY>`, e.g. `VCONTROL_UI__CONFIRM=false`.
//!
//! `VCONTROL_COMMIT__IGNORE` takes a comma-separated list.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub const ENV_PREFIX: &str = "VCONTROL";

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("commit.ignore"),
    )
}
