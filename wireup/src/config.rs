//! Container configuration. By default, the config is created with opinionated default values,
//! which can then be overwritten by environment variables prefixed with `WIREUP_` or the
//! `wireup.json` file.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_ENV_PREFIX: &str = "WIREUP";

/// Name of the default config file.
pub const CONFIG_FILE: &str = "wireup.json";

/// Options applied by [Container::from_config](crate::container::Container::from_config).
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContainerConfig {
    /// Should [Container::initialize](crate::container::Container::initialize) reject objects
    /// created implicitly by the resolver.
    pub strict: bool,
    /// Should debug messages be forwarded to [tracing].
    pub debug: bool,
    /// Should a default tracing logger be installed when creating the container.
    pub install_tracing_logger: bool,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            strict: true,
            debug: false,
            install_tracing_logger: false,
        }
    }
}

impl From<OptionalContainerConfig> for ContainerConfig {
    fn from(value: OptionalContainerConfig) -> Self {
        let default = Self::default();
        Self {
            strict: value.strict.unwrap_or(default.strict),
            debug: value.debug.unwrap_or(default.debug),
            install_tracing_logger: value
                .install_tracing_logger
                .unwrap_or(default.install_tracing_logger),
        }
    }
}

impl ContainerConfig {
    /// Reads the config from [CONFIG_FILE] and `WIREUP_` environment variables, falling back to
    /// defaults for missing values.
    pub fn init_from_environment() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX))
            .build()
            .and_then(|config| config.try_deserialize::<OptionalContainerConfig>())
            .map(|config| config.into())
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_install_tracing_logger(mut self, install_tracing_logger: bool) -> Self {
        self.install_tracing_logger = install_tracing_logger;
        self
    }
}

#[derive(Deserialize, Default)]
struct OptionalContainerConfig {
    strict: Option<bool>,
    debug: Option<bool>,
    install_tracing_logger: Option<bool>,
}
