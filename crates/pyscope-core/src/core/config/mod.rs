pub mod context;
pub mod settings;

pub use settings::{
    ConfigError, ConfigLoader, ConfigOverrides, ConfigSource, EnvSnapshot, GlobalOptions, Settings,
    DEFAULT_PROBE_TIMEOUT,
};
