mod settings;

pub use settings::{BattleConfig, Config, ConfigError, ServerConfig, EXAMPLE_CONFIG};
