mod settings;


use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{DispatcherSettings, LogSettings, Settings};

/// Loads the configuration from the default file and environment variables.
/// Merges whatever is present with the built-in defaults and returns a
/// complete `Settings` for [`EventBus::with_settings`](crate::bus::EventBus::with_settings).
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(Environment::default().separator("_"));

    let config = builder.build()?;

    // Deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        dispatcher: DispatcherSettings {
            queue_capacity: partial
                .dispatcher
                .as_ref()
                .and_then(|d| d.queue_capacity)
                .unwrap_or(default.dispatcher.queue_capacity),
        },
        log: LogSettings {
            level: partial
                .log
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.log.level),
        },
    })
}
