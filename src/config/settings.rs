use serde::Deserialize;

/// Top-level configuration for the event bus.
///
/// Covers the dispatcher's delivery queue and logging.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub dispatcher: DispatcherSettings,
    pub log: LogSettings,
}

/// Configuration of the dispatcher's delivery queue.
///
/// `queue_capacity` bounds the number of addressed event copies waiting for
/// the worker; a publish that would exceed it fails rather than block.
#[derive(Debug, Deserialize, Clone)]
pub struct DispatcherSettings {
    pub queue_capacity: usize,
}

/// Logging configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub level: String,
}

/// Partial configuration loaded from files or environment.
///
/// Allows partial specification of settings; missing values are filled
/// from defaults.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub dispatcher: Option<PartialDispatcherSettings>,
    pub log: Option<PartialLogSettings>,
}

/// Partial dispatcher settings from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialDispatcherSettings {
    pub queue_capacity: Option<usize>,
}

/// Partial logging settings from external sources with optional values.
#[derive(Debug, Deserialize)]
pub struct PartialLogSettings {
    pub level: Option<String>,
}

/// Provides default values for `Settings`.
///
/// Ensures the bus works out of the box with no configuration present.
impl Default for Settings {
    fn default() -> Self {
        Self {
            dispatcher: DispatcherSettings {
                queue_capacity: 1024,
            },
            log: LogSettings {
                level: "info".to_string(),
            },
        }
    }
}
