use crate::error::{AppResult, Error};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use toml;

/// Default scan interval for the reminder scheduler, in seconds
pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 60;

/// Default reminder look-ahead window, in minutes
pub const DEFAULT_REMINDER_WINDOW_MINUTES: i64 = 60;

/// Default recurrence expansion horizon when no recurrence end is set, in days
pub const DEFAULT_EXPANSION_HORIZON_DAYS: i64 = 365;

/// Main configuration structure for the scheduling core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Seconds between reminder scan cycles
    pub scan_interval_secs: u64,
    /// Look-ahead window for reminders, in minutes
    pub reminder_window_minutes: i64,
    /// Expansion horizon for recurring events without an explicit end, in days
    pub expansion_horizon_days: i64,
    /// Which notification sink to use ("log" is the only built-in)
    pub notification_sink: String,
    /// Map of component names to their enabled status
    pub components: HashMap<String, bool>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let scan_interval_secs = parse_env_or("SCAN_INTERVAL_SECS", DEFAULT_SCAN_INTERVAL_SECS)?;
        let reminder_window_minutes =
            parse_env_or("REMINDER_WINDOW_MINUTES", DEFAULT_REMINDER_WINDOW_MINUTES)?;
        let expansion_horizon_days =
            parse_env_or("EXPANSION_HORIZON_DAYS", DEFAULT_EXPANSION_HORIZON_DAYS)?;

        let notification_sink =
            env::var("NOTIFICATION_SINK").unwrap_or_else(|_| String::from("log"));

        // Initialize default components
        let mut components = HashMap::new();
        components.insert("reminders".to_string(), true);

        // Load components configuration from file if it exists
        if let Ok(content) = fs::read_to_string("config/components.toml") {
            if let Ok(file_components) = toml::from_str::<HashMap<String, bool>>(&content) {
                // Merge with defaults
                for (key, value) in file_components {
                    components.insert(key, value);
                }
            }
        }

        Ok(Config {
            scan_interval_secs,
            reminder_window_minutes,
            expansion_horizon_days,
            notification_sink,
            components,
        })
    }

    /// Check if a component is enabled
    pub fn is_component_enabled(&self, name: &str) -> bool {
        *self.components.get(name).unwrap_or(&false)
    }

    /// Update component enabled status
    #[allow(dead_code)]
    pub fn set_component_enabled(&mut self, name: &str, enabled: bool) -> AppResult<()> {
        self.components.insert(name.to_string(), enabled);
        self.save_components()
    }

    /// Save component configuration to file
    #[allow(dead_code)]
    fn save_components(&self) -> AppResult<()> {
        // Create config directory if it doesn't exist
        if !Path::new("config").exists() {
            fs::create_dir("config")?;
        }

        let toml_str = toml::to_string(&self.components)?;
        fs::write("config/components.toml", toml_str)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut components = HashMap::new();
        components.insert("reminders".to_string(), true);
        Config {
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            reminder_window_minutes: DEFAULT_REMINDER_WINDOW_MINUTES,
            expansion_horizon_days: DEFAULT_EXPANSION_HORIZON_DAYS,
            notification_sink: String::from("log"),
            components,
        }
    }
}

/// Parse an environment variable, falling back to a default when it is unset
fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> AppResult<T> {
    match env::var(var) {
        Ok(value) => value
            .parse::<T>()
            .map_err(|_| Error::Environment(format!("Invalid {} value: {}", var, value))),
        Err(_) => Ok(default),
    }
}
