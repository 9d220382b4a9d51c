//! Probe and resolution settings.
//!
//! Defaults come from the platform, can be overridden from the environment
//! with [`ConfigBuilder::from_env`], and finally by explicit builder calls
//! (the command line).

use crate::library::supports_deepbind;
use tracing::warn;

/// Environment variable forcing the helper override on (`1`) or off (`0`).
pub const ENV_DEEPBINDLESS: &str = "BLASTRAMP_DEEPBINDLESS";
/// Environment variable enabling (`1`) or disabling (`0`) the f2c probe.
pub const ENV_F2C: &str = "BLASTRAMP_F2C";
/// Environment variable enabling (`1`) or disabling (`0`) the cross-check.
pub const ENV_CROSS_CHECK: &str = "BLASTRAMP_CROSS_CHECK";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Install the `lsame` stand-in around the `isamax` probe. Needed when
    /// the library could not be opened with deep binding.
    pub deepbindless: bool,
    /// Run the f2c return convention probe.
    pub f2c_autodetect: bool,
    /// Run both interface probes and refuse inconsistent libraries.
    pub cross_check: bool,
    /// Empty every forwarding slot before binding.
    pub clear: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deepbindless: !supports_deepbind(),
            f2c_autodetect: true,
            cross_check: false,
            clear: true,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> Config {
        ConfigBuilder::from_env().build()
    }
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn from_env() -> Self {
        Self::new().apply_env(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `var`.
    pub fn apply_env(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = env_flag(&var, ENV_DEEPBINDLESS) {
            self.config.deepbindless = value;
        }
        if let Some(value) = env_flag(&var, ENV_F2C) {
            self.config.f2c_autodetect = value;
        }
        if let Some(value) = env_flag(&var, ENV_CROSS_CHECK) {
            self.config.cross_check = value;
        }
        self
    }

    pub fn deepbindless(mut self, deepbindless: bool) -> Self {
        self.config.deepbindless = deepbindless;
        self
    }

    pub fn f2c_autodetect(mut self, f2c_autodetect: bool) -> Self {
        self.config.f2c_autodetect = f2c_autodetect;
        self
    }

    pub fn cross_check(mut self, cross_check: bool) -> Self {
        self.config.cross_check = cross_check;
        self
    }

    pub fn clear(mut self, clear: bool) -> Self {
        self.config.clear = clear;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn env_flag(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<bool> {
    let value = var(key)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("Ignoring {}={:?}: expected 0 or 1", key, other);
            None
        }
    }
}
