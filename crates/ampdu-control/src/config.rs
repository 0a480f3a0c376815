//! Run-wide controller configuration.
//!
//! [`ControllerConfig`] holds every parameter that is fixed for the duration
//! of a run. All stations and access points share the same values. Load it
//! from JSON with [`ControllerConfig::from_json`] or build it in code and call
//! [`ControllerConfig::validate`] before use.
//!
//! # Example
//!
//! ```rust
//! use ampdu_control::config::ControllerConfig;
//!
//! let cfg = ControllerConfig::default();
//! cfg.validate().expect("default config is valid");
//! assert_eq!(cfg.channels(), &[36, 40, 44, 48]);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::channel::{channel_plan, SUPPORTED_WIDTHS_MHZ};
use crate::domain::{ChannelStrategy, WifiStandard};
use crate::error::ConfigError;

/// Immutable per-run configuration of the aggregation controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Diagnostic verbosity. `0` logs warnings only, `1` and above log every
    /// event and the registry tables, `3` and above add lookup details.
    pub verbose_level: u8,

    /// Number of channels from the plan that APs are spread over.
    pub num_channels: usize,

    /// Channel width in MHz. Selects the channel plan.
    pub channel_width_mhz: u16,

    /// 802.11 generation. Bounds `max_ampdu_size`.
    pub standard: WifiStandard,

    /// When `false` the controller tracks associations but never changes
    /// aggregation sizes.
    pub policy_enabled: bool,

    /// A-MPDU ceiling in bytes used while aggregation is on.
    pub max_ampdu_size: u32,

    /// A-MPDU ceiling in bytes that means "aggregation off".
    pub max_ampdu_size_when_disabled: u32,

    /// Whether the controller pushes channels to stations after they leave
    /// an AP.
    pub channel_strategy: ChannelStrategy,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            verbose_level: 0,
            num_channels: 4,
            channel_width_mhz: 20,
            standard: WifiStandard::default(),
            policy_enabled: true,
            max_ampdu_size: 65_535,
            max_ampdu_size_when_disabled: 0,
            channel_strategy: ChannelStrategy::default(),
        }
    }
}

impl ControllerConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileRead`] if the file cannot be read,
    /// [`ConfigError::Json`] if it does not parse, and
    /// [`ConfigError::InvalidValue`] if it fails [`validate`](Self::validate).
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: ControllerConfig = serde_json::from_str(&contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON, creating parent
    /// directories if needed.
    ///
    /// # Errors
    ///
    /// [`ConfigError::FileRead`] if the directory or file cannot be written.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }

    /// Check the configuration for contradictions and return the first one
    /// found.
    ///
    /// # Validated invariants
    ///
    /// - `max_ampdu_size` does not exceed the limit of `standard`
    /// - `max_ampdu_size_when_disabled <= max_ampdu_size`
    /// - `channel_width_mhz` is 20, 40, 80 or 160
    /// - `1 <= num_channels <= ` plan length for that width
    pub fn validate(&self) -> Result<(), ConfigError> {
        let limit = self.standard.max_ampdu_size();
        if self.max_ampdu_size > limit {
            return Err(ConfigError::invalid_value(
                "max_ampdu_size",
                format!(
                    "{} exceeds the {} limit of {limit} bytes",
                    self.max_ampdu_size, self.standard
                ),
            ));
        }
        if self.max_ampdu_size_when_disabled > self.max_ampdu_size {
            return Err(ConfigError::invalid_value(
                "max_ampdu_size_when_disabled",
                format!(
                    "{} is larger than max_ampdu_size ({})",
                    self.max_ampdu_size_when_disabled, self.max_ampdu_size
                ),
            ));
        }

        let Some(plan) = channel_plan(self.channel_width_mhz) else {
            return Err(ConfigError::invalid_value(
                "channel_width_mhz",
                format!(
                    "{} MHz is not one of {SUPPORTED_WIDTHS_MHZ:?}",
                    self.channel_width_mhz
                ),
            ));
        };
        if self.num_channels == 0 {
            return Err(ConfigError::invalid_value("num_channels", "must be > 0"));
        }
        if self.num_channels > plan.len() {
            return Err(ConfigError::invalid_value(
                "num_channels",
                format!(
                    "{} exceeds the {} channels available at {} MHz",
                    self.num_channels,
                    plan.len(),
                    self.channel_width_mhz
                ),
            ));
        }
        Ok(())
    }

    /// Channels in use: the first `num_channels` entries of the plan for
    /// `channel_width_mhz`.
    ///
    /// Returns an empty slice for an unsupported width and clamps
    /// `num_channels` to the plan length, so it never panics on an
    /// unvalidated config.
    pub fn channels(&self) -> &'static [u8] {
        let plan = channel_plan(self.channel_width_mhz).unwrap_or(&[]);
        &plan[..self.num_channels.min(plan.len())]
    }

    /// Whether `size` counts as "aggregating" under this configuration.
    pub fn is_aggregating(&self, size: u32) -> bool {
        size > self.max_ampdu_size_when_disabled
    }

    /// Whether the controller re-homes a departing station's channel.
    pub fn rehomes_channels(&self) -> bool {
        self.num_channels > 1 && self.channel_strategy == ChannelStrategy::ControllerAssigned
    }
}
