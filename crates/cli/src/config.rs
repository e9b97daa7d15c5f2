//! User configuration loaded from `config.toml`.
//!
//! # Path Resolution
//!
//! 1. `--config PATH` on the command line (must exist).
//! 2. `$BEACON_CONFIG` (must exist).
//! 3. `<config dir>/beacon/config.toml`; a missing file means defaults.
//!
//! Every key is optional. Unset keys fall back to the built-in defaults.
//!
//! ```toml
//! [bus]
//! port = 47621
//!
//! [toast]
//! enter_delay_ms = 10
//! auto_dismiss_ms = 3000
//! resume_dismiss_ms = 1500
//! exit_anim_ms = 500
//!
//! [tooltip]
//! fade_in_ms = 10
//! visible_ms = 1000
//! fade_out_ms = 300
//! hint = "Click to copy"
//! copied = "Copied!"
//! copy_failed = "Copy failed"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use beacon_proto::DEFAULT_PORT;
use beacon_toast::{ToastOptions, ToastTiming, TooltipLabels, TooltipTiming};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "BEACON_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The file is not valid TOML or has unexpected keys or types.
	#[error("invalid config {path}: {error}")]
	Parse {
		/// Path to the offending file.
		path: PathBuf,
		/// The underlying parse error.
		error: toml::de::Error,
	},
}

/// `[bus]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BusConfig {
	/// Loopback port of the bus.
	pub port: Option<u16>,
}

/// `[toast]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToastConfig {
	/// Delay before a new toast slides on-screen.
	pub enter_delay_ms: Option<u64>,
	/// Time on-screen before an untouched toast dismisses itself.
	pub auto_dismiss_ms: Option<u64>,
	/// Dismiss delay armed when the pointer leaves a paused toast.
	pub resume_dismiss_ms: Option<u64>,
	/// Slide-out duration before the toast is destroyed.
	pub exit_anim_ms: Option<u64>,
}

/// `[tooltip]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TooltipConfig {
	/// Delay before a tooltip becomes visible.
	pub fade_in_ms: Option<u64>,
	/// Time after creation at which the fade-out starts.
	pub visible_ms: Option<u64>,
	/// Fade-out duration before the tooltip is destroyed.
	pub fade_out_ms: Option<u64>,
	/// Hover hint text.
	pub hint: Option<String>,
	/// Text shown after a successful copy.
	pub copied: Option<String>,
	/// Text shown after a failed copy.
	pub copy_failed: Option<String>,
}

/// Parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// `[bus]` section.
	pub bus: BusConfig,
	/// `[toast]` section.
	pub toast: ToastConfig,
	/// `[tooltip]` section.
	pub tooltip: TooltipConfig,
}

impl Config {
	/// Loads configuration following the path resolution order.
	///
	/// # Errors
	///
	/// Returns [`ConfigError`] if an explicit file is missing or any file is malformed.
	pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
		let explicit = explicit
			.map(Path::to_path_buf)
			.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
		if let Some(path) = explicit {
			return Self::load_from(&path);
		}

		let Some(path) = default_path() else {
			tracing::debug!("no config directory; using defaults");
			return Ok(Self::default());
		};
		if !path.exists() {
			tracing::debug!(path = %path.display(), "config file absent; using defaults");
			return Ok(Self::default());
		}
		Self::load_from(&path)
	}

	/// Reads and parses the file at `path`.
	///
	/// # Errors
	///
	/// Returns [`ConfigError`] if the file cannot be read or parsed.
	pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		let config = toml::from_str(&text).map_err(|error| ConfigError::Parse {
			path: path.to_path_buf(),
			error,
		})?;
		tracing::info!(path = %path.display(), "config loaded");
		Ok(config)
	}

	/// Resolves the bus port: CLI flag, then `BEACON_PORT`, then this file, then the default.
	pub fn port(&self, flag: Option<u16>) -> u16 {
		resolve_port(flag, beacon_proto::port_from_env(), self.bus.port)
	}

	/// Builds toast options, keeping defaults for unset keys.
	pub fn toast_options(&self) -> ToastOptions {
		let ms = Duration::from_millis;
		let timing = ToastTiming::default();
		let tooltip = TooltipTiming::default();
		let labels = TooltipLabels::default();
		let t = &self.toast;
		let tt = &self.tooltip;

		ToastOptions {
			timing: ToastTiming {
				enter_delay: t.enter_delay_ms.map_or(timing.enter_delay, ms),
				auto_dismiss: t.auto_dismiss_ms.map_or(timing.auto_dismiss, ms),
				resume_dismiss: t.resume_dismiss_ms.map_or(timing.resume_dismiss, ms),
				exit_animation: t.exit_anim_ms.map_or(timing.exit_animation, ms),
			},
			tooltip: TooltipTiming {
				fade_in_delay: tt.fade_in_ms.map_or(tooltip.fade_in_delay, ms),
				visible_until: tt.visible_ms.map_or(tooltip.visible_until, ms),
				fade_out: tt.fade_out_ms.map_or(tooltip.fade_out, ms),
				..tooltip
			},
			labels: TooltipLabels {
				hint: tt.hint.clone().unwrap_or(labels.hint),
				copied: tt.copied.clone().unwrap_or(labels.copied),
				copy_failed: tt.copy_failed.clone().unwrap_or(labels.copy_failed),
			},
		}
	}
}

/// `<config dir>/beacon/config.toml`, if the platform has a config directory.
pub fn default_path() -> Option<PathBuf> {
	dirs::config_dir().map(|dir| dir.join("beacon").join("config.toml"))
}

fn resolve_port(flag: Option<u16>, env: Option<u16>, file: Option<u16>) -> u16 {
	flag.or(env).or(file).unwrap_or(DEFAULT_PORT)
}
