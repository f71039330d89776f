//! Studio configuration module.
//!
//! Handles loading, validating, and merging `cardsmith.toml`. Stock defaults
//! are overridden by an optional user file in the config directory.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [assets]
//! root = "public"                     # Directory holding poke/ and fonts/
//! placeholder = "poke/missingno.png"  # Shown when no photo is chosen
//!
//! [timing]
//! card_debounce_ms = 500              # Quiet time after a card edit
//! position_debounce_ms = 300          # Quiet time after a drag/scroll
//!
//! [interaction]
//! scroll_step_px = 20.0               # Native pixels per wheel tick
//!
//! [render]
//! soften = true                       # Half-size resample pass at the end
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse; override just the values you want:
//!
//! ```toml
//! [timing]
//! card_debounce_ms = 250
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::geometry::FrameGeometry;
use crate::imaging::RenderOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the config file inside the config directory.
pub const CONFIG_FILENAME: &str = "cardsmith.toml";

/// Longest debounce window accepted.
pub const MAX_DEBOUNCE_MS: u64 = 10_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `cardsmith.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    pub assets: AssetsConfig,
    pub timing: TimingConfig,
    pub interaction: InteractionConfig,
    pub render: RenderConfig,
}

/// Where the card assets live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory containing `poke/` and `fonts/`.
    pub root: String,
    /// Placeholder photo, relative to `root`.
    pub placeholder: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            root: "public".to_string(),
            placeholder: "poke/missingno.png".to_string(),
        }
    }
}

impl AssetsConfig {
    /// Asset root resolved against `base` when relative.
    pub fn root_in(&self, base: &Path) -> PathBuf {
        let root = Path::new(&self.root);
        if root.is_absolute() {
            root.to_path_buf()
        } else {
            base.join(root)
        }
    }
}

/// Debounce windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub card_debounce_ms: u64,
    pub position_debounce_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            card_debounce_ms: 500,
            position_debounce_ms: 300,
        }
    }
}

impl TimingConfig {
    pub fn card_debounce(&self) -> Duration {
        Duration::from_millis(self.card_debounce_ms)
    }

    pub fn position_debounce(&self) -> Duration {
        Duration::from_millis(self.position_debounce_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InteractionConfig {
    /// Target change in native photo pixels per wheel tick.
    pub scroll_step_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            scroll_step_px: crate::interaction::DEFAULT_SCROLL_STEP_PX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Resample down to half size and back up after compositing.
    pub soften: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { soften: true }
    }
}

impl StudioConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.assets.root.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets.root must not be empty".into(),
            ));
        }
        if self.assets.placeholder.trim().is_empty() {
            return Err(ConfigError::Validation(
                "assets.placeholder must not be empty".into(),
            ));
        }
        for (key, value) in [
            ("timing.card_debounce_ms", self.timing.card_debounce_ms),
            ("timing.position_debounce_ms", self.timing.position_debounce_ms),
        ] {
            if value > MAX_DEBOUNCE_MS {
                return Err(ConfigError::Validation(format!(
                    "{key} must be at most {MAX_DEBOUNCE_MS}"
                )));
            }
        }
        let step = self.interaction.scroll_step_px;
        if !step.is_finite() || step <= 0.0 {
            return Err(ConfigError::Validation(
                "interaction.scroll_step_px must be a positive number".into(),
            ));
        }
        Ok(())
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            frame: FrameGeometry::CARD,
            soften: self.render.soften,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(StudioConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `cardsmith.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no config file.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StudioConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StudioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `cardsmith.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(dir: &Path) -> Result<StudioConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `cardsmith.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Cardsmith Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Assets
# ---------------------------------------------------------------------------
[assets]
# Directory containing poke/ (frame art, badges, icons) and fonts/.
# Relative paths are resolved against the config directory.
root = "public"

# Photo shown when none is chosen, relative to the asset root.
placeholder = "poke/missingno.png"

# ---------------------------------------------------------------------------
# Timing
# ---------------------------------------------------------------------------
[timing]
# Quiet time after the last card-field edit before re-rendering (ms, max 10000).
card_debounce_ms = 500

# Quiet time after the last drag or scroll before re-rendering (ms, max 10000).
position_debounce_ms = 300

# ---------------------------------------------------------------------------
# Interaction
# ---------------------------------------------------------------------------
[interaction]
# How far one wheel tick moves the photo edge, in native photo pixels.
# The scale step is this divided by the photo's longer edge.
scroll_step_px = 20.0

# ---------------------------------------------------------------------------
# Render
# ---------------------------------------------------------------------------
[render]
# Resample the finished card down to half size and back up.
soften = true
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = StudioConfig::default();
        assert_eq!(config.assets.root, "public");
        assert_eq!(config.assets.placeholder, "poke/missingno.png");
        assert_eq!(config.timing.card_debounce(), Duration::from_millis(500));
        assert_eq!(config.timing.position_debounce(), Duration::from_millis(300));
        assert_eq!(config.interaction.scroll_step_px, 20.0);
        assert!(config.render.soften);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[timing]
card_debounce_ms = 250
"#;
        let config: StudioConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.timing.card_debounce_ms, 250);
        // Default values preserved
        assert_eq!(config.timing.position_debounce_ms, 300);
        assert_eq!(config.assets.root, "public");
    }

    #[test]
    fn unknown_keys_rejected() {
        let toml = r#"
[render]
sharpen = true
"#;
        let result: Result<StudioConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: StudioConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn root_in_resolves_relative_paths() {
        let assets = AssetsConfig::default();
        assert_eq!(
            assets.root_in(Path::new("/srv/cards")),
            PathBuf::from("/srv/cards/public")
        );
        let absolute = AssetsConfig {
            root: "/opt/assets".into(),
            ..AssetsConfig::default()
        };
        assert_eq!(
            absolute.root_in(Path::new("/srv/cards")),
            PathBuf::from("/opt/assets")
        );
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_long_debounce() {
        let mut config = StudioConfig::default();
        config.timing.position_debounce_ms = 60_000;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timing.position_debounce_ms"));
    }

    #[test]
    fn validate_rejects_bad_scroll_step() {
        for step in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut config = StudioConfig::default();
            config.interaction.scroll_step_px = step;
            assert!(config.validate().is_err(), "step {step}");
        }
    }

    #[test]
    fn validate_rejects_empty_paths() {
        let mut config = StudioConfig::default();
        config.assets.placeholder = "  ".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_overrides_leaf_and_keeps_siblings() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[timing]\ncard_debounce_ms = 100").unwrap();
        let merged = merge_toml(base, overlay);
        let config: StudioConfig = merged.try_into().unwrap();
        assert_eq!(config.timing.card_debounce_ms, 100);
        assert_eq!(config.timing.position_debounce_ms, 300);
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, StudioConfig::default());
    }

    #[test]
    fn load_config_reads_overrides() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[render]\nsoften = false\n[interaction]\nscroll_step_px = 40.0\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert!(!config.render.soften);
        assert_eq!(config.interaction.scroll_step_px, 40.0);
        assert!(!config.render_options().soften);
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[render\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validates_after_merge() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[timing]\ncard_debounce_ms = 20000\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }
}
