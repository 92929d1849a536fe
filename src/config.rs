//! Run configuration module.
//!
//! Handles loading, validating, and layering the settings for a split run.
//! Configuration is built from three layers, each overriding the one before:
//!
//! ```text
//! stock defaults  →  page-split.toml (or --config FILE)  →  CLI flags
//! ```
//!
//! ## Config File
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! input_folder = "scans"     # Folder of dual-page scans (no default)
//! output_folder = "pages"    # Created if missing (no default)
//! split_x = 0                # Column where the right page starts
//!
//! [crop]
//! enabled = false            # Trim margins before splitting
//! top = 0
//! bottom = 0
//! left = 0
//! right = 0
//!
//! [output]
//! quality = 95               # JPEG quality (1-100)
//! ```
//!
//! Relative folder paths are resolved against the working directory, not the
//! config file's location. Unknown keys are rejected to catch typos early,
//! and negative margins fail to parse.

use crate::imaging::{CropMargins, Quality};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file picked up from the working directory when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "page-split.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Please select input and output folders (missing: {0})")]
    MissingFolder(&'static str),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Settings for a split run, as loaded from `page-split.toml`.
///
/// All fields have defaults except the two folders, which must come from
/// the config file or the command line before a run can start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Folder holding the dual-page scans.
    pub input_folder: Option<PathBuf>,
    /// Folder the pages are written to.
    pub output_folder: Option<PathBuf>,
    /// Column at which the right page starts, after cropping.
    pub split_x: u32,
    /// Margin trimming applied before the split.
    pub crop: CropConfig,
    /// Page encoding settings.
    pub output: OutputConfig,
}

/// Margin trimming settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    pub enabled: bool,
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

impl CropConfig {
    pub fn margins(&self) -> CropMargins {
        CropMargins {
            top: self.top,
            bottom: self.bottom,
            left: self.left,
            right: self.right,
        }
    }

    /// Margins to apply, or `None` when cropping is disabled.
    pub fn active_margins(&self) -> Option<CropMargins> {
        self.enabled.then(|| self.margins())
    }
}

/// Page encoding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// JPEG quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: u32::from(Quality::default().value()),
        }
    }
}

impl SplitConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.output.quality) {
            return Err(ConfigError::Validation(
                "output.quality must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// The input and output folders, or an error naming the first one missing.
    ///
    /// An empty path counts as missing.
    pub fn folders(&self) -> Result<(&Path, &Path), ConfigError> {
        let input = non_empty(self.input_folder.as_deref())
            .ok_or(ConfigError::MissingFolder("input folder"))?;
        let output = non_empty(self.output_folder.as_deref())
            .ok_or(ConfigError::MissingFolder("output folder"))?;
        Ok((input, output))
    }

    pub fn quality(&self) -> Quality {
        Quality::new(self.output.quality)
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

// =============================================================================
// Command-line overrides
// =============================================================================

/// Values given on the command line. Only fields that are set override the
/// lower layers.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_folder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_x: Option<u32>,
    #[serde(skip_serializing_if = "CropOverrides::is_empty")]
    pub crop: CropOverrides,
    #[serde(skip_serializing_if = "OutputOverrides::is_empty")]
    pub output: OutputOverrides,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CropOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<u32>,
}

impl CropOverrides {
    fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.top.is_none()
            && self.bottom.is_none()
            && self.left.is_none()
            && self.right.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct OutputOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
}

impl OutputOverrides {
    fn is_empty(&self) -> bool {
        self.quality.is_none()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that the config file and CLI flags merge onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(SplitConfig::default())?)
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

/// Pick the config file to read.
///
/// An explicit path must exist. Without one, `page-split.toml` in
/// `search_dir` is used if present; otherwise there is no config file.
pub fn find_config_file(
    explicit: Option<&Path>,
    search_dir: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    match explicit {
        Some(path) if path.is_file() => Ok(Some(path.to_path_buf())),
        Some(path) => Err(ConfigError::FileNotFound(path.to_path_buf())),
        None => {
            let candidate = search_dir.join(CONFIG_FILE_NAME);
            Ok(candidate.is_file().then_some(candidate))
        }
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge the layers in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<SplitConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: SplitConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the full configuration: stock defaults, then the config file (if
/// any), then command-line overrides.
pub fn load_config(
    config_file: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<SplitConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let mut overlays = Vec::new();
    if let Some(path) = config_file {
        overlays.push(load_raw_config(path)?);
    }
    overlays.push(toml::Value::try_from(overrides)?);
    resolve_config(base, overlays)
}

/// Returns a fully-commented stock `page-split.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# page-split configuration
# ========================
# All settings are optional. Command-line flags override anything set here.
# Unknown keys will cause an error.

# Folder of dual-page scans. Only .jpg, .jpeg, .png, .bmp and .tiff files
# directly inside it are processed; subfolders are ignored.
# input_folder = "scans"

# Folder the pages are written to. Created (with parents) if missing.
# output_folder = "pages"

# Column, in pixels after cropping, where the right page starts.
# Scans no wider than this are written whole as a single _left page.
split_x = 0

# ---------------------------------------------------------------------------
# Cropping
# ---------------------------------------------------------------------------
[crop]
# Trim margins from every scan before splitting.
enabled = false

# Pixels removed from each edge. Margins larger than the scan are clamped;
# if nothing would be left the scan is split uncropped with a warning.
top = 0
bottom = 0
left = 0
right = 0

# ---------------------------------------------------------------------------
# Output
# ---------------------------------------------------------------------------
[output]
# JPEG quality for every page (1 = worst, 100 = best).
quality = 95
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = SplitConfig::default();
        assert_eq!(config.input_folder, None);
        assert_eq!(config.output_folder, None);
        assert_eq!(config.split_x, 0);
        assert!(!config.crop.enabled);
        assert!(config.crop.margins().is_zero());
        assert_eq!(config.output.quality, 95);
    }

    #[test]
    fn parse_partial_config() {
        let config: SplitConfig = toml::from_str(
            r#"
split_x = 1200

[crop]
top = 40
"#,
        )
        .unwrap();
        assert_eq!(config.split_x, 1200);
        assert_eq!(config.crop.top, 40);
        // Unspecified values keep defaults
        assert!(!config.crop.enabled);
        assert_eq!(config.crop.bottom, 0);
        assert_eq!(config.output.quality, 95);
    }

    #[test]
    fn unknown_keys_rejected() {
        let result: Result<SplitConfig, _> = toml::from_str("split_y = 3\n");
        assert!(result.is_err());
        let result: Result<SplitConfig, _> = toml::from_str("[crop]\ntpo = 3\n");
        assert!(result.is_err());
    }

    #[test]
    fn negative_margin_rejected() {
        let result: Result<SplitConfig, _> = toml::from_str("[crop]\ntop = -5\n");
        assert!(result.is_err());
    }

    #[test]
    fn active_margins_follow_enabled_flag() {
        let mut crop = CropConfig {
            top: 1,
            bottom: 2,
            left: 3,
            right: 4,
            ..Default::default()
        };
        assert_eq!(crop.active_margins(), None);
        crop.enabled = true;
        assert_eq!(
            crop.active_margins(),
            Some(CropMargins {
                top: 1,
                bottom: 2,
                left: 3,
                right: 4
            })
        );
    }

    #[test]
    fn validate_rejects_bad_quality() {
        let mut config = SplitConfig::default();
        config.output.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.output.quality = 101;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.output.quality = 100;
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // folders
    // =========================================================================

    #[test]
    fn folders_missing_input() {
        let config = SplitConfig {
            output_folder: Some("out".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.folders(),
            Err(ConfigError::MissingFolder("input folder"))
        ));
    }

    #[test]
    fn folders_missing_output() {
        let config = SplitConfig {
            input_folder: Some("in".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.folders(),
            Err(ConfigError::MissingFolder("output folder"))
        ));
    }

    #[test]
    fn folders_empty_string_counts_as_missing() {
        let config = SplitConfig {
            input_folder: Some(PathBuf::new()),
            output_folder: Some("out".into()),
            ..Default::default()
        };
        assert!(matches!(
            config.folders(),
            Err(ConfigError::MissingFolder("input folder"))
        ));
    }

    #[test]
    fn folders_present() {
        let config = SplitConfig {
            input_folder: Some("in".into()),
            output_folder: Some("out".into()),
            ..Default::default()
        };
        let (input, output) = config.folders().unwrap();
        assert_eq!(input, Path::new("in"));
        assert_eq!(output, Path::new("out"));
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_overlay_wins_and_base_kept() {
        let base: toml::Value = toml::from_str("split_x = 10\n[crop]\ntop = 1\nleft = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[crop]\ntop = 9\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["split_x"].as_integer(), Some(10));
        assert_eq!(merged["crop"]["top"].as_integer(), Some(9));
        assert_eq!(merged["crop"]["left"].as_integer(), Some(2));
    }

    #[test]
    fn empty_overrides_serialize_to_empty_table() {
        let value = toml::Value::try_from(&ConfigOverrides::default()).unwrap();
        assert_eq!(value.as_table().map(|t| t.len()), Some(0));
    }

    // =========================================================================
    // find_config_file / load_config
    // =========================================================================

    #[test]
    fn find_config_uses_default_name_in_search_dir() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(find_config_file(None, tmp.path()).unwrap(), None);

        fs::write(tmp.path().join(CONFIG_FILE_NAME), "split_x = 5\n").unwrap();
        assert_eq!(
            find_config_file(None, tmp.path()).unwrap(),
            Some(tmp.path().join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn find_config_explicit_missing_errors() {
        let tmp = TempDir::new().unwrap();
        let result = find_config_file(Some(&tmp.path().join("custom.toml")), tmp.path());
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn load_config_defaults_without_file() {
        let config = load_config(None, &ConfigOverrides::default()).unwrap();
        assert_eq!(config, SplitConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("split.toml");
        fs::write(
            &path,
            r#"
input_folder = "scans"
output_folder = "pages"
split_x = 1500

[crop]
enabled = true
top = 12
right = 30
"#,
        )
        .unwrap();

        let config = load_config(Some(&path), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.input_folder.as_deref(), Some(Path::new("scans")));
        assert_eq!(config.output_folder.as_deref(), Some(Path::new("pages")));
        assert_eq!(config.split_x, 1500);
        assert!(config.crop.enabled);
        assert_eq!(config.crop.top, 12);
        assert_eq!(config.crop.right, 30);
        assert_eq!(config.crop.bottom, 0);
    }

    #[test]
    fn cli_overrides_beat_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("split.toml");
        fs::write(
            &path,
            "split_x = 1500\n[crop]\nenabled = true\ntop = 12\n[output]\nquality = 70\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            split_x: Some(900),
            crop: CropOverrides {
                enabled: Some(false),
                ..Default::default()
            },
            ..Default::default()
        };
        let config = load_config(Some(&path), &overrides).unwrap();
        assert_eq!(config.split_x, 900);
        assert!(!config.crop.enabled);
        // Not overridden: file value survives
        assert_eq!(config.crop.top, 12);
        assert_eq!(config.output.quality, 70);
    }

    #[test]
    fn load_config_invalid_toml_errors() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("split.toml");
        fs::write(&path, "split_x = [not valid\n").unwrap();
        let result = load_config(Some(&path), &ConfigOverrides::default());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_merged_result() {
        let overrides = ConfigOverrides {
            output: OutputOverrides { quality: Some(0) },
            ..Default::default()
        };
        let result = load_config(None, &overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_is_valid() {
        let config: SplitConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, SplitConfig::default());
    }
}
