//! Engine tuning, loadable from a TOML file.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [sizing]
//! hour_rate = 80.0
//!
//! [layout]
//! strategy = "force"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub sizing: SizingConfig,
    pub layout: LayoutConfig,
    pub drag: DragConfig,
    pub links: LinkConfig,
    pub animation: AnimationConfig,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded engine config");
                config
            }
            Err(error) => {
                tracing::warn!("{error}; using default engine config");
                Self::default()
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizingConfig {
    /// Radius of the canonical root.
    pub root_radius: f32,
    /// Lower bound for the smallest child in a sibling group.
    pub min_child_floor: f32,
    /// Currency units one hour of estimated time is worth.
    pub hour_rate: f64,
    pub min_child_ratio: f32,
    pub max_child_ratio: f32,
    /// Radius of nodes the hierarchy never reaches, relative to the root.
    pub orphan_ratio: f32,
}

impl Default for SizingConfig {
    fn default() -> Self {
        Self {
            root_radius: 64.0,
            min_child_floor: 14.0,
            hour_rate: 50.0,
            min_child_ratio: 0.35,
            max_child_ratio: 0.75,
            orphan_ratio: 0.55,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    #[default]
    Radial,
    Force,
}

impl LayoutKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Radial => "Radial",
            Self::Force => "Force",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub strategy: LayoutKind,
    /// Space between a parent's rim and its child ring.
    pub ring_gap: f32,
    /// Extra roots orbit the canonical root at this multiple of its radius.
    pub extra_root_spread: f32,
    /// Radius of the circle unplaced nodes are seeded on.
    pub seed_radius: f32,
    pub force_iterations: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            strategy: LayoutKind::Radial,
            ring_gap: 48.0,
            extra_root_spread: 2.2,
            seed_radius: 320.0,
            force_iterations: 300,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Per-axis displacement, in map units, before a press becomes a drag.
    pub click_threshold: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            click_threshold: 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Links at or below this length are drawn straight.
    pub curve_threshold: f32,
    pub max_bend: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            curve_threshold: 140.0,
            max_bend: 140.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Exponential approach rate per second.
    pub stiffness: f32,
    /// Distance below which a displayed position snaps to its target.
    pub settle_distance: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            stiffness: 12.0,
            settle_distance: 0.25,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [sizing]
            hour_rate = 80.0

            [layout]
            strategy = "force"
            "#,
        )
        .unwrap();

        assert_eq!(config.sizing.hour_rate, 80.0);
        assert_eq!(config.sizing.root_radius, SizingConfig::default().root_radius);
        assert_eq!(config.layout.strategy, LayoutKind::Force);
        assert_eq!(config.links, LinkConfig::default());
    }

    #[test]
    fn load_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[layout]\nstrategy = \"spiral\"").unwrap();

        let error = EngineConfig::load(file.path()).unwrap_err();
        assert!(matches!(error, ConfigError::Parse { .. }));
    }

    #[test]
    fn load_or_default_falls_back_on_missing_file() {
        let config = EngineConfig::load_or_default(Some(Path::new("/nonexistent/effort-map.toml")));
        assert_eq!(config, EngineConfig::default());
    }
}
