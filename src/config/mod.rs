use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::icon::{default_icons, IconSpec};

/// Generator configuration stored as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory the icons are written to.
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    /// Text drawn on every icon.
    #[serde(default = "default_text")]
    pub text: String,
    /// Icons to generate, in output order.
    #[serde(default = "default_icons")]
    pub icons: Vec<IconSpec>,
}

/// Largest accepted icon edge, in pixels.
pub const MAX_ICON_SIZE: u32 = 4096;

fn default_out_dir() -> PathBuf {
    PathBuf::from("public").join("icons")
}

fn default_text() -> String {
    "FFHL".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            text: default_text(),
            icons: default_icons(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("text must not be empty")]
    EmptyText,
    #[error("no icons configured")]
    NoIcons,
    #[error("icon {0:?} has size 0")]
    ZeroSize(String),
    #[error("icon {name:?} has size {size}, maximum is {}", MAX_ICON_SIZE)]
    TooLarge { name: String, size: u32 },
    #[error("icon {name:?} has pad_ratio {ratio}, expected a value in [0, 1)")]
    PadRatio { name: String, ratio: f64 },
    #[error("icon #{0} has an empty name")]
    EmptyName(usize),
    #[error("icon name {0:?} is used more than once")]
    DuplicateName(String),
    #[error("icon name {0:?} must be a plain file name")]
    InvalidName(String),
}

impl AppConfig {
    /// Load config from `path`, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        tracing::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.text.is_empty() {
            return Err(ConfigError::EmptyText);
        }
        if self.icons.is_empty() {
            return Err(ConfigError::NoIcons);
        }

        let mut seen = HashSet::new();
        for (idx, icon) in self.icons.iter().enumerate() {
            if icon.name.is_empty() {
                return Err(ConfigError::EmptyName(idx));
            }
            if !is_file_name(&icon.name) {
                return Err(ConfigError::InvalidName(icon.name.clone()));
            }
            if icon.size == 0 {
                return Err(ConfigError::ZeroSize(icon.name.clone()));
            }
            if icon.size > MAX_ICON_SIZE {
                return Err(ConfigError::TooLarge {
                    name: icon.name.clone(),
                    size: icon.size,
                });
            }
            if !(0.0..1.0).contains(&icon.pad_ratio) {
                return Err(ConfigError::PadRatio {
                    name: icon.name.clone(),
                    ratio: icon.pad_ratio,
                });
            }
            if !seen.insert(icon.name.as_str()) {
                return Err(ConfigError::DuplicateName(icon.name.clone()));
            }
        }
        Ok(())
    }
}

/// A single normal path component, so the icon stays inside `out_dir`.
fn is_file_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
