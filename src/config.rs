//! Configuration file handling for flipper-term.
//!
//! Loads configuration from `<config dir>/flipper-term/config.toml` or a
//! custom path. Command-line flags override anything set here.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::glyph::Density;
use crate::layout::TextStyle;

/// Configuration file structure for flipper-term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub link: LinkConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `low`, `medium` or `high`.
    #[serde(default = "default_density")]
    pub density: String,
    #[serde(default)]
    pub bold: bool,
    /// 256-colour index for lit pixels.
    #[serde(default = "default_foreground")]
    pub foreground: u8,
    /// 256-colour index for dark pixels.
    #[serde(default)]
    pub background: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            density: default_density(),
            bold: false,
            foreground: default_foreground(),
            background: 0,
        }
    }
}

impl DisplayConfig {
    pub fn density(&self) -> Option<Density> {
        Density::from_name(&self.density)
    }

    pub fn style(&self) -> TextStyle {
        TextStyle {
            foreground: self.foreground,
            background: self.background,
            bold: self.bold,
        }
    }
}

/// Stream link endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LinkConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_density() -> String {
    Density::default().name().to_string()
}

fn default_foreground() -> u8 {
    TextStyle::default().foreground
}

impl Config {
    /// Load configuration from a file path.
    ///
    /// A missing default file gives the default config. A missing explicit
    /// file, an unreadable file or invalid contents are errors.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let explicit = path.is_some();
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound(path));
            }
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            path: path.clone(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|e| e.at(&path))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            path: PathBuf::new(),
            source: e,
        })?;
        if config.display.density().is_none() {
            return Err(ConfigError::Invalid {
                path: PathBuf::new(),
                message: format!("unknown density '{}'", config.display.density),
            });
        }
        Ok(config)
    }

    /// The config rendered as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Write a default config file, returning its path.
///
/// An existing file is only replaced when `force` is set.
pub fn init(path: Option<&Path>, force: bool) -> Result<PathBuf, ConfigError> {
    let path = path.map(PathBuf::from).unwrap_or_else(default_path);
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists(path));
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    let content = Config::default().to_toml()?;
    std::fs::write(&path, content).map_err(|e| ConfigError::IoError {
        path: path.clone(),
        source: e,
    })?;
    log::info!("Wrote default config to {}", path.display());
    Ok(path)
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Config file '{}' already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to read config file '{}': {source}", path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{}': {source}", path.display())]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file '{}': {message}", path.display())]
    Invalid { path: PathBuf, message: String },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

impl ConfigError {
    /// Attach the file path to a parse or validation error.
    fn at(self, file: &Path) -> Self {
        match self {
            ConfigError::ParseError { source, .. } => ConfigError::ParseError {
                path: file.to_path_buf(),
                source,
            },
            ConfigError::Invalid { message, .. } => ConfigError::Invalid {
                path: file.to_path_buf(),
                message,
            },
            other => other,
        }
    }
}

/// Get the default config file path.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("flipper-term").join("config.toml"))
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config/flipper-term/config.toml")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.display.density(), Some(Density::Low));
        assert_eq!(config.display.style(), TextStyle::default());
        assert!(config.link.frames.is_none());
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::parse(
            r#"
            [display]
            density = "high"
            bold = true
            foreground = 15

            [link]
            frames = "/tmp/frames"
            buttons = "/tmp/buttons"
            name = "Dolphin"
            "#,
        )
        .unwrap();
        assert_eq!(config.display.density(), Some(Density::High));
        assert!(config.display.bold);
        assert_eq!(config.display.foreground, 15);
        assert_eq!(config.display.background, 0);
        assert_eq!(config.link.frames, Some(PathBuf::from("/tmp/frames")));
        assert_eq!(config.link.name.as_deref(), Some("Dolphin"));
    }

    #[test]
    fn test_unknown_density_rejected() {
        let err = Config::parse("[display]\ndensity = \"ultra\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let err = Config::load(Some(Path::new("/nonexistent/flipper-term.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_parse_error_carries_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display\n").unwrap();
        let err = Config::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        assert_eq!(init(Some(&path), false).unwrap(), path);
        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
        assert!(matches!(
            init(Some(&path), false),
            Err(ConfigError::AlreadyExists(_))
        ));
        assert!(init(Some(&path), true).is_ok());
    }
}
