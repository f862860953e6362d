//! Configuration with a fixed override order: built-in defaults, then
//! `~/.admission-board/config.toml`, then command-line flags. A missing file
//! is fine; a malformed one stops startup.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::ValueEnum;
use directories::BaseDirs;
use serde::Deserialize;
use thiserror::Error;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".admission-board";
pub const DEFAULT_INSTITUTION: &str = "mist";
pub const DEFAULT_UNIT: &str = "unitA";
const CONFIG_FILE_NAME: &str = "config.toml";
const STORE_FILE_NAME: &str = "preferences.sqlite";
const LOG_FILE_NAME: &str = "admission-board.log";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config at {path} is not valid TOML")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Screen shown first after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StartScreen {
    #[default]
    Schedule,
    Seats,
}

/// Sparse view of the config file; every field may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub catalog_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub institution: Option<String>,
    pub unit: Option<String>,
    pub log_path: Option<PathBuf>,
    pub start_screen: Option<StartScreen>,
    /// File these values were read from; `None` when no file existed.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// Values supplied on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub catalog_path: Option<PathBuf>,
    pub store_path: Option<PathBuf>,
    pub institution: Option<String>,
    pub unit: Option<String>,
    pub start_screen: Option<StartScreen>,
    pub ephemeral: bool,
}

/// Fully resolved settings with no gaps left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` means the catalog bundled with the binary.
    pub catalog_path: Option<PathBuf>,
    /// `None` means preferences live in memory only.
    pub store_path: Option<PathBuf>,
    pub institution: String,
    pub unit: String,
    pub log_path: PathBuf,
    pub start_screen: StartScreen,
    /// Config file that contributed to these settings, if any.
    pub config_file: Option<PathBuf>,
}

/// Resolve `~/.admission-board`.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}

/// Default location of the config file.
pub fn default_config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(CONFIG_FILE_NAME))
}

/// Parse the config file at `path`, treating a missing file as empty.
///
/// Runs before the logger exists, so the outcome is carried in
/// [`FileConfig::source`] and logged by the caller.
pub fn load_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        return Ok(FileConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut config: FileConfig =
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    config.source = Some(path.to_path_buf());
    Ok(config)
}

/// Merge defaults, file values and overrides, rooting default paths at
/// `data_dir`.
pub fn resolve(file: FileConfig, overrides: Overrides, data_dir: &Path) -> Settings {
    let store_path = if overrides.ephemeral {
        None
    } else {
        Some(
            overrides
                .store_path
                .or(file.store_path)
                .unwrap_or_else(|| data_dir.join(STORE_FILE_NAME)),
        )
    };

    Settings {
        catalog_path: overrides.catalog_path.or(file.catalog_path),
        store_path,
        institution: overrides
            .institution
            .or(file.institution)
            .unwrap_or_else(|| DEFAULT_INSTITUTION.to_string()),
        unit: overrides
            .unit
            .or(file.unit)
            .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        log_path: file
            .log_path
            .unwrap_or_else(|| data_dir.join(LOG_FILE_NAME)),
        start_screen: overrides
            .start_screen
            .or(file.start_screen)
            .unwrap_or_default(),
        config_file: file.source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_every_gap() {
        let settings = resolve(
            FileConfig::default(),
            Overrides::default(),
            Path::new("/home/u/.admission-board"),
        );
        assert_eq!(settings.catalog_path, None);
        assert_eq!(
            settings.store_path,
            Some(PathBuf::from("/home/u/.admission-board/preferences.sqlite"))
        );
        assert_eq!(settings.institution, "mist");
        assert_eq!(settings.unit, "unitA");
        assert_eq!(settings.start_screen, StartScreen::Schedule);
    }

    #[test]
    fn cli_beats_file_beats_defaults() {
        let file: FileConfig = toml::from_str(
            r#"
            institution = "du"
            unit = "unitB"
            start_screen = "seats"
            catalog_path = "/srv/catalog.json"
            "#,
        )
        .unwrap();
        let overrides = Overrides {
            institution: Some("buet".to_string()),
            ..Overrides::default()
        };
        let settings = resolve(file, overrides, Path::new("/data"));
        assert_eq!(settings.institution, "buet");
        assert_eq!(settings.unit, "unitB");
        assert_eq!(settings.start_screen, StartScreen::Seats);
        assert_eq!(settings.catalog_path, Some(PathBuf::from("/srv/catalog.json")));
    }

    #[test]
    fn ephemeral_drops_the_store_path() {
        let overrides = Overrides {
            ephemeral: true,
            store_path: Some(PathBuf::from("/tmp/ignored.sqlite")),
            ..Overrides::default()
        };
        let settings = resolve(FileConfig::default(), overrides, Path::new("/data"));
        assert_eq!(settings.store_path, None);
    }

    #[test]
    fn missing_file_is_empty_config() {
        let config = load_file_config(Path::new("/definitely/not/here.toml")).unwrap();
        assert!(config.institution.is_none());
        assert!(config.source.is_none());
    }

    #[test]
    fn loaded_file_is_reported_in_settings() {
        let path = std::env::temp_dir().join(format!(
            "admission-board-config-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "unit = \"unitC\"").unwrap();
        let file = load_file_config(&path);
        fs::remove_file(&path).ok();

        let settings = resolve(file.unwrap(), Overrides::default(), Path::new("/data"));
        assert_eq!(settings.unit, "unitC");
        assert_eq!(settings.config_file, Some(path));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!(
            "admission-board-bad-config-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "institution = [").unwrap();
        let err = load_file_config(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
