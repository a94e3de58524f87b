use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::keys::KeyBindings;
use crate::model::config::Config;

/// Error type for reading the configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

const APP_DIR: &str = "todoline";

/// `~/.config/todoline/config.toml` (platform config dir)
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// `<cache dir>/todoline/todoline.log`
pub fn log_file_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
        .join("todoline.log")
}

/// Read the config file. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Config::default());
        }
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Layer the `[keys]` overrides from `config` over the default bindings.
/// Overrides naming an unknown action are dropped and logged.
pub fn load_key_bindings(config: &Config) -> KeyBindings {
    let (bindings, rejected) = KeyBindings::with_overrides(&config.keys);
    for name in &rejected {
        log::warn!("key binding not found: {}", name);
    }
    bindings
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_config_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = read_config(&tmp.path().join("config.toml")).unwrap();
        assert!(config.settings.file.is_none());
        assert!(config.keys.is_empty());
    }

    #[test]
    fn test_read_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            "[settings]\nfile = \"~/todo.txt\"\n\n[keys]\ndelete = \"ctrl d, D\"\n",
        )
        .unwrap();
        let config = read_config(&path).unwrap();
        assert_eq!(config.settings.file.as_deref(), Some("~/todo.txt"));
        let bindings = load_key_bindings(&config);
        assert_eq!(bindings.resolve("delete"), ["ctrl d", "D"]);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[settings\nfile = ").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_unknown_override_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[keys]\nfly-away = \"z\"\n").unwrap();
        let config = read_config(&path).unwrap();
        let bindings = load_key_bindings(&config);
        assert!(bindings.resolve("fly-away").is_empty());
    }
}
