use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration from config.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    /// Key binding overrides: action name → comma-separated key names
    #[serde(default)]
    pub keys: IndexMap<String, String>,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// The todo.txt file. The `--todo` flag takes precedence.
    #[serde(default)]
    pub file: Option<String>,
    /// Archive file for completed tasks. The `--done` flag takes precedence.
    #[serde(default)]
    pub archive: Option<String>,
    #[serde(default)]
    pub wrap: bool,
    #[serde(default)]
    pub borders: bool,
    #[serde(default = "default_true")]
    pub toolbar: bool,
    /// Stamp today's date on tasks created in the TUI
    #[serde(default = "default_true")]
    pub add_creation_date: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            file: None,
            archive: None,
            wrap: false,
            borders: false,
            toolbar: true,
            add_creation_date: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Theme colour overrides by name, as `#RRGGBB`
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.settings.file.is_none());
        assert!(!config.settings.wrap);
        assert!(config.settings.toolbar);
        assert!(config.settings.add_creation_date);
        assert!(config.keys.is_empty());
    }

    #[test]
    fn test_full_config() {
        let text = r##"
[settings]
file = "~/todo.txt"
archive = "~/done.txt"
wrap = true
borders = true
toolbar = false

[keys]
delete = "ctrl d, D"
down = "j"

[ui.colors]
priority_a = "#FF4444"
"##;
        let config: Config = toml::from_str(text).unwrap();
        assert_eq!(config.settings.file.as_deref(), Some("~/todo.txt"));
        assert_eq!(config.settings.archive.as_deref(), Some("~/done.txt"));
        assert!(config.settings.wrap);
        assert!(config.settings.borders);
        assert!(!config.settings.toolbar);
        assert_eq!(
            config.keys.keys().collect::<Vec<_>>(),
            vec!["delete", "down"]
        );
        assert_eq!(config.ui.colors["priority_a"], "#FF4444");
    }
}
