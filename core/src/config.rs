use crate::error::{NavError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Navigation settings shared by all stacks of an application.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Default back button text for views that don’t set their own.
    pub back_button_text: String,
    /// Whether transitions animate unless an operation says otherwise.
    pub animate: bool,
    /// Default transition duration in milliseconds.
    pub transition_duration_ms: u64,
    /// Whether the hardware back button dismisses the top overlay before popping pages.
    pub back_button_dismisses_overlay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            back_button_text: "Back".into(),
            animate: true,
            transition_duration_ms: 400,
            back_button_dismisses_overlay: true,
        }
    }
}

impl Config {
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    /// Parses a TOML config; missing keys take their default values.
    pub fn from_toml_str(contents: &str) -> Result<Config> {
        toml::from_str(contents).map_err(|err| NavError::Config(err.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| NavError::Config(err.to_string()))
    }

    /// Reads a config file, falling back to the defaults if it is missing or malformed.
    pub fn read(path: impl AsRef<Path>) -> Config {
        let path = path.as_ref();
        if !path.exists() {
            return Config::default();
        }
        fs::read_to_string(path)
            .map_err(|err| {
                NavError::Config(format!("could not read `{}`: {}", path.display(), err))
            })
            .and_then(|contents| {
                log::info!("reading config file `{}`", path.display());
                Config::from_toml_str(&contents)
            })
            .map_err(|err| log::error!("{}", err))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = Config::from_toml_str("back_button_text = \"Zurück\"\nanimate = false\n").unwrap();
        assert_eq!(config.back_button_text, "Zurück");
        assert!(!config.animate);
        assert_eq!(config.transition_duration(), Duration::from_millis(400));
        assert!(config.back_button_dismisses_overlay);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let err = Config::from_toml_str("animate = \"very\"").unwrap_err();
        assert!(matches!(err, NavError::Config(_)));
    }

    #[test]
    fn read_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::read(dir.path().join("missing.toml")), Config::default());

        let path = dir.path().join("broken.toml");
        fs::File::create(&path)
            .and_then(|mut file| file.write_all(b"transition_duration_ms = -3"))
            .unwrap();
        assert_eq!(Config::read(&path), Config::default());

        let path = dir.path().join("nav.toml");
        let config = Config {
            transition_duration_ms: 250,
            ..Config::default()
        };
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(Config::read(&path), config);
    }
}
