use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::locale::Locale;

pub const DISCORD_TOKEN_ENV: &str = "DISCORD_TOKEN";
pub const OPENWEATHER_API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const LANGUAGE_ENV: &str = "FORECAST_LANGUAGE";

/// Bot configuration stored on disk, overridable from the environment.
///
/// Example TOML:
/// ```toml
/// discord_token = "..."
/// openweather_api_key = "..."
/// language = "de"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub discord_token: Option<String>,

    pub openweather_api_key: Option<String>,

    /// Provider language and reply language; German when absent.
    pub language: Option<Locale>,

    /// Alternative OpenWeather host, mainly for proxies.
    pub openweather_base_url: Option<String>,
}

impl Config {
    /// Load config from the platform config dir, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast-bot", "forecast-bot")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Override file values with `DISCORD_TOKEN`, `OPENWEATHER_API_KEY` and `FORECAST_LANGUAGE`.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = non_empty(DISCORD_TOKEN_ENV) {
            self.discord_token = Some(token);
        }
        if let Some(key) = non_empty(OPENWEATHER_API_KEY_ENV) {
            self.openweather_api_key = Some(key);
        }
        if let Some(language) = non_empty(LANGUAGE_ENV) {
            let locale = Locale::try_from(language.as_str())
                .with_context(|| format!("Invalid {LANGUAGE_ENV}"))?;
            self.language = Some(locale);
        }

        Ok(())
    }

    pub fn discord_token(&self) -> Result<&str> {
        required(self.discord_token.as_deref(), "Discord bot token", DISCORD_TOKEN_ENV)
    }

    pub fn openweather_api_key(&self) -> Result<&str> {
        required(self.openweather_api_key.as_deref(), "OpenWeather API key", OPENWEATHER_API_KEY_ENV)
    }

    pub fn locale(&self) -> Locale {
        self.language.unwrap_or_default()
    }
}

fn required<'a>(value: Option<&'a str>, what: &str, env: &str) -> Result<&'a str> {
    value.filter(|v| !v.trim().is_empty()).ok_or_else(|| {
        anyhow!(
            "No {what} configured.\n\
             Hint: set {env} or run `forecast-bot configure`."
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn missing_secrets_have_hints() {
        let cfg = Config::default();

        let err = cfg.discord_token().unwrap_err().to_string();
        assert!(err.contains("No Discord bot token configured"));
        assert!(err.contains("DISCORD_TOKEN"));

        let err = cfg.openweather_api_key().unwrap_err().to_string();
        assert!(err.contains("OPENWEATHER_API_KEY"));
        assert!(err.contains("forecast-bot configure"));
    }

    #[test]
    fn blank_secret_counts_as_missing() {
        let cfg = Config { discord_token: Some("   ".into()), ..Config::default() };
        assert!(cfg.discord_token().is_err());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config {
            discord_token: Some("FILE_TOKEN".into()),
            openweather_api_key: Some("FILE_KEY".into()),
            language: Some(Locale::De),
            openweather_base_url: None,
        };

        cfg.apply_env_with(env(&[
            ("DISCORD_TOKEN", "ENV_TOKEN"),
            ("OPENWEATHER_API_KEY", ""),
            ("FORECAST_LANGUAGE", "en"),
        ]))
        .unwrap();

        assert_eq!(cfg.discord_token().unwrap(), "ENV_TOKEN");
        // Empty variables do not clear file values.
        assert_eq!(cfg.openweather_api_key().unwrap(), "FILE_KEY");
        assert_eq!(cfg.locale(), Locale::En);
    }

    #[test]
    fn invalid_language_env_is_an_error() {
        let mut cfg = Config::default();
        let err = cfg.apply_env_with(env(&[("FORECAST_LANGUAGE", "klingon")])).unwrap_err();
        assert!(err.to_string().contains("FORECAST_LANGUAGE"));
    }

    #[test]
    fn locale_defaults_to_german() {
        assert_eq!(Config::default().locale(), Locale::De);
    }

    #[test]
    fn missing_file_loads_default() {
        let dir = TempDir::new().unwrap();
        let cfg = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config {
            discord_token: Some("TOKEN".into()),
            openweather_api_key: Some("KEY".into()),
            language: Some(Locale::En),
            openweather_base_url: None,
        };
        cfg.save_to(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("language = \"en\""));

        assert_eq!(Config::load_from(&path).unwrap(), cfg);
    }

    #[test]
    fn unparsable_file_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "discord_token = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
