//! Configuration loading for the backend.
//!
//! Settings are merged with figment, lowest precedence first:
//! 1. Built-in defaults
//! 2. TOML file (`fundraiser.toml`, or the path in `FUNDRAISER_CONFIG`)
//! 3. `.env` file in the working directory (or the path in `FUNDRAISER_ENV_FILE`)
//! 4. Environment variables (`HOST`, `PORT`, `STORE_URL`, `DB_NAME`,
//!    `ADMIN_PASSWORD`, `CORS_ORIGINS`)

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    value::{Dict, Value},
    Figment,
};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::store::IN_MEMORY;

/// Default configuration file, looked up in the working directory.
const CONFIG_FILE_NAME: &str = "fundraiser.toml";

/// Environment variable that overrides the configuration file path.
const CONFIG_PATH_ENV: &str = "FUNDRAISER_CONFIG";

/// Default dotenv file, looked up in the working directory.
const ENV_FILE_NAME: &str = ".env";

/// Environment variable that overrides the dotenv file path.
const ENV_FILE_PATH_ENV: &str = "FUNDRAISER_ENV_FILE";

/// Environment variables recognised as settings.
const ENV_KEYS: [&str; 6] = [
    "host",
    "port",
    "store_url",
    "db_name",
    "admin_password",
    "cors_origins",
];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Directory holding the store database, or `:memory:`.
    pub store_url: String,
    /// Name of the store database inside `store_url`.
    pub db_name: String,
    /// Shared secret required to update the fundraising record.
    #[serde(deserialize_with = "secret_from_env")]
    pub admin_password: Option<String>,
    /// Comma-separated list of allowed CORS origins; `*` allows any.
    pub cors_origins: String,
}

/// Environment values that look numeric arrive as numbers; the secret is
/// always text.
fn secret_from_env<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(text) => text,
        Raw::Integer(n) => n.to_string(),
        Raw::Float(f) => f.to_string(),
    }))
}

/// Reads the recognised settings from a dotenv file without touching the
/// process environment. A missing file yields no values.
fn dotenv_values(path: &Path) -> Result<Dict, ConfigError> {
    let mut values = Dict::new();
    if !path.is_file() {
        return Ok(values);
    }

    let invalid = |e: dotenvy::Error| {
        ConfigError::Invalid(format!("cannot read {}: {}", path.display(), e))
    };
    for item in dotenvy::from_path_iter(path).map_err(invalid)? {
        let (key, value) = item.map_err(invalid)?;
        let key = key.to_ascii_lowercase();
        if ENV_KEYS.contains(&key.as_str()) {
            // Parsed like figment's `Env` provider so `PORT=8001` is a number.
            let value = value
                .parse::<Value>()
                .unwrap_or_else(|_| Value::from(value.as_str()));
            values.insert(key, value);
        }
    }
    Ok(values)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8001,
            store_url: ".".to_string(),
            db_name: "fundraiser".to_string(),
            admin_password: None,
            cors_origins: "*".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the config file, the dotenv file and the process
    /// environment.
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        let env_file = std::env::var_os(ENV_FILE_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(ENV_FILE_NAME));

        Self::from_figment(&Self::figment(&config_file, &env_file)?)
    }

    /// Assembles every settings source. Process variables win over the dotenv
    /// file, which wins over the TOML file.
    pub fn figment(config_file: &Path, env_file: &Path) -> Result<Figment, ConfigError> {
        Ok(Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(config_file))
            .merge(Serialized::defaults(dotenv_values(env_file)?))
            .merge(Env::raw().only(&ENV_KEYS)))
    }

    /// Extract and validate settings from an already assembled figment.
    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        let mut settings: Settings = figment.extract()?;
        // An empty secret would let an empty password through.
        if settings
            .admin_password
            .as_deref()
            .is_some_and(|p| p.is_empty())
        {
            settings.admin_password = None;
        }
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.db_name.trim().is_empty() {
            return Err(ConfigError::Invalid("DB_NAME must not be empty".into()));
        }
        if self.store_url.contains("://") {
            return Err(ConfigError::Invalid(format!(
                "STORE_URL must be a directory or {}, not a URL: {}",
                IN_MEMORY, self.store_url
            )));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("PORT must not be 0".into()));
        }
        Ok(())
    }

    /// The configured CORS origins, trimmed, with empty entries dropped.
    pub fn allowed_origins(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figment_with(values: &[(&str, &str)]) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()));
        for (key, value) in values {
            figment = figment.merge(Serialized::default(key, value));
        }
        figment
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_figment(&figment_with(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.allowed_origins(), vec!["*".to_string()]);
        assert!(settings.admin_password.is_none());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_figment(&figment_with(&[
            ("db_name", "campaign"),
            ("admin_password", "admin123"),
            ("cors_origins", "https://a.example, https://b.example,"),
        ]))
        .unwrap();
        assert_eq!(settings.db_name, "campaign");
        assert_eq!(settings.admin_password.as_deref(), Some("admin123"));
        assert_eq!(
            settings.allowed_origins(),
            vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_admin_password_is_unset() {
        let settings =
            Settings::from_figment(&figment_with(&[("admin_password", "")])).unwrap();
        assert!(settings.admin_password.is_none());
    }

    #[test]
    fn test_numeric_admin_password_is_text() {
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Serialized::default("admin_password", 12345));
        let settings = Settings::from_figment(&figment).unwrap();
        assert_eq!(settings.admin_password.as_deref(), Some("12345"));
    }

    #[test]
    fn test_empty_db_name_rejected() {
        let err = Settings::from_figment(&figment_with(&[("db_name", " ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_url_store_rejected() {
        let err = Settings::from_figment(&figment_with(&[(
            "store_url",
            "mongodb://localhost:27017",
        )]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("mongodb://localhost:27017"));
    }

    #[test]
    fn test_dotenv_file_supplies_settings() {
        let dir = std::env::temp_dir().join(format!("fundraiser-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let env_file = dir.join(".env");
        std::fs::write(
            &env_file,
            "# campaign backend\nDB_NAME=\"campaign_db\"\nPORT=9100\nUNRELATED=ignored\n",
        )
        .unwrap();

        let values = dotenv_values(&env_file).unwrap();
        assert_eq!(values.len(), 2);
        assert!(!values.contains_key("unrelated"));

        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Serialized::defaults(values));
        let settings = Settings::from_figment(&figment).unwrap();
        assert_eq!(settings.db_name, "campaign_db");
        assert_eq!(settings.port, 9100);

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_dotenv_file_sets_admin_password() {
        let dir = std::env::temp_dir().join(format!("fundraiser-config-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let env_file = dir.join(".env");
        std::fs::write(&env_file, "ADMIN_PASSWORD=admin123\n").unwrap();

        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Serialized::defaults(dotenv_values(&env_file).unwrap()));
        let settings = Settings::from_figment(&figment).unwrap();
        assert_eq!(settings.admin_password.as_deref(), Some("admin123"));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_dotenv_file_is_ignored() {
        let missing = std::env::temp_dir().join(format!("no-such-{}.env", uuid::Uuid::new_v4()));
        assert!(dotenv_values(&missing).unwrap().is_empty());
    }

    #[test]
    fn test_bad_port_rejected() {
        let err = Settings::from_figment(&figment_with(&[("port", "not-a-port")])).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
