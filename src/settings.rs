use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::models::{BotSecret, Credential};

/// Default page title rendered during the request phase
pub const DEFAULT_REQUEST_PHASE_TITLE: &str = "Telegram Login";

/// Default location of the provider's widget script
pub const DEFAULT_BUTTON_SCRIPT_URL: &str = "https://telegram.org/js/telegram-widget.js?22";

/// Default freshness window: one day
pub const DEFAULT_AUTH_DATE_LIMIT: u64 = 86_400;

/// Errors raised while loading or interpreting settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: basic_toml::Error,
    },
    #[error("missing credential: {0} is not configured")]
    MissingCredential(&'static str),
    #[error("failed to initialize logger: {0}")]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelegauthSettings {
    pub application: ApplicationSettings,
    pub telegram: TelegramSettings,
    pub widget: WidgetOverrides,
    /// Arbitrary widget display options, rendered as `data-*` attributes
    pub button: BTreeMap<String, String>,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub redirect_base_url: String,
}

#[derive(Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TelegramSettings {
    pub bot_name: Option<String>,
    pub bot_secret: Option<String>,
    /// Environment variable holding the secret, checked before `bot_secret`
    pub bot_secret_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

/// Resolved, read-only configuration shared by the request and callback phases
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSettings {
    pub request_phase_title: String,
    pub request_access: bool,
    pub button_script_url: String,
    /// Maximum accepted age of `auth_date`, in seconds
    pub auth_date_limit: u64,
}

/// Partial overrides applied field by field on top of [`WidgetSettings::default`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct WidgetOverrides {
    pub request_phase_title: Option<String>,
    pub request_access: Option<bool>,
    pub button_script_url: Option<String>,
    pub auth_date_limit: Option<u64>,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            redirect_base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            request_phase_title: DEFAULT_REQUEST_PHASE_TITLE.to_string(),
            request_access: false,
            button_script_url: DEFAULT_BUTTON_SCRIPT_URL.to_string(),
            auth_date_limit: DEFAULT_AUTH_DATE_LIMIT,
        }
    }
}

impl fmt::Debug for TelegramSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramSettings")
            .field("bot_name", &self.bot_name)
            .field("bot_secret", &self.bot_secret.as_ref().map(|_| "<REDACTED>"))
            .field("bot_secret_env", &self.bot_secret_env)
            .finish()
    }
}

impl WidgetSettings {
    /// Merge `overrides` onto the defaults
    #[must_use]
    pub fn resolve(overrides: &WidgetOverrides) -> Self {
        Self::default().with_overrides(overrides)
    }

    /// Apply `overrides` on top of `self`; unset fields keep their current value
    #[must_use]
    pub fn with_overrides(self, overrides: &WidgetOverrides) -> Self {
        Self {
            request_phase_title: overrides
                .request_phase_title
                .clone()
                .unwrap_or(self.request_phase_title),
            request_access: overrides.request_access.unwrap_or(self.request_access),
            button_script_url: overrides
                .button_script_url
                .clone()
                .unwrap_or(self.button_script_url),
            auth_date_limit: overrides.auth_date_limit.unwrap_or(self.auth_date_limit),
        }
    }
}

impl TelegauthSettings {
    /// Load settings from configuration files and environment variables,
    /// then initialize the logger with the resolved level
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Settings file cannot be read or parsed
    /// - Logger initialization fails
    pub fn load() -> Result<Self, SettingsError> {
        let (settings, source) = Self::load_layers()?;

        Self::logger_builder(&settings.logging.level).try_init()?;
        match source {
            Some(path) => log::info!("Loaded settings from {}", path.display()),
            None => log::info!("No Settings.toml found, using defaults and environment"),
        }

        Ok(settings)
    }

    /// Resolve every configuration layer without touching the logger
    ///
    /// Returns the settings file that was used, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed
    pub fn load_layers() -> Result<(Self, Option<PathBuf>), SettingsError> {
        Self::load_env_file();

        let source = Self::settings_path();
        let mut settings = match &source {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Self::apply_env_overrides(&mut settings);

        Ok((settings, source))
    }

    /// Logger honoring `RUST_LOG`, falling back to the configured level
    #[must_use]
    pub fn logger_builder(level: &str) -> env_logger::Builder {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
    }

    /// Settings file to load, highest priority first:
    /// 1. Settings.toml in `TELEGAUTH_SECRETS_DIR` (if specified and exists)
    /// 2. Settings.toml in current directory (if exists)
    fn settings_path() -> Option<PathBuf> {
        if let Ok(secrets_dir) = std::env::var("TELEGAUTH_SECRETS_DIR") {
            let secrets_path = Path::new(&secrets_dir).join("Settings.toml");
            if secrets_path.exists() {
                return Some(secrets_path);
            }
        }

        let default_config_path = PathBuf::from("Settings.toml");
        default_config_path.exists().then_some(default_config_path)
    }

    /// Parse a single TOML settings file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        basic_toml::from_str(&content).map_err(|source| SettingsError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment variable overrides to settings
    pub fn apply_env_overrides(settings: &mut Self) {
        Self::apply_application_env_overrides(&mut settings.application);
        Self::apply_telegram_env_overrides(&mut settings.telegram);
        Self::apply_widget_env_overrides(&mut settings.widget);
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            settings.logging.level = log_level;
        }
    }

    fn apply_application_env_overrides(app_settings: &mut ApplicationSettings) {
        if let Ok(host) = std::env::var("HOST") {
            app_settings.host = host;
        }
        if let Some(port) = Self::parsed_env::<u16>("PORT") {
            app_settings.port = port;
        }
        if let Ok(redirect_base_url) = std::env::var("REDIRECT_BASE_URL") {
            app_settings.redirect_base_url = redirect_base_url;
        }
    }

    fn apply_telegram_env_overrides(telegram: &mut TelegramSettings) {
        if let Some(bot_name) = Self::non_empty_env("TELEGRAM_BOT_NAME") {
            telegram.bot_name = Some(bot_name);
        }
        if let Some(secret) = Self::non_empty_env("TELEGRAM_BOT_SECRET") {
            telegram.bot_secret = Some(secret);
        }
    }

    /// Apply environment overrides for the widget settings
    pub fn apply_widget_env_overrides(widget: &mut WidgetOverrides) {
        if let Ok(title) = std::env::var("REQUEST_PHASE_TITLE") {
            widget.request_phase_title = Some(title);
        }
        if let Some(request_access) = Self::parsed_env::<bool>("REQUEST_ACCESS") {
            widget.request_access = Some(request_access);
        }
        if let Ok(url) = std::env::var("BUTTON_SCRIPT_URL") {
            widget.button_script_url = Some(url);
        }
        if let Some(limit) = Self::parsed_env::<u64>("AUTH_DATE_LIMIT") {
            widget.auth_date_limit = Some(limit);
        }
    }

    /// Read and parse an environment variable, ignoring values that fail to parse
    fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
        std::env::var(name).ok().and_then(|value| value.parse().ok())
    }

    fn non_empty_env(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|value| !value.is_empty())
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }

    /// Get the bind address for the server
    #[must_use]
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.application.host, self.application.port)
    }

    /// URL the provider redirects back to after the user approves the login
    #[must_use]
    pub fn callback_url(&self) -> String {
        format!(
            "{}/auth/telegram/callback",
            self.application.redirect_base_url.trim_end_matches('/')
        )
    }

    /// Widget settings with this configuration's overrides applied
    #[must_use]
    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings::resolve(&self.widget)
    }

    /// Bot name and secret used for both phases
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingCredential`] if either value is absent or empty
    pub fn credential(&self) -> Result<Credential, SettingsError> {
        let bot_name = self
            .telegram
            .bot_name
            .clone()
            .filter(|name| !name.is_empty())
            .ok_or(SettingsError::MissingCredential("telegram.bot_name"))?;
        let secret = self
            .telegram
            .get_bot_secret()
            .ok_or(SettingsError::MissingCredential("telegram.bot_secret"))?;

        Ok(Credential {
            bot_name,
            secret: BotSecret::new(secret),
        })
    }
}

impl TelegramSettings {
    /// Get the bot secret, checking the configured environment variable first
    #[must_use]
    pub fn get_bot_secret(&self) -> Option<String> {
        if let Some(env_var) = &self.bot_secret_env {
            if let Ok(value) = std::env::var(env_var) {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        self.bot_secret.clone().filter(|secret| !secret.is_empty())
    }
}
