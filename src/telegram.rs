//! Runtime configuration for the Telegram login strategy
//!
//! Resolved once at startup from [`TelegauthSettings`] and shared read-only
//! with every request.

use std::collections::BTreeMap;

use crate::models::{CallbackParameters, Credential, IdentityRecord};
use crate::settings::{SettingsError, TelegauthSettings, WidgetSettings};
use crate::validation::{FailureReason, IdentityExtractor, RequestValidator};
use crate::widget::WidgetRenderer;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub credential: Credential,
    pub widget: WidgetSettings,
    pub button_options: BTreeMap<String, String>,
    pub callback_url: String,
}

impl TelegramConfig {
    /// Build the strategy configuration from loaded settings
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingCredential`] if the bot name or secret is not configured
    pub fn from_settings(settings: &TelegauthSettings) -> Result<Self, SettingsError> {
        Ok(Self {
            credential: settings.credential()?,
            widget: settings.widget_settings(),
            button_options: settings.button.clone(),
            callback_url: settings.callback_url(),
        })
    }

    /// Request phase: the login page body
    #[must_use]
    pub fn login_page(&self) -> String {
        WidgetRenderer::render(
            &self.widget,
            &self.credential.bot_name,
            &self.callback_url,
            &self.button_options,
        )
    }

    /// Callback phase: validate the parameters and extract the identity
    ///
    /// # Errors
    ///
    /// Returns the [`FailureReason`] of the first failed check.
    pub fn authenticate(&self, params: CallbackParameters) -> Result<IdentityRecord, FailureReason> {
        let validated = RequestValidator::verify(params, &self.credential.secret, &self.widget)?;
        Ok(IdentityExtractor::extract(&validated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> TelegauthSettings {
        let mut settings = TelegauthSettings::default();
        settings.telegram.bot_name = Some("example_bot".to_string());
        settings.telegram.bot_secret = Some("BOT_SECRET".to_string());
        settings.application.redirect_base_url = "https://login.example.com".to_string();
        settings
            .button
            .insert("radius".to_string(), "10".to_string());
        settings.widget.request_access = Some(true);
        settings
    }

    #[test]
    fn test_from_settings() {
        let config = TelegramConfig::from_settings(&settings()).unwrap();

        assert_eq!(config.credential.bot_name, "example_bot");
        assert_eq!(
            config.callback_url,
            "https://login.example.com/auth/telegram/callback"
        );
        assert!(config.widget.request_access);
        assert_eq!(config.widget.auth_date_limit, 86_400);
    }

    #[test]
    fn test_from_settings_requires_credential() {
        let mut incomplete = settings();
        incomplete.telegram.bot_secret = None;
        assert!(TelegramConfig::from_settings(&incomplete).is_err());
    }

    #[test]
    fn test_login_page_never_contains_secret() {
        let page = TelegramConfig::from_settings(&settings())
            .unwrap()
            .login_page();

        assert!(page.contains(r#"data-telegram-login="example_bot""#));
        assert!(page.contains(r#"data-radius="10""#));
        assert!(page.contains(r#"data-request-access="write""#));
        assert!(!page.contains("BOT_SECRET"));
    }

    #[test]
    fn test_authenticate_rejects_incomplete_callback() {
        let config = TelegramConfig::from_settings(&settings()).unwrap();
        let params: CallbackParameters = [("id", "1")].into_iter().collect();

        assert_eq!(
            config.authenticate(params),
            Err(FailureReason::MissingRequiredField)
        );
    }
}
