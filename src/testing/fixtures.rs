//! Test fixtures providing pre-built test objects
//!
//! Callback fixtures are signed with [`TEST_BOT_SECRET`] the same way the
//! provider signs real callbacks.

use chrono::{Duration, Utc};
use std::collections::BTreeMap;

use crate::models::{BotSecret, CallbackParameters};
use crate::settings::TelegauthSettings;
use crate::telegram::TelegramConfig;
use crate::validation::{SignatureVerifier, HASH_FIELD};

use super::constants::{
    TEST_BOT_NAME, TEST_BOT_SECRET, TEST_FIRST_NAME, TEST_LAST_NAME, TEST_REDIRECT_BASE_URL,
    TEST_USER_ID, TEST_USERNAME,
};

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Standard test settings with a configured bot
    #[must_use]
    pub fn settings() -> TelegauthSettings {
        let mut settings = TelegauthSettings::default();
        settings.application.redirect_base_url = TEST_REDIRECT_BASE_URL.to_string();
        settings.telegram.bot_name = Some(TEST_BOT_NAME.to_string());
        settings.telegram.bot_secret = Some(TEST_BOT_SECRET.to_string());
        settings
    }

    /// Strategy configuration built from [`Self::settings`]
    ///
    /// # Panics
    ///
    /// Panics if the fixture settings lose their credential.
    #[must_use]
    pub fn telegram_config() -> TelegramConfig {
        TelegramConfig::from_settings(&Self::settings())
            .unwrap_or_else(|e| panic!("fixture settings are incomplete: {e}"))
    }

    #[must_use]
    pub fn secret() -> BotSecret {
        BotSecret::new(TEST_BOT_SECRET)
    }

    /// Unsigned callback fields for the test user, issued `age` ago
    #[must_use]
    pub fn unsigned_params(age: Duration) -> CallbackParameters {
        let auth_date = (Utc::now() - age).timestamp();
        [
            ("id", TEST_USER_ID.to_string()),
            ("first_name", TEST_FIRST_NAME.to_string()),
            ("last_name", TEST_LAST_NAME.to_string()),
            ("username", TEST_USERNAME.to_string()),
            ("auth_date", auth_date.to_string()),
        ]
        .into_iter()
        .collect()
    }

    /// A freshly issued, correctly signed callback
    #[must_use]
    pub fn signed_params() -> CallbackParameters {
        Self::sign(Self::unsigned_params(Duration::seconds(5)))
    }

    /// A correctly signed callback issued `age` ago
    #[must_use]
    pub fn signed_params_with_age(age: Duration) -> CallbackParameters {
        Self::sign(Self::unsigned_params(age))
    }

    /// Add a `hash` computed with [`TEST_BOT_SECRET`]
    #[must_use]
    pub fn sign(params: CallbackParameters) -> CallbackParameters {
        Self::sign_with(params, &Self::secret())
    }

    /// Add a `hash` computed with `secret`
    ///
    /// # Panics
    ///
    /// Panics if the MAC rejects the derived key, which HMAC never does.
    #[must_use]
    pub fn sign_with(mut params: CallbackParameters, secret: &BotSecret) -> CallbackParameters {
        let hash = SignatureVerifier::compute(secret, &params)
            .unwrap_or_else(|| panic!("HMAC rejected the derived key"));
        params.insert(HASH_FIELD, hash);
        params
    }

    /// Parameters as an ordered string map, for building query strings and forms
    #[must_use]
    pub fn as_map(params: &CallbackParameters) -> BTreeMap<String, String> {
        params
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// URL-encoded `key=value&...` string for a callback
    #[must_use]
    pub fn query_string(params: &CallbackParameters) -> String {
        params
            .iter()
            .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}
