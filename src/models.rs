use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Provider name reported in the auth hash
pub const PROVIDER_NAME: &str = "telegram";

/// Bot token issued by the provider; only ever used as HMAC key material
#[derive(Clone)]
pub struct BotSecret(String);

impl BotSecret {
    #[must_use]
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes for key derivation
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BotSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BotSecret(<REDACTED>)")
    }
}

/// Bot identity embedded in the widget plus the secret used to verify callbacks
#[derive(Debug, Clone)]
pub struct Credential {
    pub bot_name: String,
    pub secret: BotSecret,
}

/// Raw key/value pairs received on the callback, untrusted until validated
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CallbackParameters(BTreeMap<String, String>);

impl CallbackParameters {
    #[must_use]
    pub fn new(params: BTreeMap<String, String>) -> Self {
        Self(params)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Value of `key` when it is present and non-empty
    #[must_use]
    pub fn present(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(String::as_str).collect()
    }
}

impl<K, V> FromIterator<(K, V)> for CallbackParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for CallbackParameters {
    fn from(params: BTreeMap<String, String>) -> Self {
        Self(params)
    }
}

/// Normalized identity produced from a validated callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
    pub uid: String,
    pub display_name: String,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub avatar_url: Option<String>,
    pub issued_at: DateTime<Utc>,
    /// Every received parameter except `hash`
    pub raw_info: BTreeMap<String, String>,
}

/// OmniAuth-style auth hash returned by the callback endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthHash {
    pub provider: String,
    pub uid: String,
    pub info: AuthInfo,
    pub extra: AuthExtra,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthInfo {
    pub name: String,
    pub nickname: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthExtra {
    pub auth_date: String,
    pub raw_info: BTreeMap<String, String>,
}

impl From<IdentityRecord> for AuthHash {
    fn from(record: IdentityRecord) -> Self {
        Self {
            provider: PROVIDER_NAME.to_string(),
            uid: record.uid,
            info: AuthInfo {
                name: record.display_name,
                nickname: record.username,
                first_name: record.first_name,
                last_name: record.last_name,
                image: record.avatar_url,
            },
            extra: AuthExtra {
                auth_date: record
                    .issued_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
                raw_info: record.raw_info,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
