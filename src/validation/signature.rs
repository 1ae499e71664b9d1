//! Callback signature computation
//!
//! The provider signs every callback with HMAC-SHA256. The signed message is the
//! "data check string": every received `key=value` pair except `hash`, sorted
//! bytewise and joined with `\n`. The HMAC key is `SHA-256(bot_secret)`.

use log::debug;

use crate::models::{BotSecret, CallbackParameters};
use crate::utils::crypto::{constant_time_eq, derive_signing_key, hmac_sha256_hex};

/// Parameter carrying the provider's signature
pub const HASH_FIELD: &str = "hash";

/// Verifies callback signatures against the bot secret
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Build the canonical string the provider signs
    ///
    /// Values are used exactly as received. Sorting is over the full
    /// `key=value` strings, not just the keys.
    #[must_use]
    pub fn data_check_string(params: &CallbackParameters) -> String {
        let mut pairs: Vec<String> = params
            .iter()
            .filter(|(key, _)| *key != HASH_FIELD)
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        pairs.sort_unstable();
        pairs.join("\n")
    }

    /// Expected lowercase hex signature for `params` under `secret`
    #[must_use]
    pub fn compute(secret: &BotSecret, params: &CallbackParameters) -> Option<String> {
        let key = derive_signing_key(secret.expose().as_bytes());
        hmac_sha256_hex(&key, Self::data_check_string(params).as_bytes())
    }

    /// Whether the received `hash` matches the expected signature
    ///
    /// An absent `hash` never verifies. The comparison is constant time.
    #[must_use]
    pub fn verify(secret: &BotSecret, params: &CallbackParameters) -> bool {
        let Some(received) = params.get(HASH_FIELD) else {
            debug!("Callback carries no hash parameter");
            return false;
        };
        let Some(expected) = Self::compute(secret, params) else {
            return false;
        };

        constant_time_eq(expected.as_bytes(), received.as_bytes())
    }
}
