//! Callback validation
//!
//! A callback is accepted only after three checks, run in order and stopping
//! at the first failure: required fields present, signature valid, `auth_date`
//! within the freshness window.

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::models::{BotSecret, CallbackParameters};
use crate::settings::WidgetSettings;

use super::signature::SignatureVerifier;

/// Fields every callback must carry with a non-empty value, in check order
pub const REQUIRED_FIELDS: [&str; 5] = ["id", "first_name", "last_name", "auth_date", "hash"];

/// Why a callback was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    MissingRequiredField,
    SignatureMismatch,
    SessionExpired,
}

impl FailureReason {
    /// Stable code surfaced to the hosting layer
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "missing_required_field",
            Self::SignatureMismatch => "signature_mismatch",
            Self::SessionExpired => "session_expired",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::MissingRequiredField => "The login callback is missing a required field",
            Self::SignatureMismatch => "The login callback signature is invalid",
            Self::SessionExpired => "The login callback is too old, please sign in again",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "missing_required_field" => Some(Self::MissingRequiredField),
            "signature_mismatch" => Some(Self::SignatureMismatch),
            "session_expired" => Some(Self::SessionExpired),
            _ => None,
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Terminal result of validating one callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    Valid,
    Invalid(FailureReason),
}

impl ValidationOutcome {
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }

    #[must_use]
    pub const fn reason(self) -> Option<FailureReason> {
        match self {
            Self::Valid => None,
            Self::Invalid(reason) => Some(reason),
        }
    }
}

/// Errors from interpreting `auth_date` as a Unix timestamp
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthDateError {
    #[error("auth_date is empty")]
    Empty,
    #[error("auth_date {0:?} is not an integer")]
    NotNumeric(String),
    #[error("auth_date {0} is outside the representable range")]
    OutOfRange(i64),
}

/// Parse a Unix timestamp in seconds, as sent in `auth_date`
///
/// # Errors
///
/// Returns an error if the value is empty, not a base-10 integer, or not a
/// representable instant.
pub fn parse_auth_date(raw: &str) -> Result<DateTime<Utc>, AuthDateError> {
    if raw.is_empty() {
        return Err(AuthDateError::Empty);
    }
    let seconds: i64 = raw
        .parse()
        .map_err(|_| AuthDateError::NotNumeric(raw.to_string()))?;
    DateTime::from_timestamp(seconds, 0).ok_or(AuthDateError::OutOfRange(seconds))
}

/// Whether `key` is present with a non-empty value; absent and empty are equivalent
#[must_use]
pub fn is_present(params: &CallbackParameters, key: &str) -> bool {
    params.present(key).is_some()
}

/// Parameters that passed every check, together with the parsed `auth_date`
///
/// Only [`RequestValidator`] constructs this type.
#[derive(Debug, Clone)]
pub struct ValidatedCallback {
    params: CallbackParameters,
    auth_date: DateTime<Utc>,
}

impl ValidatedCallback {
    #[must_use]
    pub fn params(&self) -> &CallbackParameters {
        &self.params
    }

    #[must_use]
    pub fn auth_date(&self) -> DateTime<Utc> {
        self.auth_date
    }
}

/// Runs the field, signature and freshness checks over a callback
pub struct RequestValidator;

impl RequestValidator {
    /// Validate against the current time
    #[must_use]
    pub fn validate(
        params: &CallbackParameters,
        secret: &BotSecret,
        settings: &WidgetSettings,
    ) -> ValidationOutcome {
        Self::validate_at(params, secret, settings, Utc::now())
    }

    /// Validate as if the current time were `now`
    #[must_use]
    pub fn validate_at(
        params: &CallbackParameters,
        secret: &BotSecret,
        settings: &WidgetSettings,
        now: DateTime<Utc>,
    ) -> ValidationOutcome {
        match Self::verify_at(params.clone(), secret, settings, now) {
            Ok(_) => ValidationOutcome::Valid,
            Err(reason) => ValidationOutcome::Invalid(reason),
        }
    }

    /// Validate against the current time and keep the parameters on success
    ///
    /// # Errors
    ///
    /// Returns the first [`FailureReason`] encountered.
    pub fn verify(
        params: CallbackParameters,
        secret: &BotSecret,
        settings: &WidgetSettings,
    ) -> Result<ValidatedCallback, FailureReason> {
        Self::verify_at(params, secret, settings, Utc::now())
    }

    /// Validate as if the current time were `now` and keep the parameters on success
    ///
    /// # Errors
    ///
    /// Returns the first [`FailureReason`] encountered.
    pub fn verify_at(
        params: CallbackParameters,
        secret: &BotSecret,
        settings: &WidgetSettings,
        now: DateTime<Utc>,
    ) -> Result<ValidatedCallback, FailureReason> {
        debug!("Validating login callback with keys {:?}", params.keys());

        Self::check_required_fields(&params)?;

        if !SignatureVerifier::verify(secret, &params) {
            warn!("Login callback signature does not match");
            return Err(FailureReason::SignatureMismatch);
        }

        let auth_date = Self::check_freshness(&params, settings.auth_date_limit, now)?;

        Ok(ValidatedCallback { params, auth_date })
    }

    fn check_required_fields(params: &CallbackParameters) -> Result<(), FailureReason> {
        match REQUIRED_FIELDS.iter().find(|field| !is_present(params, field)) {
            Some(field) => {
                warn!("Login callback is missing required field: {field}");
                Err(FailureReason::MissingRequiredField)
            }
            None => Ok(()),
        }
    }

    /// Reject callbacks older than `limit` seconds
    ///
    /// An `auth_date` in the future yields a negative age and is accepted. An
    /// unparsable `auth_date` can never be shown fresh and is rejected as expired.
    fn check_freshness(
        params: &CallbackParameters,
        limit: u64,
        now: DateTime<Utc>,
    ) -> Result<DateTime<Utc>, FailureReason> {
        let raw = params.get("auth_date").unwrap_or_default();
        let auth_date = parse_auth_date(raw).map_err(|e| {
            warn!("Rejecting login callback: {e}");
            FailureReason::SessionExpired
        })?;

        let age = now.signed_duration_since(auth_date).num_seconds();
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        if age > limit {
            warn!("Login callback expired: issued {age}s ago, limit is {limit}s");
            return Err(FailureReason::SessionExpired);
        }

        Ok(auth_date)
    }
}
