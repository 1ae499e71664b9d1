//! Validation Module
//!
//! Verification pipeline for login widget callbacks.
//!
//! # Modules
//!
//! - [`signature`] - Data check string and HMAC-SHA256 signature verification
//! - [`callback`] - Field, signature and freshness checks producing a [`ValidationOutcome`]
//! - [`identity`] - Mapping a validated callback to an [`IdentityRecord`](crate::models::IdentityRecord)
//!
//! # Usage
//!
//! ```rust
//! use telegauth::models::{BotSecret, CallbackParameters};
//! use telegauth::settings::WidgetSettings;
//! use telegauth::validation::{IdentityExtractor, RequestValidator};
//!
//! let params: CallbackParameters = [("id", "1")].into_iter().collect();
//! let secret = BotSecret::new("123456:bot-token");
//!
//! match RequestValidator::verify(params, &secret, &WidgetSettings::default()) {
//!     Ok(validated) => println!("hello {}", IdentityExtractor::extract(&validated).uid),
//!     Err(reason) => println!("rejected: {reason}"),
//! }
//! ```

pub mod callback;
pub mod identity;
pub mod signature;

pub use callback::{
    is_present, parse_auth_date, AuthDateError, FailureReason, RequestValidator,
    ValidatedCallback, ValidationOutcome, REQUIRED_FIELDS,
};
pub use identity::IdentityExtractor;
pub use signature::{SignatureVerifier, HASH_FIELD};
