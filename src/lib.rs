#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the telegauth application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod handlers;
pub mod models;
pub mod settings;
pub mod telegram;
pub mod utils;
pub mod validation;
pub mod widget;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use handlers::{auth_failure, configure_services, health, telegram_callback, telegram_sign_in};
pub use models::{BotSecret, CallbackParameters, Credential, IdentityRecord};
pub use settings::{TelegauthSettings, WidgetOverrides, WidgetSettings};
pub use telegram::TelegramConfig;
pub use validation::{
    FailureReason, IdentityExtractor, RequestValidator, SignatureVerifier, ValidationOutcome,
};
pub use widget::WidgetRenderer;
