// Centralized logging for the login flow
use actix_web::middleware::Logger;
use log::{debug, info, warn};

use crate::validation::FailureReason;

/// Access log format; `%U` is the path only, callback query strings carry the signed login data
pub const ACCESS_LOG_FORMAT: &str = r#"%a "%m %U" %s %b %T"#;

pub struct LoggingHelper;

impl LoggingHelper {
    /// Request logging middleware that never records query strings
    #[must_use]
    pub fn access_logger() -> Logger {
        Logger::new(ACCESS_LOG_FORMAT)
    }

    /// Log a served login page
    pub fn log_login_page(bot_name: &str, callback_url: &str, request_access: bool) {
        info!(
            "Serving login widget for bot {bot_name} (callback: {callback_url}, request_access: {request_access})"
        );
    }

    /// Log callback arrival without any parameter values
    pub fn log_callback_received(method: &str, keys: &[&str]) {
        debug!("Login callback received via {method} with keys {keys:?}");
    }

    /// Log a rejected callback
    pub fn log_callback_rejected(reason: FailureReason) {
        warn!("Login callback rejected: {}", reason.code());
    }

    /// Log a verified identity
    pub fn log_identity_verified(uid: &str, username: Option<&str>) {
        info!(
            "Verified Telegram login for uid {uid} (username: {})",
            username.unwrap_or("none")
        );
    }

    /// Log startup configuration, never including the secret
    pub fn log_startup(bind_address: &str, bot_name: &str, auth_date_limit: u64) {
        info!("Starting telegauth on http://{bind_address}");
        info!("Bot: {bot_name}, auth_date_limit: {auth_date_limit}s");
    }
}
