// Authentication handlers: login page (request phase) and failure endpoint
use crate::telegram::TelegramConfig;
use crate::utils::{LoggingHelper, ResponseBuilder};
use crate::validation::FailureReason;
use actix_web::{web, HttpResponse, Result};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct FailureQuery {
    pub message: Option<String>,
    pub strategy: Option<String>,
}

/// Request phase: serve the page embedding the login widget
///
/// # Errors
/// Never fails; the page is rendered from startup configuration
pub async fn telegram_sign_in(config: web::Data<TelegramConfig>) -> Result<HttpResponse> {
    LoggingHelper::log_login_page(
        &config.credential.bot_name,
        &config.callback_url,
        config.widget.request_access,
    );
    Ok(ResponseBuilder::html(config.login_page()))
}

/// Failure endpoint that rejected callbacks are redirected to
///
/// # Errors
/// Never fails; unknown messages are reported as-is
pub async fn auth_failure(query: web::Query<FailureQuery>) -> Result<HttpResponse> {
    let code = query.message.as_deref().unwrap_or("unknown_error");
    let description = FailureReason::from_code(code)
        .map_or("The login attempt failed", FailureReason::description);
    let strategy = query.strategy.as_deref().unwrap_or("telegram");

    Ok(ResponseBuilder::login_failed(code, description, strategy))
}
