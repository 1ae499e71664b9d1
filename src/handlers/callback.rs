// Login callback handler
use crate::models::{AuthHash, CallbackParameters};
use crate::telegram::TelegramConfig;
use crate::utils::{LoggingHelper, ResponseBuilder};
use actix_web::{web, HttpRequest, HttpResponse, Result};
use std::collections::BTreeMap;

type RawParams = BTreeMap<String, String>;

/// Callback phase: verify the provider's redirect and return the auth hash
///
/// Parameters come from the form body on POST and the query string otherwise.
/// Rejected callbacks are redirected to the failure endpoint with the reason code.
///
/// # Errors
/// Never fails; validation failures become redirects
pub async fn telegram_callback(
    req: HttpRequest,
    query: web::Query<RawParams>,
    form: Option<web::Form<RawParams>>,
    config: web::Data<TelegramConfig>,
) -> Result<HttpResponse> {
    let params = extract_callback_params(query, form);
    LoggingHelper::log_callback_received(req.method().as_str(), &params.keys());

    match config.authenticate(params) {
        Ok(identity) => {
            LoggingHelper::log_identity_verified(&identity.uid, identity.username.as_deref());
            Ok(HttpResponse::Ok().json(AuthHash::from(identity)))
        }
        Err(reason) => {
            LoggingHelper::log_callback_rejected(reason);
            Ok(ResponseBuilder::failure_redirect(reason))
        }
    }
}

/// Extract callback data from either the form submission or the query string
fn extract_callback_params(
    query: web::Query<RawParams>,
    form: Option<web::Form<RawParams>>,
) -> CallbackParameters {
    match form {
        Some(form) if !form.is_empty() => CallbackParameters::new(form.into_inner()),
        _ => CallbackParameters::new(query.into_inner()),
    }
}
