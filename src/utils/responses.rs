//! HTTP response helpers
//!
//! Keeps the shape of redirects and JSON error bodies consistent across the
//! login handlers.

use actix_web::{http::header, HttpResponse};
use serde_json::json;

use crate::models::PROVIDER_NAME;
use crate::validation::FailureReason;

/// Path failures are redirected to
pub const FAILURE_PATH: &str = "/auth/failure";

pub struct ResponseBuilder;

impl ResponseBuilder {
    /// Create a redirect response (302 Found)
    #[must_use]
    pub fn redirect(location: &str) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, location.to_string()))
            .finish()
    }

    /// Location of the failure endpoint for `reason`
    #[must_use]
    pub fn failure_location(reason: FailureReason) -> String {
        format!(
            "{FAILURE_PATH}?message={}&strategy={}",
            urlencoding::encode(reason.code()),
            urlencoding::encode(PROVIDER_NAME)
        )
    }

    /// Redirect a rejected callback to the failure endpoint
    #[must_use]
    pub fn failure_redirect(reason: FailureReason) -> HttpResponse {
        Self::redirect(&Self::failure_location(reason))
    }

    /// `401` JSON body describing a failed login
    #[must_use]
    pub fn login_failed(code: &str, description: &str, strategy: &str) -> HttpResponse {
        HttpResponse::Unauthorized().json(json!({
            "error": code,
            "error_description": description,
            "strategy": strategy,
        }))
    }

    /// HTML page response
    #[must_use]
    pub fn html(body: String) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(crate::widget::CONTENT_TYPE)
            .body(body)
    }
}
