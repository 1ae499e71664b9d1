// HTTP request handlers for the login flow
pub mod auth;
pub mod callback;
pub mod health;

#[cfg(test)]
mod tests;

use actix_web::web;

// Re-export the main handler functions
pub use auth::{auth_failure, telegram_sign_in};
pub use callback::telegram_callback;
pub use health::health;

/// Register every route served by telegauth
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/telegram", web::get().to(telegram_sign_in))
        .route("/auth/telegram/callback", web::get().to(telegram_callback))
        .route("/auth/telegram/callback", web::post().to(telegram_callback))
        .route("/auth/failure", web::get().to(auth_failure))
        .route("/ping", web::get().to(health));
}
