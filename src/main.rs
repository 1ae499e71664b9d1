#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{web, App, HttpServer};
use telegauth::{
    configure_services, settings::TelegauthSettings, telegram::TelegramConfig,
    utils::LoggingHelper,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = TelegauthSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let telegram_config = TelegramConfig::from_settings(&settings).map_err(|e| {
        std::io::Error::other(format!("Failed to configure Telegram login: {e}"))
    })?;

    start_server(telegram_config, &settings).await
}

/// Start the HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Server binding fails
/// - Server fails to start
async fn start_server(
    telegram_config: TelegramConfig,
    settings: &TelegauthSettings,
) -> std::io::Result<()> {
    let bind_address = settings.get_bind_address();
    LoggingHelper::log_startup(
        &bind_address,
        &telegram_config.credential.bot_name,
        telegram_config.widget.auth_date_limit,
    );
    print_startup_info(&bind_address, &telegram_config);

    let telegram_config = web::Data::new(telegram_config);

    HttpServer::new(move || {
        App::new()
            .app_data(telegram_config.clone())
            .wrap(LoggingHelper::access_logger())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, telegram_config: &TelegramConfig) {
    println!(
        "Starting telegauth {} on http://{bind_address}",
        telegauth::VERSION
    );
    println!();
    println!("Login endpoints:");
    println!("  GET      /auth/telegram          - Login widget page");
    println!("  GET|POST /auth/telegram/callback - Login callback");
    println!("  GET      /auth/failure           - Failure details");
    println!();
    println!("Callback URL (set this domain with @BotFather /setdomain):");
    println!("  {}", telegram_config.callback_url);
    println!();
    println!("System endpoints:");
    println!("  GET  /ping - Health check");
}
