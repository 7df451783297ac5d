use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;

use paycrypt_admin_core::init_admin_core;
use paycrypt_dashboard::api;
use paycrypt_dashboard::app::state::AppState;
use paycrypt_dashboard::infrastructure::config::Config;
use paycrypt_dashboard::infrastructure::logger::{LogConfig, Logger};

fn cors(config: &Config) -> Cors {
    if config.allows_any_origin() {
        return Cors::permissive();
    }
    config
        .cors_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::new().context("Configuration initialization failed")?;

    Logger::init(&LogConfig::from(&config));
    log::info!("🚀 Starting Paycrypt admin dashboard...");

    let admin = init_admin_core().await.context("Admin core initialization failed")?;
    log::info!(
        "✅ Admin core ready: {} chains, selected {}",
        admin.registry.len(),
        admin.coordinator.current_key()
    );
    for chain in admin.registry.iter() {
        log::info!("🔗 {} ({}): contract {}", chain.display_name, chain.numeric_id, chain.contract_address);
    }

    let state = web::Data::new(AppState::new(admin));
    let observer = state.admin.start_wallet_observer();
    log::info!("✅ Wallet observer started");

    log::info!("🌐 Listening on port {}", config.port);
    log::info!("📊 Environment: {}", config.environment);

    let server_config = config.clone();
    let server_state = state.clone();
    let result = HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(actix_web::middleware::Compress::default())
            .wrap(cors(&server_config))
            .app_data(server_state.clone())
            .configure(api::configure)
    })
    .bind(("0.0.0.0", config.port))
    .with_context(|| format!("Could not bind port {}", config.port))?
    .run()
    .await;

    observer.abort();
    log::info!("👋 Dashboard stopped");
    result.context("Server error")
}
