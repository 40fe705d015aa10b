use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use alrehla_api::{
    config::AppConfig,
    routes,
    services::ai_service::{GeminiService, StoryAssistant},
    state::AppState,
    store::catalog::CatalogStore,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    }

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    log::info!("Application starting...");

    let config = AppConfig::from_env();
    if !cfg!(debug_assertions) {
        log::info!("Release mode ({})", config.environment);
    }

    let catalog = CatalogStore::load(config.catalog_path.as_deref(), config.mock_latency)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    let assistant = GeminiService::new(&config.ai);
    if !assistant.is_configured() {
        log::warn!("GEMINI_API_KEY not set; /api/chat and /api/generateStoryIdeas will fail");
    }

    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(config, catalog, Arc::new(assistant)));

    log::info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await
}
