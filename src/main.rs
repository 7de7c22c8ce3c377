use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use dotenv::dotenv;
use std::net::TcpListener;
use todo_api::{routes, AppState, Settings};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = Settings::new().context("failed to load configuration (is JWT_SECRET set?)")?;
    info!("Configuration loaded for environment {}", config.environment);

    let state = AppState::new(config.clone())
        .await
        .context("failed to initialise application state")?;
    let state = web::Data::new(state);

    let address = config.bind_address();
    let workers = config.server.workers as usize;
    let cors_config = config.cors.clone();
    let listener = TcpListener::bind(&address).with_context(|| format!("failed to bind {}", address))?;
    info!("Server running on http://{}", address);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(routes::cors(&cors_config))
            .wrap(routes::security_headers())
            .app_data(state.clone())
            .configure(routes::configure)
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .context("server terminated with an error")?;

    Ok(())
}
