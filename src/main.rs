use actix_cors::Cors;
use actix_web::{http::header, middleware::NormalizePath, web, App, HttpServer};
use anyhow::Context;
use portfolio_contact::{
    graceful_shutdown::shutdown_signal,
    routes::configure_routes,
    settings::AppConfig,
    telemetry::init_tracing,
    AppState,
};
use tracing_actix_web::TracingLogger;

fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|o| o == "*") {
        cors.allow_any_origin()
    } else {
        origins.iter().fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(&config);
    tracing::info!("Loaded configuration: {:?}", config);

    let app_state = web::Data::new(
        AppState::new(&config).context("Failed to build application state")?
    );

    let server_addr = format!("{}:{}", config.host, config.port);
    let origins = config.cors_origins();

    tracing::info!(
        "🚀 Starting Portfolio contact API v{} on {}",
        env!("CARGO_PKG_VERSION"),
        server_addr
    );

    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(build_cors(&origins))
            .wrap(NormalizePath::trim())
            .wrap(TracingLogger::default())
            .configure(configure_routes)
    })
    .workers(config.worker_count)
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run();

    let handle = server.handle();

    tokio::select! {
        res = server => res.context("HTTP server error")?,
        _ = shutdown_signal() => handle.stop(true).await,
    }

    Ok(())
}
