use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use transit_server::catalogue::Catalogue;
use transit_server::config::ServerConfig;
use transit_server::query::QueryService;
use transit_server::web::{AppState, create_router};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transit_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        error!("{e}");
        std::process::exit(2);
    });

    // Load the catalogue (fail fast if a configured dataset is unusable)
    let catalogue = match &config.catalogue_path {
        Some(path) => Catalogue::from_file(path),
        None => Catalogue::chennai(),
    }
    .unwrap_or_else(|e| {
        error!("failed to load catalogue: {e}");
        std::process::exit(1);
    });

    info!(
        routes = catalogue.routes().len(),
        stops = catalogue.stops().len(),
        areas = catalogue.all_areas().len(),
        "catalogue ready"
    );

    let service = QueryService::new(catalogue, &config.cache);
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .unwrap_or_else(|e| {
            error!(addr = %config.addr, "failed to bind: {e}");
            std::process::exit(1);
        });

    info!("Transit query engine listening on http://{}", config.addr);
    info!("  GET  /api/search?q=              - Search routes, areas and stops");
    info!("  GET  /api/routes/between?from=&to= - Routes connecting two places");
    info!("  GET  /api/timings?stop=          - Live arrivals at a stop");
    info!("  GET  /api/fare?from=&to=         - Fare between two stops");
    info!("  POST /api/query                  - Tagged query request");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server error: {e}");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {e}");
    }
    info!("shutting down");
}
