use anyhow::{Context, Result};
use leiebarometer::scrapers::{FinnSite, HttpPageSource, PaginatedFetcher};
use leiebarometer::server::{build_app, AppState};
use leiebarometer::{Config, ListingsService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,leiebarometer=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🏠 Leiebarometer - rental yield estimates");

    let config = Config::from_env().context("Failed to load configuration")?;
    info!("Configuration loaded: {:?}", config);

    let site = FinnSite::new(&config.finn_origin)?;
    let source = HttpPageSource::with_config(&config.user_agent, config.request_timeout)?;
    let fetcher = PaginatedFetcher::with_delay(Arc::new(source), config.page_delay);

    let state = AppState {
        service: Arc::new(ListingsService::new(fetcher, site, config.max_listings)),
        default_radius: config.default_radius,
    };
    let app = build_app(state, config.query_timeout);

    let addr = format!("0.0.0.0:{}", config.port);
    info!("Starting server on {}", addr);
    info!("Listings: http://localhost:{}/listings?lat=59.91&lon=10.75", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
