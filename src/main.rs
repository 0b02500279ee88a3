use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webring::config::Config;
use webring::server::{build_router, AppState};
use webring::store;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "webring=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();

    let pool = store::connect(&config.database_url)
        .await
        .expect("failed to open the ring store");
    store::init_schema(&pool)
        .await
        .expect("failed to initialize the store schema");

    let app = build_router(AppState::new(pool, config.public_host.clone()));

    tracing::info!("listening on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .unwrap();
    axum::serve(listener, app).await.unwrap();
}
