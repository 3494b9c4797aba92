use activity_tracker::offline::{AssetCache, OfflineCache};
use activity_tracker::ui::{EmbeddedAssets, STATIC_MANIFEST};
use activity_tracker::{load_data, router, AppState, Config, KvStore};
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let store = KvStore::new(config.data_path.clone());
    let data = load_data(&store).await;
    info!(
        path = %store.path().display(),
        days = data.activities.len(),
        notes = data.comments.len(),
        "loaded activity log"
    );

    let worker = OfflineCache::new(config.cache.clone(), &STATIC_MANIFEST);
    let assets = AssetCache::start(worker, EmbeddedAssets)?;

    let state = AppState::new(store, config.year, data, assets);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
