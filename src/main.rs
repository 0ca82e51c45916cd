use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing::info;
use virtual_tourist_backend::flickr::FlickrClient;
use virtual_tourist_backend::utils::config::Config;
use virtual_tourist_backend::utils::logging;
use virtual_tourist_backend::{cache, db, AppPaths, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let cfg = Config::from_env();
    if cfg.api_key.is_empty() {
        tracing::warn!("VT_FLICKR_API_KEY is not set; photo searches will be rejected by Flickr");
    }

    let paths = AppPaths::under(&cfg.data);
    if let Some(db_dir) = paths.db_path.parent() {
        std::fs::create_dir_all(db_dir)?;
    }
    // Without local storage there is nothing to serve.
    let conn = db::open_or_create(&paths.db_path).context("failed to open local storage")?;
    let pins = db::query::count_pins(&conn)?;

    let image_cache = cache::build(cfg.cache_mode, &paths.image_cache)?;
    let flickr = FlickrClient::from_config(&cfg);
    let state = Arc::new(AppState::new(paths.clone(), conn, flickr, image_cache));
    info!("loaded {} pins from {:?}, image cache: {:?}", pins, paths.db_path, cfg.cache_mode);

    let app = virtual_tourist_backend::api::routes::router(state.clone());
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
