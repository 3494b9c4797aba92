use crate::models::AppData;
use crate::offline::AssetCache;
use crate::storage::KvStore;
use crate::ui::EmbeddedAssets;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: KvStore,
    pub year: i32,
    pub data: Arc<Mutex<AppData>>,
    pub assets: Arc<AssetCache<EmbeddedAssets>>,
}

impl AppState {
    pub fn new(
        store: KvStore,
        year: i32,
        data: AppData,
        assets: AssetCache<EmbeddedAssets>,
    ) -> Self {
        Self {
            store,
            year,
            data: Arc::new(Mutex::new(data)),
            assets: Arc::new(assets),
        }
    }
}
