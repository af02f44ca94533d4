use std::sync::Arc;

use crate::config::AppConfig;
use crate::store::{HttpStore, StoreClient};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn StoreClient>,
}

impl AppState {
    pub fn init(config: AppConfig) -> anyhow::Result<Self> {
        let config = Arc::new(config);
        let store = Arc::new(HttpStore::new(config.store.clone())?) as Arc<dyn StoreClient>;
        Ok(Self { config, store })
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Arc<dyn StoreClient>) -> Self {
        Self { config, store }
    }

    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::StoreConfig;
        use crate::store::memory::MemoryStore;

        let config = Arc::new(AppConfig {
            store: StoreConfig::with_base("http://store.test/api/items"),
        });
        Self::from_parts(config, Arc::new(MemoryStore::new()))
    }
}
