//! Shared application state for all routes.

use crate::config::AppConfig;
use crate::search::SearchIndex;
use crate::store::RecordStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub search: Arc<dyn SearchIndex>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, search: Arc<dyn SearchIndex>, config: AppConfig) -> Self {
        AppState {
            store,
            search,
            config: Arc::new(config),
        }
    }
}
