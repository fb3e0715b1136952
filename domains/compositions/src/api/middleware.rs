//! Compositions domain state

use std::sync::Arc;

use crate::repository::CatalogStore;
use crate::service::CompositionService;

/// Application state for the Compositions domain
#[derive(Clone)]
pub struct CompositionsState {
    pub service: CompositionService,
}

impl CompositionsState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            service: CompositionService::new(store),
        }
    }
}
