use std::sync::Arc;

use bourse_core::{CollaboratorUrls, CoreError, MarketService, Warehouse};

use crate::error::ApiError;

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<MarketService<Warehouse>>,
    pub collaborators: Arc<CollaboratorUrls>,
    pub default_history_days: usize,
}

impl AppState {
    pub fn new(
        warehouse: Warehouse,
        collaborators: CollaboratorUrls,
        default_history_days: usize,
    ) -> Self {
        Self {
            service: Arc::new(MarketService::new(warehouse)),
            collaborators: Arc::new(collaborators),
            default_history_days,
        }
    }

    /// Run a store read on the blocking pool.
    pub async fn read<T, F>(&self, read: F) -> Result<T, ApiError>
    where
        F: FnOnce(&MarketService<Warehouse>) -> Result<T, CoreError> + Send + 'static,
        T: Send + 'static,
    {
        let service = Arc::clone(&self.service);
        let result = tokio::task::spawn_blocking(move || read(&service)).await?;
        result.map_err(ApiError::from)
    }
}
