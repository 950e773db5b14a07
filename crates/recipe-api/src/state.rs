use std::sync::Arc;

use recipe_db::service::RecipeService;

/// Shared handler state. Cloned per request; the service is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<RecipeService>,
}

impl AppState {
    #[must_use]
    pub fn new(service: RecipeService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
