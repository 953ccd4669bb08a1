use crate::config::{Config, DEFAULT_RECENT_LIMIT};
use crate::estimation::model::EnergyModel;
use crate::store::ResultStore;
use std::sync::Arc;

/// Shared, immutable application state handed to every request.
#[derive(Debug, Clone)]
pub struct AppState {
    model: Arc<dyn EnergyModel>,
    store: Arc<dyn ResultStore>,
    recent_limit: u32,
}

impl AppState {
    pub fn new(model: Arc<dyn EnergyModel>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            model,
            store,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn from_config(
        config: &Config,
        model: Arc<dyn EnergyModel>,
        store: Arc<dyn ResultStore>,
    ) -> Self {
        Self::new(model, store).with_recent_limit(config.recent_limit())
    }

    pub fn with_recent_limit(mut self, recent_limit: u32) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    pub fn model(&self) -> &dyn EnergyModel {
        self.model.as_ref()
    }

    pub fn store(&self) -> &dyn ResultStore {
        self.store.as_ref()
    }

    pub fn recent_limit(&self) -> u32 {
        self.recent_limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimation::vdi4707::Vdi4707Model;
    use crate::store::InMemoryResultStore;

    #[test]
    fn recent_limit_defaults_to_five() {
        let state = AppState::new(
            Arc::new(Vdi4707Model::default()),
            Arc::new(InMemoryResultStore::new()),
        );
        assert_eq!(state.recent_limit(), 5);
        assert_eq!(state.with_recent_limit(2).recent_limit(), 2);
    }
}
