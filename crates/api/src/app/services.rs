use std::sync::Arc;

use showcase_infra::{
    CatalogService, Clock, CurationAggregator, InMemoryProductStore, ShowcaseConfig, SystemClock,
    VisibilityDispatcher,
};

pub type SharedStore = Arc<InMemoryProductStore>;
pub type SharedClock = Arc<dyn Clock>;

/// Everything the handlers need, shared across requests.
pub struct AppServices {
    pub catalog: CatalogService<SharedStore, SharedClock>,
    pub visibility: VisibilityDispatcher<SharedStore, SharedClock>,
    pub curation: CurationAggregator<SharedStore, SharedClock>,
}

pub fn build_services(config: &ShowcaseConfig) -> AppServices {
    build_services_with(
        Arc::new(InMemoryProductStore::new()),
        Arc::new(SystemClock),
        config,
    )
}

pub fn build_services_with(
    store: SharedStore,
    clock: SharedClock,
    config: &ShowcaseConfig,
) -> AppServices {
    tracing::info!(
        section_size = config.section_size,
        yearly_sections = config.yearly_sections,
        commit_attempts = config.commit_attempts,
        "building services over in-memory product store"
    );
    AppServices {
        catalog: CatalogService::new(store.clone(), clock.clone()),
        visibility: VisibilityDispatcher::new(
            store.clone(),
            clock.clone(),
            config.commit_attempts as usize,
        ),
        curation: CurationAggregator::new(store, clock, config),
    }
}
