//! Infrastructure layer: product storage, visibility dispatch, catalog
//! services, the curation read side, clock and configuration.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod curation;
pub mod store;
pub mod visibility_dispatcher;


pub use catalog::{CatalogError, CatalogService, CatalogStats, ListParams, StatusCount};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::ShowcaseConfig;
pub use curation::{
    Bestsellers, CurationAggregator, CurationError, HomepageFeed, MonthOrder, MonthSection,
    MonthlyCollections, TimelineMonth, TimelineYear, YearSection,
};
pub use store::{
    InMemoryProductStore, Page, Pagination, ProductFilter, ProductQuery, ProductSort, ProductStore,
    StoreError,
};
pub use visibility_dispatcher::{VisibilityDispatcher, VisibilityError, VisibilityOutcome};
