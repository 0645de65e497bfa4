//! Curation read side.
//!
//! Every operation is a fresh query over persisted product state; nothing is
//! cached between calls and nothing is written. Empty sections are ordinary
//! results. A store failure fails the whole call, never a single section.

mod collections;
mod homepage;
mod related;
mod timeline;

use serde::Serialize;
use thiserror::Error;

use showcase_core::ProductId;
use showcase_products::{Month, Product, YearMonth};

use crate::clock::Clock;
use crate::config::ShowcaseConfig;
use crate::store::{ProductFilter, ProductQuery, ProductSort, ProductStore, StoreError};

pub use related::{RelatedTier, RELATED_LIMIT};
pub use timeline::MonthOrder;

/// Year sections served by the standalone yearly collections read.
pub const YEARLY_COLLECTION_YEARS: usize = 5;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CurationError {
    #[error("product not found")]
    NotFound,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for CurationError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => CurationError::NotFound,
            other => CurationError::StoreUnavailable(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineMonth {
    pub month: Month,
    pub total: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineYear {
    pub year: i32,
    pub total: usize,
    pub months: Vec<TimelineMonth>,
}

/// Products released in one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthSection {
    pub year: i32,
    pub month: Month,
    pub month_short: String,
    pub products: Vec<Product>,
}

/// A capped sample of one release year plus its true size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearSection {
    pub year: i32,
    pub total: usize,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageFeed {
    pub main_showcase: Vec<Product>,
    pub popular: Vec<Product>,
    pub editors_pick: Vec<Product>,
    pub current_month: MonthSection,
    pub previous_month: MonthSection,
    pub yearly_collections: Vec<YearSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bestsellers {
    pub popular_featured: Option<Product>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCollections {
    pub current_month: MonthSection,
    pub previous_month: MonthSection,
}

/// Builds storefront views from the current product collection.
pub struct CurationAggregator<S, C> {
    store: S,
    clock: C,
    section_size: usize,
    yearly_sections: usize,
}

impl<S, C> CurationAggregator<S, C> {
    pub fn new(store: S, clock: C, config: &ShowcaseConfig) -> Self {
        Self {
            store,
            clock,
            section_size: config.section_size.max(1),
            yearly_sections: config.yearly_sections,
        }
    }
}

impl<S, C> CurationAggregator<S, C>
where
    S: ProductStore,
    C: Clock,
{
    fn current_month(&self) -> YearMonth {
        YearMonth::of(self.clock.now())
    }

    fn section(
        &self,
        filter: ProductFilter,
        sort: ProductSort,
        limit: usize,
    ) -> Result<Vec<Product>, CurationError> {
        Ok(self
            .store
            .find(&ProductQuery::new(filter).sort(sort).limit(limit))?)
    }

    fn month_section(&self, at: YearMonth, limit: usize) -> Result<MonthSection, CurationError> {
        let products = self.section(
            ProductFilter::active().year(at.year).month(at.month),
            ProductSort::Newest,
            limit,
        )?;
        Ok(MonthSection {
            year: at.year,
            month: at.month,
            month_short: at.month.short(),
            products,
        })
    }

    /// Newest-first year sections for the first `years` of `candidates`.
    fn year_sections(
        &self,
        candidates: impl IntoIterator<Item = i32>,
        years: usize,
        limit: usize,
    ) -> Result<Vec<YearSection>, CurationError> {
        candidates
            .into_iter()
            .take(years)
            .map(|year| {
                let filter = ProductFilter::active().year(year);
                Ok(YearSection {
                    year,
                    total: self.store.count(&filter)?,
                    products: self.section(filter, ProductSort::Newest, limit)?,
                })
            })
            .collect()
    }

    fn target(&self, id: ProductId) -> Result<Product, CurationError> {
        self.store.get(id)?.ok_or(CurationError::NotFound)
    }
}
