//! Product storage boundary.
//!
//! The store is the single shared mutable resource. Descriptive writes go
//! through `insert`/`update`/`delete`; visibility flags change only through
//! `commit`, which applies a rule-engine [`WriteSet`] as one conditional write.

pub mod in_memory;
pub mod query;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;

use showcase_core::{DomainError, ProductId};
use showcase_products::{CollectionState, Product, ProductPatch, VisibilityFlag, WriteSet};

pub use in_memory::InMemoryProductStore;
pub use query::{Page, Pagination, ProductFilter, ProductQuery, ProductSort};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transient backend failure; safe to retry.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A write-set precondition no longer holds; nothing was written.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    #[error("product not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Read/write access to the product collection.
pub trait ProductStore: Send + Sync {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Insert a new product. SKUs are unique across the collection.
    fn insert(&self, product: Product) -> Result<(), StoreError>;

    /// Apply a descriptive patch atomically, preserving visibility flags.
    fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        at: DateTime<Utc>,
    ) -> Result<Product, StoreError>;

    fn delete(&self, id: ProductId) -> Result<(), StoreError>;

    /// Increment the view counter and return the updated product.
    fn record_view(&self, id: ProductId) -> Result<Product, StoreError>;

    fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError>;

    fn count(&self, filter: &ProductFilter) -> Result<usize, StoreError>;

    /// Distinct release years among matching products, newest first.
    fn distinct_years(&self, filter: &ProductFilter) -> Result<Vec<i32>, StoreError>;

    /// Check every precondition and apply every write of `write_set` as one
    /// unit, returning the target product as stored afterwards.
    ///
    /// On any failure nothing is written.
    fn commit(&self, write_set: &WriteSet, at: DateTime<Utc>) -> Result<Product, StoreError>;

    /// The slice of collection state the visibility rule engine decides against.
    fn collection_state(&self, id: ProductId) -> Result<CollectionState, StoreError> {
        let target_flags = self.get(id)?.map(|p| p.visibility);
        let showcase_holders = self.count(
            &ProductFilter::all()
                .flag(VisibilityFlag::BestSellers, true)
                .excluding([id]),
        )?;
        let mut popular_featured_holders: Vec<ProductId> = self
            .find(&ProductQuery::new(
                ProductFilter::all()
                    .flag(VisibilityFlag::PopularFeatured, true)
                    .excluding([id]),
            ))?
            .into_iter()
            .map(|p| p.id)
            .collect();
        popular_featured_holders.sort();

        Ok(CollectionState {
            product_id: id,
            target_flags,
            showcase_holders,
            popular_featured_holders,
        })
    }
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(id)
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        (**self).insert(product)
    }

    fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        at: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        (**self).update(id, patch, at)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn record_view(&self, id: ProductId) -> Result<Product, StoreError> {
        (**self).record_view(id)
    }

    fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        (**self).find(query)
    }

    fn count(&self, filter: &ProductFilter) -> Result<usize, StoreError> {
        (**self).count(filter)
    }

    fn distinct_years(&self, filter: &ProductFilter) -> Result<Vec<i32>, StoreError> {
        (**self).distinct_years(filter)
    }

    fn commit(&self, write_set: &WriteSet, at: DateTime<Utc>) -> Result<Product, StoreError> {
        (**self).commit(write_set, at)
    }

    fn collection_state(&self, id: ProductId) -> Result<CollectionState, StoreError> {
        (**self).collection_state(id)
    }
}
