//! Catalog administration: descriptive CRUD, listing and summary counts.
//!
//! Nothing here writes visibility flags; those go through
//! [`crate::visibility_dispatcher::VisibilityDispatcher`].

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use showcase_core::{DomainError, ProductId};
use showcase_products::{NewProduct, Product, ProductPatch, ProductStatus, VisibilityFlag};

use crate::clock::Clock;
use crate::store::{Page, Pagination, ProductFilter, ProductQuery, ProductSort, ProductStore, StoreError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("product not found")]
    NotFound,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<DomainError> for CatalogError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => {
                CatalogError::Validation(msg)
            }
            DomainError::NotFound => CatalogError::NotFound,
            DomainError::Conflict(msg) => CatalogError::Conflict(msg),
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound => CatalogError::NotFound,
            StoreError::Conflict(msg) => CatalogError::Conflict(msg),
            StoreError::Domain(e) => e.into(),
            StoreError::Unavailable(msg) | StoreError::PreconditionFailed(msg) => {
                CatalogError::StoreUnavailable(msg)
            }
        }
    }
}

/// Admin listing request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub filter: ProductFilter,
    pub sort: ProductSort,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    pub status: ProductStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    /// Products in `Active` status.
    pub published: usize,
    pub hidden: usize,
    pub best_sellers_count: usize,
    pub editors_pick_count: usize,
    pub featured_product_count: usize,
    pub breakdown: Vec<StatusCount>,
}

pub struct CatalogService<S, C> {
    store: S,
    clock: C,
}

impl<S, C> CatalogService<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }
}

impl<S, C> CatalogService<S, C>
where
    S: ProductStore,
    C: Clock,
{
    pub fn create(&self, draft: NewProduct) -> Result<Product, CatalogError> {
        let product = draft.into_product(ProductId::new(), self.clock.now())?;
        self.store.insert(product.clone())?;
        info!(product_id = %product.id, sku = %product.sku, "product created");
        Ok(product)
    }

    pub fn update(&self, id: ProductId, patch: &ProductPatch) -> Result<Product, CatalogError> {
        let product = self.store.update(id, patch, self.clock.now())?;
        info!(product_id = %id, "product updated");
        Ok(product)
    }

    pub fn delete(&self, id: ProductId) -> Result<(), CatalogError> {
        self.store.delete(id)?;
        info!(product_id = %id, "product deleted");
        Ok(())
    }

    /// Fetch without side effects.
    pub fn get(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.store.get(id)?.ok_or(CatalogError::NotFound)
    }

    /// Fetch for display, counting the view.
    pub fn view(&self, id: ProductId) -> Result<Product, CatalogError> {
        Ok(self.store.record_view(id)?)
    }

    pub fn list(&self, params: &ListParams) -> Result<Page<Product>, CatalogError> {
        let total = self.store.count(&params.filter)?;
        let data = self.store.find(
            &ProductQuery::new(params.filter.clone())
                .sort(params.sort)
                .offset(params.pagination.offset())
                .limit(params.pagination.limit),
        )?;
        debug!(total, returned = data.len(), page = params.pagination.page, "catalog listed");
        Ok(Page::new(data, total, params.pagination))
    }

    pub fn stats(&self) -> Result<CatalogStats, CatalogError> {
        let count = |filter: ProductFilter| self.store.count(&filter);

        let breakdown = ProductStatus::ALL
            .into_iter()
            .map(|status| -> Result<StatusCount, StoreError> {
                Ok(StatusCount {
                    status,
                    count: count(ProductFilter::all().status(status))?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;
        let of = |status: ProductStatus| {
            breakdown
                .iter()
                .find(|s| s.status == status)
                .map_or(0, |s| s.count)
        };

        Ok(CatalogStats {
            total: count(ProductFilter::all())?,
            published: of(ProductStatus::Active),
            hidden: of(ProductStatus::Hidden),
            best_sellers_count: count(ProductFilter::all().flag(VisibilityFlag::BestSellers, true))?,
            editors_pick_count: count(ProductFilter::all().flag(VisibilityFlag::EditorsPick, true))?,
            featured_product_count: count(
                ProductFilter::all().flag(VisibilityFlag::FeaturedProduct, true),
            )?,
            breakdown,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use showcase_products::{Category, Month};

    use crate::clock::FixedClock;
    use crate::store::InMemoryProductStore;

    fn service() -> CatalogService<Arc<InMemoryProductStore>, FixedClock> {
        CatalogService::new(
            Arc::new(InMemoryProductStore::new()),
            FixedClock::at_date(2026, 6, 15),
        )
    }

    fn draft(name: &str, sku: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: format!("{name} in walnut"),
            product_link: String::new(),
            price: 40.0,
            category: Category::Decor,
            sku: sku.to_string(),
            images: vec![],
            year: 2026,
            month: Month::June,
            status: ProductStatus::Active,
            tags: vec![],
            stock: 2,
        }
    }

    #[test]
    fn create_then_view_counts_views() {
        let svc = service();
        let p = svc.create(draft("Bowl", "B-1")).unwrap();
        assert_eq!(svc.view(p.id).unwrap().views, 1);
        assert_eq!(svc.view(p.id).unwrap().views, 2);
        assert_eq!(svc.get(p.id).unwrap().views, 2);
    }

    #[test]
    fn duplicate_sku_is_conflict() {
        let svc = service();
        svc.create(draft("Bowl", "B-1")).unwrap();
        let err = svc.create(draft("Other", "B-1")).unwrap_err();
        assert_eq!(
            err,
            CatalogError::Conflict("Product with this SKU already exists".to_string())
        );
    }

    #[test]
    fn invalid_draft_is_validation_error() {
        let svc = service();
        let mut d = draft("Bowl", "B-1");
        d.year = 1900;
        assert!(matches!(svc.create(d), Err(CatalogError::Validation(_))));
    }

    #[test]
    fn update_and_delete_unknown_are_not_found() {
        let svc = service();
        let id = ProductId::new();
        assert_eq!(
            svc.update(id, &ProductPatch::default()).unwrap_err(),
            CatalogError::NotFound
        );
        assert_eq!(svc.delete(id).unwrap_err(), CatalogError::NotFound);
    }

    #[test]
    fn list_paginates_with_true_total() {
        let svc = service();
        for i in 0..5 {
            svc.create(draft(&format!("Item {i}"), &format!("S-{i}"))).unwrap();
        }
        let mut hidden = draft("Hidden", "H-1");
        hidden.status = ProductStatus::Hidden;
        svc.create(hidden).unwrap();

        let page = svc
            .list(&ListParams {
                filter: ProductFilter::active(),
                sort: ProductSort::Name,
                pagination: Pagination::new(Some(2), Some(2), 20),
            })
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        let names: Vec<_> = page.data.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Item 2", "Item 3"]);
    }

    #[test]
    fn stats_break_down_by_status() {
        let svc = service();
        svc.create(draft("A", "A")).unwrap();
        let mut h = draft("B", "B");
        h.status = ProductStatus::Hidden;
        svc.create(h).unwrap();
        let mut a = draft("C", "C");
        a.status = ProductStatus::Archived;
        svc.create(a).unwrap();

        let stats = svc.stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.published, 1);
        assert_eq!(stats.hidden, 1);
        assert_eq!(stats.best_sellers_count, 0);
        assert_eq!(stats.breakdown.len(), 3);
        assert_eq!(stats.breakdown[2].count, 1);
    }
}
