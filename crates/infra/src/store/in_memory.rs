use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use showcase_core::{Entity, ProductId};
use showcase_products::{CollectionState, Precondition, Product, ProductPatch, WriteSet};

use super::query::{ProductFilter, ProductQuery};
use super::{ProductStore, StoreError};

/// In-memory product collection.
///
/// Every mutation runs under the write lock, so a commit's precondition checks
/// and writes are one critical section. Intended for tests/dev and single-node
/// deployments.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    products: RwLock<HashMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records (visibility flags included).
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let map = products.into_iter().map(|p| (*p.id(), p)).collect();
        Self {
            products: RwLock::new(map),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<ProductId, Product>>, StoreError> {
        self.products
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<ProductId, Product>>, StoreError> {
        self.products
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))
    }

    fn ensure_unique_sku(
        map: &HashMap<ProductId, Product>,
        sku: &str,
        except: ProductId,
    ) -> Result<(), StoreError> {
        if map.values().any(|p| p.id != except && p.sku == sku) {
            return Err(StoreError::Conflict(
                "Product with this SKU already exists".to_string(),
            ));
        }
        Ok(())
    }

    fn check(map: &HashMap<ProductId, Product>, pre: &Precondition) -> Result<(), StoreError> {
        match pre {
            Precondition::FlagsUnchanged { product_id, flags } => {
                let current = map.get(product_id).ok_or(StoreError::NotFound)?;
                if current.visibility != *flags {
                    return Err(StoreError::PreconditionFailed(format!(
                        "visibility of {product_id} changed concurrently"
                    )));
                }
            }
            Precondition::ShowcaseCapacity { excluding, limit } => {
                let used = map
                    .values()
                    .filter(|p| p.id != *excluding && p.visibility.best_sellers)
                    .count();
                if used >= *limit {
                    return Err(StoreError::PreconditionFailed(format!(
                        "showcase full ({used} of {limit})"
                    )));
                }
            }
            Precondition::PopularFeaturedHolders { excluding, holders } => {
                let mut current: Vec<ProductId> = map
                    .values()
                    .filter(|p| p.id != *excluding && p.visibility.popular_featured)
                    .map(|p| p.id)
                    .collect();
                current.sort();
                if current != *holders {
                    return Err(StoreError::PreconditionFailed(
                        "popularFeatured holder changed concurrently".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl ProductStore for InMemoryProductStore {
    fn get(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        Ok(self.read()?.get(&id).cloned())
    }

    fn insert(&self, product: Product) -> Result<(), StoreError> {
        let mut map = self.write()?;
        if map.contains_key(product.id()) {
            return Err(StoreError::Conflict(format!(
                "product {} already exists",
                product.id
            )));
        }
        Self::ensure_unique_sku(&map, &product.sku, product.id)?;
        map.insert(*product.id(), product);
        Ok(())
    }

    fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
        at: DateTime<Utc>,
    ) -> Result<Product, StoreError> {
        let mut map = self.write()?;
        let mut next = map.get(&id).cloned().ok_or(StoreError::NotFound)?;
        patch.apply(&mut next, at)?;
        Self::ensure_unique_sku(&map, &next.sku, id)?;
        map.insert(id, next.clone());
        Ok(next)
    }

    fn delete(&self, id: ProductId) -> Result<(), StoreError> {
        self.write()?
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    fn record_view(&self, id: ProductId) -> Result<Product, StoreError> {
        let mut map = self.write()?;
        let product = map.get_mut(&id).ok_or(StoreError::NotFound)?;
        product.views += 1;
        Ok(product.clone())
    }

    fn find(&self, query: &ProductQuery) -> Result<Vec<Product>, StoreError> {
        Ok(query.evaluate(self.read()?.values()))
    }

    fn count(&self, filter: &ProductFilter) -> Result<usize, StoreError> {
        Ok(self.read()?.values().filter(|p| filter.matches(p)).count())
    }

    fn distinct_years(&self, filter: &ProductFilter) -> Result<Vec<i32>, StoreError> {
        let years: BTreeSet<i32> = self
            .read()?
            .values()
            .filter(|p| filter.matches(p))
            .map(|p| p.year)
            .collect();
        Ok(years.into_iter().rev().collect())
    }

    fn commit(&self, write_set: &WriteSet, at: DateTime<Utc>) -> Result<Product, StoreError> {
        let mut map = self.write()?;

        for pre in write_set.preconditions() {
            Self::check(&map, pre)?;
        }
        if write_set
            .writes()
            .iter()
            .any(|w| !map.contains_key(&w.product_id))
        {
            return Err(StoreError::NotFound);
        }

        let touched: BTreeSet<ProductId> =
            write_set.writes().iter().map(|w| w.product_id).collect();
        for id in touched {
            if let Some(product) = map.get_mut(&id) {
                write_set.apply_to(product);
                product.updated_at = at;
            }
        }

        map.get(&write_set.target())
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    fn collection_state(&self, id: ProductId) -> Result<CollectionState, StoreError> {
        Ok(CollectionState::from_products(id, self.read()?.values()))
    }
}
