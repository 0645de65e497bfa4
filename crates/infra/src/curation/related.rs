use tracing::debug;

use showcase_core::ProductId;
use showcase_products::{Product, VisibilityFlag};

use super::{CurationAggregator, CurationError};
use crate::clock::Clock;
use crate::store::{ProductFilter, ProductSort, ProductStore};

/// Maximum number of related products returned.
pub const RELATED_LIMIT: usize = 4;

/// One fallback step: a selection predicate and its ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedTier {
    pub filter: ProductFilter,
    pub sort: ProductSort,
}

impl RelatedTier {
    /// Same category, then same year, then any popular or picked product.
    pub fn for_product(target: &Product) -> Vec<RelatedTier> {
        vec![
            RelatedTier {
                filter: ProductFilter::active().category(target.category),
                sort: ProductSort::Curated,
            },
            RelatedTier {
                filter: ProductFilter::active().year(target.year),
                sort: ProductSort::Curated,
            },
            RelatedTier {
                filter: ProductFilter::active()
                    .any_flag([VisibilityFlag::EditorsPick, VisibilityFlag::BestSelling]),
                sort: ProductSort::MostViewed,
            },
        ]
    }
}

impl<S, C> CurationAggregator<S, C>
where
    S: ProductStore,
    C: Clock,
{
    /// Up to [`RELATED_LIMIT`] products related to `id`, never including it.
    pub fn related_products(&self, id: ProductId) -> Result<Vec<Product>, CurationError> {
        let target = self.target(id)?;
        let tiers = RelatedTier::for_product(&target);
        self.fill_from_tiers(id, &tiers, RELATED_LIMIT)
    }

    /// Evaluate `tiers` in order until `limit` products are chosen.
    pub fn fill_from_tiers(
        &self,
        target: ProductId,
        tiers: &[RelatedTier],
        limit: usize,
    ) -> Result<Vec<Product>, CurationError> {
        let mut chosen: Vec<Product> = Vec::with_capacity(limit);
        for (tier, step) in tiers.iter().enumerate() {
            let missing = limit.saturating_sub(chosen.len());
            if missing == 0 {
                break;
            }
            let exclude = chosen.iter().map(|p| p.id).chain([target]);
            let hits = self.section(step.filter.clone().excluding(exclude), step.sort, missing)?;
            debug!(%target, tier, hits = hits.len(), "related tier evaluated");
            chosen.extend(hits);
        }
        Ok(chosen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    use chrono::Duration;
    use showcase_products::{Category, Month, ProductStatus, VisibilityFlags};

    use crate::clock::FixedClock;
    use crate::config::ShowcaseConfig;
    use crate::store::InMemoryProductStore;

    fn product(category: Category, year: i32, minutes: i64) -> Product {
        let at = FixedClock::at_date(2025, 1, 1).now() + Duration::minutes(minutes);
        Product {
            id: ProductId::new(),
            name: format!("p{minutes}"),
            description: String::new(),
            product_link: String::new(),
            price: 0.0,
            category,
            sku: format!("p{minutes}"),
            images: vec![],
            year,
            month: Month::May,
            status: ProductStatus::Active,
            visibility: VisibilityFlags::default(),
            tags: vec![],
            stock: 0,
            views: 0,
            created_at: at,
            updated_at: at,
        }
    }

    fn aggregator(
        products: Vec<Product>,
    ) -> CurationAggregator<Arc<InMemoryProductStore>, FixedClock> {
        CurationAggregator::new(
            Arc::new(InMemoryProductStore::with_products(products)),
            FixedClock::at_date(2026, 2, 1),
            &ShowcaseConfig::default(),
        )
    }

    #[test]
    fn falls_back_to_same_year_when_category_is_alone() {
        let target = product(Category::Lighting, 2024, 0);
        let same_year_a = product(Category::Arts, 2024, 1);
        let same_year_b = product(Category::Decor, 2024, 2);
        let other = product(Category::Gift, 2020, 3);
        let expected: HashSet<_> = [same_year_a.id, same_year_b.id].into();
        let id = target.id;

        let related = aggregator(vec![target, same_year_a, same_year_b, other])
            .related_products(id)
            .unwrap();
        let got: HashSet<_> = related.iter().map(|p| p.id).collect();
        assert_eq!(related.len(), 2);
        assert_eq!(got, expected);
    }

    #[test]
    fn category_tier_prefers_editors_pick() {
        let target = product(Category::Arts, 2024, 0);
        let plain = product(Category::Arts, 2023, 5);
        let mut pick = product(Category::Arts, 2023, 1);
        pick.visibility.editors_pick = true;
        let (id, pick_id) = (target.id, pick.id);

        let related = aggregator(vec![target, plain, pick]).related_products(id).unwrap();
        assert_eq!(related[0].id, pick_id);
        assert_eq!(related.len(), 2);
    }

    #[test]
    fn third_tier_fills_with_popular_by_views_without_duplicates() {
        let target = product(Category::Arts, 2024, 0);
        let sibling = product(Category::Arts, 2019, 1);
        let mut popular = product(Category::Gift, 2018, 2);
        popular.visibility.best_selling = true;
        popular.views = 10;
        let mut sibling_pick = sibling.clone();
        sibling_pick.visibility.editors_pick = true;
        let mut hidden_pick = product(Category::Gift, 2018, 3);
        hidden_pick.visibility.editors_pick = true;
        hidden_pick.status = ProductStatus::Hidden;
        let id = target.id;

        let related = aggregator(vec![target, sibling_pick, popular.clone(), hidden_pick])
            .related_products(id)
            .unwrap();
        let ids: Vec<_> = related.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![sibling.id, popular.id]);
    }

    #[test]
    fn never_more_than_limit_and_never_the_target() {
        let target = product(Category::Decor, 2024, 0);
        let id = target.id;
        let mut products = vec![target];
        products.extend((1..10).map(|i| product(Category::Decor, 2024, i)));

        let related = aggregator(products).related_products(id).unwrap();
        assert_eq!(related.len(), RELATED_LIMIT);
        assert!(related.iter().all(|p| p.id != id));
    }

    #[test]
    fn unknown_target_is_not_found() {
        assert_eq!(
            aggregator(vec![]).related_products(ProductId::new()).unwrap_err(),
            CurationError::NotFound
        );
    }
}
