use tracing::debug;

use showcase_products::{Product, VisibilityFlag};

use super::{
    Bestsellers, CurationAggregator, CurationError, MonthlyCollections, YearSection,
    YEARLY_COLLECTION_YEARS,
};
use crate::clock::Clock;
use crate::store::{Page, Pagination, ProductFilter, ProductQuery, ProductSort, ProductStore};

impl<S, C> CurationAggregator<S, C>
where
    S: ProductStore,
    C: Clock,
{
    /// The popular-featured highlight plus the rest of the popular section.
    pub fn bestsellers(&self, limit: usize) -> Result<Bestsellers, CurationError> {
        let popular_featured: Option<Product> = self
            .section(
                ProductFilter::active().flag(VisibilityFlag::PopularFeatured, true),
                ProductSort::Newest,
                1,
            )?
            .into_iter()
            .next();

        let products = self.section(
            ProductFilter::active()
                .flag(VisibilityFlag::BestSelling, true)
                .excluding(popular_featured.iter().map(|p| p.id)),
            ProductSort::Newest,
            limit,
        )?;
        debug!(featured = popular_featured.is_some(), products = products.len(), "bestsellers read");

        Ok(Bestsellers {
            popular_featured,
            products,
        })
    }

    pub fn editors_pick_page(&self, pagination: Pagination) -> Result<Page<Product>, CurationError> {
        let filter = ProductFilter::active().flag(VisibilityFlag::EditorsPick, true);
        let total = self.store.count(&filter)?;
        let data = self.store.find(
            &ProductQuery::new(filter)
                .sort(ProductSort::Newest)
                .offset(pagination.offset())
                .limit(pagination.limit),
        )?;
        Ok(Page::new(data, total, pagination))
    }

    pub fn monthly_collections(&self, limit: usize) -> Result<MonthlyCollections, CurationError> {
        let now = self.current_month();
        Ok(MonthlyCollections {
            current_month: self.month_section(now, limit)?,
            previous_month: self.month_section(now.previous(), limit)?,
        })
    }

    /// The most recent release years with active products, current year included.
    pub fn yearly_collections(&self, limit: usize) -> Result<Vec<YearSection>, CurationError> {
        let years = self.store.distinct_years(&ProductFilter::active())?;
        self.year_sections(years, YEARLY_COLLECTION_YEARS, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use showcase_core::ProductId;
    use showcase_products::{Category, Month, ProductStatus, VisibilityFlags};

    use crate::clock::FixedClock;
    use crate::config::ShowcaseConfig;
    use crate::store::InMemoryProductStore;

    fn product(year: i32, month: Month, minutes: i64, flags: VisibilityFlags) -> Product {
        let at = FixedClock::at_date(2025, 1, 1).now() + Duration::minutes(minutes);
        Product {
            id: ProductId::new(),
            name: format!("p{minutes}"),
            description: String::new(),
            product_link: String::new(),
            price: 0.0,
            category: Category::Furniture,
            sku: format!("p{minutes}"),
            images: vec![],
            year,
            month,
            status: ProductStatus::Active,
            visibility: flags,
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
            FixedClock::at_date(2026, 5, 10),
            &ShowcaseConfig::default(),
        )
    }

    #[test]
    fn bestsellers_separates_the_featured_highlight() {
        let both = VisibilityFlags {
            best_selling: true,
            popular_featured: true,
            ..Default::default()
        };
        let popular = VisibilityFlags {
            best_selling: true,
            ..Default::default()
        };
        let featured = product(2025, Month::May, 0, both);
        let other = product(2025, Month::May, 1, popular);
        let (featured_id, other_id) = (featured.id, other.id);

        let out = aggregator(vec![featured, other]).bestsellers(50).unwrap();
        assert_eq!(out.popular_featured.map(|p| p.id), Some(featured_id));
        let ids: Vec<_> = out.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![other_id]);
    }

    #[test]
    fn bestsellers_without_highlight_is_none() {
        let out = aggregator(vec![]).bestsellers(50).unwrap();
        assert!(out.popular_featured.is_none());
        assert!(out.products.is_empty());
    }

    #[test]
    fn editors_pick_page_counts_all_picks() {
        let pick = VisibilityFlags {
            editors_pick: true,
            ..Default::default()
        };
        let products = (0..5).map(|i| product(2025, Month::May, i, pick)).collect();
        let page = aggregator(products)
            .editors_pick_page(Pagination::new(Some(2), Some(3), 20))
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.count, 2);
        assert_eq!(page.pages, 2);
        assert_eq!(page.data[0].name, "p1");
    }

    #[test]
    fn monthly_collections_cover_current_and_previous_month() {
        let none = VisibilityFlags::default();
        let out = aggregator(vec![
            product(2026, Month::May, 0, none),
            product(2026, Month::April, 1, none),
            product(2026, Month::April, 2, none),
            product(2025, Month::April, 3, none),
        ])
        .monthly_collections(4)
        .unwrap();
        assert_eq!(out.current_month.products.len(), 1);
        assert_eq!(out.previous_month.month_short, "APR");
        assert_eq!(out.previous_month.products.len(), 2);
    }

    #[test]
    fn yearly_collections_include_current_year_up_to_five() {
        let none = VisibilityFlags::default();
        let products = [2026, 2025, 2024, 2023, 2022, 2021, 2020]
            .into_iter()
            .enumerate()
            .map(|(i, y)| product(y, Month::March, i as i64, none))
            .collect();
        let years: Vec<_> = aggregator(products)
            .yearly_collections(4)
            .unwrap()
            .iter()
            .map(|s| s.year)
            .collect();
        assert_eq!(years, vec![2026, 2025, 2024, 2023, 2022]);
    }
}
