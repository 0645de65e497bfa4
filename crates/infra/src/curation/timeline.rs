use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use showcase_products::{Month, Product, ProductStatus};

use super::{CurationAggregator, CurationError, TimelineMonth, TimelineYear};
use crate::clock::Clock;
use crate::store::{ProductFilter, ProductQuery, ProductSort, ProductStore};

/// Month ordering inside a timeline year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthOrder {
    #[default]
    Asc,
    Desc,
}

impl<S, C> CurationAggregator<S, C>
where
    S: ProductStore,
    C: Clock,
{
    /// Year → month → products, years newest first.
    ///
    /// `status` of `None` includes every lifecycle status.
    pub fn timeline(
        &self,
        status: Option<ProductStatus>,
        order: MonthOrder,
    ) -> Result<Vec<TimelineYear>, CurationError> {
        let filter = ProductFilter {
            status,
            ..ProductFilter::all()
        };
        let products = self
            .store
            .find(&ProductQuery::new(filter).sort(ProductSort::Newest))?;
        debug!(products = products.len(), ?status, "timeline built");
        Ok(group(products, order))
    }
}

/// Group newest-first `products`, keeping that order inside each month.
fn group(products: Vec<Product>, order: MonthOrder) -> Vec<TimelineYear> {
    let mut years: BTreeMap<i32, BTreeMap<Month, Vec<Product>>> = BTreeMap::new();
    for p in products {
        years
            .entry(p.year)
            .or_default()
            .entry(p.month)
            .or_default()
            .push(p);
    }

    years
        .into_iter()
        .rev()
        .map(|(year, months)| {
            let mut months: Vec<TimelineMonth> = months
                .into_iter()
                .map(|(month, products)| TimelineMonth {
                    month,
                    total: products.len(),
                    products,
                })
                .collect();
            if order == MonthOrder::Desc {
                months.reverse();
            }
            TimelineYear {
                year,
                total: months.iter().map(|m| m.total).sum(),
                months,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;
    use showcase_core::ProductId;
    use showcase_products::{Category, VisibilityFlags};

    use crate::clock::FixedClock;
    use crate::config::ShowcaseConfig;
    use crate::store::InMemoryProductStore;

    fn product(name: &str, year: i32, month: Month, minutes: i64) -> Product {
        let at = FixedClock::at_date(2025, 1, 1).now() + Duration::minutes(minutes);
        Product {
            id: ProductId::new(),
            name: name.to_string(),
            description: String::new(),
            product_link: String::new(),
            price: 0.0,
            category: Category::Gift,
            sku: name.to_string(),
            images: vec![],
            year,
            month,
            status: ProductStatus::Active,
            visibility: VisibilityFlags::default(),
            tags: vec![],
            stock: 0,
            views: 0,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn groups_by_year_then_month_with_totals() {
        let mut hidden = product("hidden", 2022, Month::May, 3);
        hidden.status = ProductStatus::Hidden;
        let store = Arc::new(InMemoryProductStore::with_products([
            product("a", 2024, Month::March, 0),
            product("b", 2024, Month::March, 1),
            product("c", 2023, Month::January, 2),
            hidden,
        ]));
        let agg = CurationAggregator::new(
            store,
            FixedClock::at_date(2026, 1, 10),
            &ShowcaseConfig::default(),
        );

        let timeline = agg.timeline(Some(ProductStatus::Active), MonthOrder::Asc).unwrap();
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[0].year, 2024);
        assert_eq!(timeline[0].total, 2);
        assert_eq!(timeline[0].months.len(), 1);
        let names: Vec<_> = timeline[0].months[0]
            .products
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a"]);

        let all = agg.timeline(None, MonthOrder::Asc).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn months_follow_calendar_order_and_can_be_reversed() {
        let products = vec![
            product("dec", 2024, Month::December, 0),
            product("feb", 2024, Month::February, 1),
            product("jul", 2024, Month::July, 2),
        ];
        let mut newest_first = products.clone();
        newest_first.reverse();

        let asc = group(newest_first.clone(), MonthOrder::Asc);
        let months: Vec<_> = asc[0].months.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![Month::February, Month::July, Month::December]);

        let desc = group(newest_first, MonthOrder::Desc);
        let months: Vec<_> = desc[0].months.iter().map(|m| m.month).collect();
        assert_eq!(months, vec![Month::December, Month::July, Month::February]);
    }

    #[test]
    fn empty_collection_is_empty_timeline() {
        assert!(group(vec![], MonthOrder::Asc).is_empty());
    }
}
