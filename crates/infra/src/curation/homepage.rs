use tracing::debug;

use showcase_products::{VisibilityFlag, MAIN_SHOWCASE_LIMIT};

use super::{CurationAggregator, CurationError, HomepageFeed};
use crate::clock::Clock;
use crate::store::{ProductFilter, ProductSort, ProductStore};

impl<S, C> CurationAggregator<S, C>
where
    S: ProductStore,
    C: Clock,
{
    /// Every homepage section in one read.
    pub fn homepage_feed(&self) -> Result<HomepageFeed, CurationError> {
        let now = self.current_month();
        let size = self.section_size;

        // Invariant 2 already caps the showcase; the cap here guards stale data.
        let main_showcase = self.section(
            ProductFilter::active().flag(VisibilityFlag::BestSellers, true),
            ProductSort::MostViewed,
            MAIN_SHOWCASE_LIMIT,
        )?;
        let popular = self.section(
            ProductFilter::active().flag(VisibilityFlag::BestSelling, true),
            ProductSort::Newest,
            size,
        )?;
        let editors_pick = self.section(
            ProductFilter::active().flag(VisibilityFlag::EditorsPick, true),
            ProductSort::Newest,
            size,
        )?;
        let current_month = self.month_section(now, size)?;
        let previous_month = self.month_section(now.previous(), size)?;

        let past_years = self
            .store
            .distinct_years(&ProductFilter::active())?
            .into_iter()
            .filter(|y| *y < now.year);
        let yearly_collections = self.year_sections(past_years, self.yearly_sections, size)?;

        debug!(
            showcase = main_showcase.len(),
            popular = popular.len(),
            editors_pick = editors_pick.len(),
            years = yearly_collections.len(),
            "homepage feed assembled"
        );

        Ok(HomepageFeed {
            main_showcase,
            popular,
            editors_pick,
            current_month,
            previous_month,
            yearly_collections,
        })
    }
}
