//! Product query model: filters, orderings and pagination.

use core::cmp::Ordering;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use showcase_core::{DomainError, ProductId};
use showcase_products::{Category, Month, Product, ProductStatus, VisibilityFlag};

/// Selection predicate over products. Empty fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub status: Option<ProductStatus>,
    pub category: Option<Category>,
    pub year: Option<i32>,
    pub month: Option<Month>,
    /// Every listed flag must hold the given value.
    pub flags: Vec<(VisibilityFlag, bool)>,
    /// At least one listed flag must be set (ignored when empty).
    pub any_flag: Vec<VisibilityFlag>,
    pub exclude: Vec<ProductId>,
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn active() -> Self {
        Self::default().status(ProductStatus::Active)
    }

    pub fn status(mut self, status: ProductStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn month(mut self, month: Month) -> Self {
        self.month = Some(month);
        self
    }

    pub fn flag(mut self, flag: VisibilityFlag, value: bool) -> Self {
        self.flags.push((flag, value));
        self
    }

    pub fn any_flag(mut self, flags: impl IntoIterator<Item = VisibilityFlag>) -> Self {
        self.any_flag.extend(flags);
        self
    }

    pub fn excluding(mut self, ids: impl IntoIterator<Item = ProductId>) -> Self {
        self.exclude.extend(ids);
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.trim().is_empty() {
            self.search = Some(text.trim().to_lowercase());
        }
        self
    }

    pub fn matches(&self, p: &Product) -> bool {
        if self.status.is_some_and(|s| s != p.status)
            || self.category.is_some_and(|c| c != p.category)
            || self.year.is_some_and(|y| y != p.year)
            || self.month.is_some_and(|m| m != p.month)
        {
            return false;
        }
        if self.flags.iter().any(|(f, v)| p.visibility.get(*f) != *v) {
            return false;
        }
        if !self.any_flag.is_empty() && !self.any_flag.iter().any(|f| p.visibility.get(*f)) {
            return false;
        }
        if self.exclude.contains(&p.id) {
            return false;
        }
        match &self.search {
            Some(needle) => {
                p.name.to_lowercase().contains(needle)
                    || p.description.to_lowercase().contains(needle)
            }
            None => true,
        }
    }
}

/// Result ordering. Every variant ends with a deterministic id tie-break.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductSort {
    /// Year desc, month in calendar order, newest first.
    #[default]
    Catalog,
    Newest,
    Oldest,
    PriceHigh,
    PriceLow,
    Name,
    /// Views desc, newest first.
    MostViewed,
    /// Editor's picks, then popular, then newest first.
    Curated,
}

fn newest_first(a: &Product, b: &Product) -> Ordering {
    b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id))
}

impl ProductSort {
    pub fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            ProductSort::Catalog => b
                .year
                .cmp(&a.year)
                .then_with(|| a.month.cmp(&b.month))
                .then_with(|| newest_first(a, b)),
            ProductSort::Newest => newest_first(a, b),
            ProductSort::Oldest => newest_first(b, a),
            ProductSort::PriceHigh => b.price.total_cmp(&a.price).then_with(|| newest_first(a, b)),
            ProductSort::PriceLow => a.price.total_cmp(&b.price).then_with(|| newest_first(a, b)),
            ProductSort::Name => a.name.cmp(&b.name).then_with(|| newest_first(a, b)),
            ProductSort::MostViewed => b.views.cmp(&a.views).then_with(|| newest_first(a, b)),
            ProductSort::Curated => b
                .visibility
                .editors_pick
                .cmp(&a.visibility.editors_pick)
                .then_with(|| b.visibility.best_selling.cmp(&a.visibility.best_selling))
                .then_with(|| newest_first(a, b)),
        }
    }
}

impl FromStr for ProductSort {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(ProductSort::Catalog),
            "newest" => Ok(ProductSort::Newest),
            "oldest" => Ok(ProductSort::Oldest),
            "price-high" => Ok(ProductSort::PriceHigh),
            "price-low" => Ok(ProductSort::PriceLow),
            "name" => Ok(ProductSort::Name),
            other => Err(DomainError::validation(format!(
                "sortBy must be one of: newest, oldest, price-high, price-low, name (got '{other}')"
            ))),
        }
    }
}

/// A filtered, ordered, windowed product read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductQuery {
    pub filter: ProductFilter,
    pub sort: ProductSort,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl ProductQuery {
    pub fn new(filter: ProductFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn sort(mut self, sort: ProductSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Run the query over an in-memory collection.
    pub fn evaluate<'a>(&self, products: impl IntoIterator<Item = &'a Product>) -> Vec<Product> {
        let mut hits: Vec<&Product> = products
            .into_iter()
            .filter(|p| self.filter.matches(p))
            .collect();
        hits.sort_by(|a, b| self.sort.compare(a, b));
        hits.into_iter()
            .skip(self.offset)
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    }
}

/// Pagination parameters (1-based pages).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
        }
    }
}

impl Pagination {
    pub const MAX_LIMIT: usize = 100;

    pub fn new(page: Option<usize>, limit: Option<usize>, default_limit: usize) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(default_limit).clamp(1, Self::MAX_LIMIT),
        }
    }

    /// Saturates for absurd page numbers; the resulting page is simply empty.
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

/// One page of results plus the true total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub count: usize,
    pub total: usize,
    pub page: usize,
    pub pages: usize,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: usize, pagination: Pagination) -> Self {
        Self {
            count: data.len(),
            total,
            page: pagination.page,
            pages: total.div_ceil(pagination.limit),
            data,
        }
    }
}
