use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use showcase_core::DomainError;
use showcase_infra::{ListParams, MonthOrder, Page, Pagination, ProductFilter, ProductSort};
use showcase_products::{Category, Month, ProductStatus, VisibilityFlag};

/// Default page size for catalog listings and the editor's pick page.
pub const DEFAULT_PAGE_SIZE: usize = 20;
/// Default cap for the standalone popular section.
pub const DEFAULT_BESTSELLERS_LIMIT: usize = 50;
/// Default cap for standalone monthly and yearly sections.
pub const DEFAULT_COLLECTION_LIMIT: usize = 4;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub flag: String,
    pub value: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub status: Option<String>,
    pub category: Option<String>,
    pub year: Option<i32>,
    pub month: Option<String>,
    pub best_selling: Option<bool>,
    pub editors_pick: Option<bool>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn into_params(self) -> Result<ListParams, DomainError> {
        let mut filter = ProductFilter {
            status: parse_status_filter(self.status.as_deref())?,
            year: self.year,
            ..ProductFilter::all()
        };
        if let Some(category) = non_empty(self.category.as_deref()) {
            filter = filter.category(category.parse::<Category>()?);
        }
        if let Some(month) = non_empty(self.month.as_deref()) {
            filter = filter.month(month.parse::<Month>()?);
        }
        if let Some(v) = self.best_selling {
            filter = filter.flag(VisibilityFlag::BestSelling, v);
        }
        if let Some(v) = self.editors_pick {
            filter = filter.flag(VisibilityFlag::EditorsPick, v);
        }
        if let Some(text) = self.search {
            filter = filter.search(text);
        }

        Ok(ListParams {
            filter,
            sort: self.sort_by.as_deref().unwrap_or_default().parse::<ProductSort>()?,
            pagination: Pagination::new(self.page, self.limit, DEFAULT_PAGE_SIZE),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TimelineQuery {
    pub status: Option<String>,
    pub months: Option<MonthOrder>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

/// Absent means `Active`; empty or `all` means every status.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Option<ProductStatus>, DomainError> {
    match raw.map(str::trim) {
        None => Ok(Some(ProductStatus::Active)),
        Some("") => Ok(None),
        Some(s) if s.eq_ignore_ascii_case("all") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

fn non_empty(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

// -------------------------
// Response envelopes
// -------------------------

pub fn ok<T: Serialize>(data: T) -> Json<JsonValue> {
    Json(json!({ "success": true, "data": data }))
}

pub fn page<T: Serialize>(page: Page<T>) -> Json<JsonValue> {
    Json(json!({
        "success": true,
        "count": page.count,
        "total": page.total,
        "page": page.page,
        "pages": page.pages,
        "data": page.data,
    }))
}
