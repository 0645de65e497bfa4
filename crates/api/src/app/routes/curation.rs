use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    routing::get,
    Router,
};

use showcase_infra::Pagination;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/timeline", get(timeline))
        .route("/featured/homepage", get(homepage))
        .route("/featured/bestsellers", get(bestsellers))
        .route("/featured/editorspick", get(editors_pick))
        .route("/featured/monthly", get(monthly))
        .route("/featured/yearly", get(yearly))
}

pub async fn timeline(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::TimelineQuery>,
) -> axum::response::Response {
    let status = match dto::parse_status_filter(query.status.as_deref()) {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services
        .curation
        .timeline(status, query.months.unwrap_or_default())
    {
        Ok(years) => dto::ok(years).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}

pub async fn homepage(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.curation.homepage_feed() {
        Ok(feed) => dto::ok(feed).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}

pub async fn bestsellers(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::LimitQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(dto::DEFAULT_BESTSELLERS_LIMIT);
    match services.curation.bestsellers(limit) {
        Ok(section) => dto::ok(section).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}

pub async fn editors_pick(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::PageQuery>,
) -> axum::response::Response {
    let pagination = Pagination::new(query.page, query.limit, dto::DEFAULT_PAGE_SIZE);
    match services.curation.editors_pick_page(pagination) {
        Ok(page) => dto::page(page).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}

pub async fn monthly(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::LimitQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(dto::DEFAULT_COLLECTION_LIMIT);
    match services.curation.monthly_collections(limit) {
        Ok(sections) => dto::ok(sections).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}

pub async fn yearly(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::LimitQuery>,
) -> axum::response::Response {
    let limit = query.limit.unwrap_or(dto::DEFAULT_COLLECTION_LIMIT);
    match services.curation.yearly_collections(limit) {
        Ok(sections) => dto::ok(sections).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}
