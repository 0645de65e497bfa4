use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde_json::json;

use showcase_products::{NewProduct, ProductPatch};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/stats/summary", get(stats_summary))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/visibility", patch(update_visibility))
        .route("/:id/related", get(related_products))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> axum::response::Response {
    let params = match query.into_params() {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.catalog.list(&params) {
        Ok(page) => dto::page(page).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> axum::response::Response {
    let body = match errors::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.create(body) {
        Ok(product) => (StatusCode::CREATED, dto::ok(product)).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// Public product page read; counts the view.
pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.view(id) {
        Ok(product) => dto::ok(product).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let body = match errors::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.update(id, &body) {
        Ok(product) => dto::ok(product).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.catalog.delete(id) {
        Ok(()) => Json(json!({ "success": true, "message": "Product deleted" })).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}

/// The single entry point for visibility flag writes.
pub async fn update_visibility(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::VisibilityRequest>, JsonRejection>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let body = match errors::json_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.visibility.dispatch_named(id, &body.flag, body.value) {
        Ok(outcome) => Json(json!({
            "success": true,
            "product": outcome.product,
            "changed": !outcome.write_set.is_noop(),
        }))
        .into_response(),
        Err(e) => errors::visibility_error_to_response(e),
    }
}

pub async fn related_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_product_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.curation.related_products(id) {
        Ok(products) => dto::ok(products).into_response(),
        Err(e) => errors::curation_error_to_response(e),
    }
}

pub async fn stats_summary(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.catalog.stats() {
        Ok(stats) => dto::ok(stats).into_response(),
        Err(e) => errors::catalog_error_to_response(e),
    }
}
