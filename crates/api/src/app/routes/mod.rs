use axum::Router;

pub mod curation;
pub mod products;
pub mod system;

/// Router for every product endpoint; authentication is handled upstream.
pub fn router() -> Router {
    Router::new().nest("/products", products::router().merge(curation::router()))
}
