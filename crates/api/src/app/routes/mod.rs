use axum::Router;

pub mod inventory;
pub mod menu;
pub mod orders;
pub mod reports;
pub mod system;

/// Router for all resource endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/inventory", inventory::router())
        .nest("/menu", menu::router())
        .nest("/orders", orders::router())
        .nest("/reports", reports::router())
}
