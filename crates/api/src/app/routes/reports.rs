use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::dto::PopularItemsQuery;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/total-sales", get(total_sales))
        .route("/popular-items", get(popular_items))
}

pub async fn total_sales(Extension(services): Extension<AppServices>) -> axum::response::Response {
    match services::call(&services, |s| s.reports.total_sales()).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn popular_items(
    Extension(services): Extension<AppServices>,
    Query(query): Query<PopularItemsQuery>,
) -> axum::response::Response {
    let limit = query.limit();
    match services::call(&services, move |s| s.reports.popular_items(limit)).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(resp) => resp,
    }
}
