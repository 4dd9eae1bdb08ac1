use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use hotcoffee_core::OrderId;
use hotcoffee_orders::OrderDraft;

use crate::app::dto::JsonBody;
use crate::app::errors;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/:id", get(get_order).put(update_order).delete(delete_order))
        .route("/:id/close", post(close_order))
}

pub async fn create_order(
    Extension(services): Extension<AppServices>,
    JsonBody(body): JsonBody<OrderDraft>,
) -> axum::response::Response {
    match services::call(&services, move |s| s.orders.create_order(body)).await {
        Ok(order) => (StatusCode::CREATED, Json(order)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn list_orders(Extension(services): Extension<AppServices>) -> axum::response::Response {
    match services::call(&services, |s| s.orders.get_all_orders()).await {
        Ok(orders) => (StatusCode::OK, Json(orders)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn get_order(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.orders.get_order(&id)).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_order(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<OrderDraft>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.orders.update_order(&id, body)).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn delete_order(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.orders.delete_order(&id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(resp) => resp,
    }
}

pub async fn close_order(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: OrderId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.orders.close_order(&id)).await {
        Ok(order) => (StatusCode::OK, Json(order)).into_response(),
        Err(resp) => resp,
    }
}
