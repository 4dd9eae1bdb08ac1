use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use hotcoffee_core::IngredientId;
use hotcoffee_inventory::InventoryItem;

use crate::app::dto::{JsonBody, OneOrMany};
use crate::app::errors;
use crate::app::services::{self, AppServices};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_items).post(create_items))
        .route("/:id", get(get_item).put(update_item).delete(delete_item))
}

pub async fn create_items(
    Extension(services): Extension<AppServices>,
    JsonBody(body): JsonBody<OneOrMany<InventoryItem>>,
) -> axum::response::Response {
    match body {
        OneOrMany::One(item) => {
            match services::call(&services, move |s| s.inventory.create_inventory_item(item)).await {
                Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
                Err(resp) => resp,
            }
        }
        OneOrMany::Many(items) => {
            match services::call(&services, move |s| s.inventory.create_inventory_items(items)).await {
                Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
                Err(resp) => resp,
            }
        }
    }
}

pub async fn list_items(Extension(services): Extension<AppServices>) -> axum::response::Response {
    match services::call(&services, |s| s.inventory.get_all_inventory_items()).await {
        Ok(items) => (StatusCode::OK, Json(items)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn get_item(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: IngredientId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.inventory.get_inventory_item(&id)).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn update_item(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<InventoryItem>,
) -> axum::response::Response {
    let id: IngredientId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.inventory.update_inventory_item(&id, body)).await {
        Ok(item) => (StatusCode::OK, Json(item)).into_response(),
        Err(resp) => resp,
    }
}

pub async fn delete_item(
    Extension(services): Extension<AppServices>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: IngredientId = match errors::parse_id(&id) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services::call(&services, move |s| s.inventory.delete_inventory_item(&id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(resp) => resp,
    }
}
