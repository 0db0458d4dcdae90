use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use crate::{
    dto::items::ItemRequest,
    error::{AppError, AppResult},
    middleware::json::{JsonBody, split_body},
    models::Item,
    routes::params::ItemListQuery,
    services::item_service,
    state::AppState,
};

// Nested under /orders/{order_id}, so every handler sees the order id
// as the leading path segment.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route(
            "/{product_id}",
            get(get_item).put(update_item).delete(delete_item),
        )
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/items",
    params(
        ("order_id" = i32, Path, description = "Order identifier"),
        ("price" = Option<f64>, Query, description = "Items with this price"),
        ("quantity" = Option<i32>, Query, description = "Items with this quantity"),
    ),
    responses(
        (status = 200, description = "Items of the order", body = [Item]),
        (status = 400, description = "Invalid filter value"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
    query: Result<Query<ItemListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Item>>> {
    let Path(order_id) = order_id?;
    // The service settles the rejection after the order lookup.
    let query = query.map(|Query(query)| query).map_err(AppError::from);
    let items = item_service::list_items(&state, order_id, query).await?;
    Ok(Json(items))
}

#[utoipa::path(
    post,
    path = "/api/orders/{order_id}/items",
    params(("order_id" = i32, Path, description = "Order identifier")),
    request_body = ItemRequest,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "The posted item data was not valid"),
        (status = 404, description = "Order not found"),
        (status = 415, description = "Content-Type must be application/json"),
    ),
    tag = "Items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
    body: Result<JsonBody<ItemRequest>, AppError>,
) -> AppResult<impl IntoResponse> {
    let Path(order_id) = order_id?;
    let payload = split_body(body)?;
    let item = item_service::create_item(&state, order_id, payload).await?;

    let location = format!("/api/orders/{}/items/{}", item.order_id, item.product_id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(item),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}/items/{product_id}",
    params(
        ("order_id" = i32, Path, description = "Order identifier"),
        ("product_id" = i32, Path, description = "Product identifier"),
    ),
    responses(
        (status = 200, description = "The item", body = Item),
        (status = 404, description = "Item not found"),
    ),
    tag = "Items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> AppResult<Json<Item>> {
    let Path((order_id, product_id)) = path?;
    let item = item_service::get_item(&state, order_id, product_id).await?;
    Ok(Json(item))
}

#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/items/{product_id}",
    params(
        ("order_id" = i32, Path, description = "Order identifier"),
        ("product_id" = i32, Path, description = "Product identifier"),
    ),
    request_body = ItemRequest,
    responses(
        (status = 200, description = "Updated item", body = Item),
        (status = 400, description = "The posted item data was not valid"),
        (status = 404, description = "Item not found"),
        (status = 415, description = "Content-Type must be application/json"),
    ),
    tag = "Items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
    body: Result<JsonBody<ItemRequest>, AppError>,
) -> AppResult<Json<Item>> {
    let Path((order_id, product_id)) = path?;
    let payload = split_body(body)?;
    let item = item_service::update_item(&state, order_id, product_id, payload).await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}/items/{product_id}",
    params(
        ("order_id" = i32, Path, description = "Order identifier"),
        ("product_id" = i32, Path, description = "Product identifier"),
    ),
    responses((status = 204, description = "Item deleted")),
    tag = "Items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    path: Result<Path<(i32, i32)>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path((order_id, product_id)) = path?;
    item_service::delete_item(&state, order_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
