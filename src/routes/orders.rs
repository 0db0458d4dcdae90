use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, put},
};

use crate::{
    dto::orders::OrderRequest,
    error::{AppError, AppResult},
    middleware::json::{JsonBody, split_body},
    models::Order,
    routes::{items, params::OrderListQuery},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route(
            "/{order_id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/{order_id}/cancel", put(cancel_order))
        .route("/{order_id}/deliver", put(deliver_order))
        .nest("/{order_id}/items", items::router())
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(
        ("date" = Option<String>, Query, description = "Orders placed on this date (YYYY-MM-DD)"),
        ("status" = Option<i32>, Query, description = "Orders with this status code"),
        ("address" = Option<String>, Query, description = "Orders shipped to this address"),
        ("customer_id" = Option<i32>, Query, description = "Orders of this customer"),
    ),
    responses(
        (status = 200, description = "List orders, newest date first", body = [Order]),
        (status = 400, description = "Invalid filter value"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    query: Result<Query<OrderListQuery>, QueryRejection>,
) -> AppResult<Json<Vec<Order>>> {
    let Query(query) = query?;
    let orders = order_service::list_orders(&state, query).await?;
    Ok(Json(orders))
}

#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderRequest,
    responses(
        (status = 201, description = "Order created", body = Order),
        (status = 400, description = "The posted order data was not valid"),
        (status = 415, description = "Content-Type must be application/json"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<JsonBody<OrderRequest>, AppError>,
) -> AppResult<impl IntoResponse> {
    let JsonBody(payload) = body?;
    let order = order_service::create_order(&state, payload).await?;

    let location = format!("/api/orders/{}", order.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(order),
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/{order_id}",
    params(("order_id" = i32, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "The order", body = Order),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Order>> {
    let Path(order_id) = order_id?;
    let order = order_service::get_order(&state, order_id).await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{order_id}",
    params(("order_id" = i32, Path, description = "Order identifier")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 400, description = "The posted order data was not valid"),
        (status = 404, description = "Order not found"),
        (status = 415, description = "Content-Type must be application/json"),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
    body: Result<JsonBody<OrderRequest>, AppError>,
) -> AppResult<Json<Order>> {
    let Path(order_id) = order_id?;
    let payload = split_body(body)?;
    let order = order_service::update_order(&state, order_id, payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    delete,
    path = "/api/orders/{order_id}",
    params(("order_id" = i32, Path, description = "Order identifier")),
    responses((status = 204, description = "Order deleted")),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(order_id) = order_id?;
    order_service::delete_order(&state, order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/cancel",
    params(("order_id" = i32, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Cancelled order", body = Order),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is already cancelled"),
    ),
    tag = "Orders"
)]
pub async fn cancel_order(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Order>> {
    let Path(order_id) = order_id?;
    let order = order_service::cancel_order(&state, order_id).await?;
    Ok(Json(order))
}

#[utoipa::path(
    put,
    path = "/api/orders/{order_id}/deliver",
    params(("order_id" = i32, Path, description = "Order identifier")),
    responses(
        (status = 200, description = "Delivered order", body = Order),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is cancelled"),
    ),
    tag = "Orders"
)]
pub async fn deliver_order(
    State(state): State<AppState>,
    order_id: Result<Path<i32>, PathRejection>,
) -> AppResult<Json<Order>> {
    let Path(order_id) = order_id?;
    let order = order_service::deliver_order(&state, order_id).await?;
    Ok(Json(order))
}
