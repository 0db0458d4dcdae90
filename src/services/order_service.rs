use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::{
    dto::orders::OrderRequest,
    entity::orders::{
        ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
    },
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
    routes::params::OrderListQuery,
    state::AppState,
};

fn not_found(id: i32) -> AppError {
    AppError::NotFound(format!("Order with id '{id}' could not be found."))
}

pub(crate) fn order_from_entity(model: OrderModel) -> Order {
    Order {
        id: model.id,
        date: model.date,
        status: model.status,
        amount: model.amount,
        address: model.address,
        customer_id: model.customer_id,
    }
}

/// Dispatches a list request to at most one finder. Precedence when
/// several filters are supplied: date, then status, then address, then
/// customer_id. A status filter is additionally scoped to customer_id
/// when both are present.
pub async fn list_orders(state: &AppState, query: OrderListQuery) -> AppResult<Vec<Order>> {
    if let Some(date) = query.date {
        return find_by_date(state, date).await;
    }
    if let Some(raw) = query.status {
        let status = OrderStatus::try_from(raw).map_err(AppError::BadRequest)?;
        return find_by_status(state, query.customer_id, status).await;
    }
    if let Some(address) = query.address.as_deref().filter(|a| !a.is_empty()) {
        return find_by_address(state, address).await;
    }
    if let Some(customer_id) = query.customer_id {
        return find_by_customer_id(state, customer_id).await;
    }
    all_orders(state).await
}

pub async fn all_orders(state: &AppState) -> AppResult<Vec<Order>> {
    collect(state, Condition::all()).await
}

pub async fn find_by_date(state: &AppState, date: NaiveDate) -> AppResult<Vec<Order>> {
    collect(state, Condition::all().add(OrderCol::Date.eq(date))).await
}

pub async fn find_by_address(state: &AppState, address: &str) -> AppResult<Vec<Order>> {
    collect(state, Condition::all().add(OrderCol::Address.eq(address))).await
}

pub async fn find_by_customer_id(state: &AppState, customer_id: i32) -> AppResult<Vec<Order>> {
    collect(
        state,
        Condition::all().add(OrderCol::CustomerId.eq(customer_id)),
    )
    .await
}

pub async fn find_by_status(
    state: &AppState,
    customer_id: Option<i32>,
    status: OrderStatus,
) -> AppResult<Vec<Order>> {
    let mut condition = Condition::all().add(OrderCol::Status.eq(status));
    if let Some(customer_id) = customer_id {
        condition = condition.add(OrderCol::CustomerId.eq(customer_id));
    }
    collect(state, condition).await
}

pub async fn find_by_amount(state: &AppState, amount: Decimal) -> AppResult<Vec<Order>> {
    collect(state, Condition::all().add(OrderCol::Amount.eq(amount))).await
}

// Listings always come back newest order date first.
async fn collect(state: &AppState, condition: Condition) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::Date)
        .all(&state.orm)
        .await?;
    Ok(orders.into_iter().map(order_from_entity).collect())
}

pub async fn get_order(state: &AppState, id: i32) -> AppResult<Order> {
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(order_from_entity(order))
}

pub async fn create_order(state: &AppState, payload: OrderRequest) -> AppResult<Order> {
    payload.validate()?;
    let order = OrderActive {
        id: NotSet,
        date: Set(payload.date),
        status: Set(payload.status),
        amount: Set(payload.amount),
        address: Set(payload.address),
        customer_id: Set(payload.customer_id),
    }
    .insert(&state.orm)
    .await?;

    tracing::info!(order_id = order.id, "order created");
    Ok(order_from_entity(order))
}

/// Full-document update. The lookup runs before the body result is
/// inspected, so a missing order reports 404 even when the body is bad.
pub async fn update_order(
    state: &AppState,
    id: i32,
    payload: AppResult<OrderRequest>,
) -> AppResult<Order> {
    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or_else(|| not_found(id))?;
    let payload = payload?;
    payload.validate()?;

    let mut active: OrderActive = existing.into();
    active.date = Set(payload.date);
    active.status = Set(payload.status);
    active.amount = Set(payload.amount);
    active.address = Set(payload.address);
    active.customer_id = Set(payload.customer_id);
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = order.id, "order updated");
    Ok(order_from_entity(order))
}

/// Deleting an absent order succeeds; attached items go with the order
/// through the cascading foreign key.
pub async fn delete_order(state: &AppState, id: i32) -> AppResult<()> {
    let result = Orders::delete_by_id(id).exec(&state.orm).await?;
    tracing::info!(order_id = id, rows = result.rows_affected, "order deleted");
    Ok(())
}

pub async fn cancel_order(state: &AppState, id: i32) -> AppResult<Order> {
    let txn = state.orm.begin().await?;
    let order = find_for_update(&txn, id).await?;
    if order.status == OrderStatus::Cancelled {
        return Err(AppError::Conflict(format!(
            "Order with id '{id}' is already cancelled."
        )));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Cancelled);
    let order = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_id = id, "order cancelled");
    Ok(order_from_entity(order))
}

pub async fn deliver_order(state: &AppState, id: i32) -> AppResult<Order> {
    let txn = state.orm.begin().await?;
    let order = find_for_update(&txn, id).await?;
    if order.status == OrderStatus::Cancelled {
        return Err(AppError::Conflict(format!(
            "Order with id '{id}' is cancelled and cannot be delivered."
        )));
    }

    let mut active: OrderActive = order.into();
    active.status = Set(OrderStatus::Delivered);
    let order = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(order_id = id, "order delivered");
    Ok(order_from_entity(order))
}

// Row lock so concurrent transitions and item mutations serialize on
// the order. Dropping the transaction without commit rolls back.
async fn find_for_update(txn: &DatabaseTransaction, id: i32) -> AppResult<OrderModel> {
    Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| not_found(id))
}

/// Writes the amount column directly, without loading the entity.
pub async fn update_amount<C>(conn: &C, order_id: i32, amount: Decimal) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let result = Orders::update_many()
        .col_expr(OrderCol::Amount, Expr::value(amount))
        .filter(OrderCol::Id.eq(order_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(not_found(order_id));
    }
    Ok(())
}
