use rust_decimal::Decimal;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, QuerySelect, Set, SqlErr, TransactionTrait,
};

use crate::{
    dto::items::ItemRequest,
    entity::items::{
        ActiveModel as ItemActive, Column as ItemCol, Entity as Items, Model as ItemModel,
    },
    entity::orders::Entity as Orders,
    error::{AppError, AppResult},
    models::Item,
    routes::params::ItemListQuery,
    services::order_service,
    state::AppState,
};

fn order_not_found(order_id: i32) -> AppError {
    AppError::NotFound(format!("Order with id '{order_id}' could not be found."))
}

fn item_not_found(order_id: i32, product_id: i32) -> AppError {
    AppError::NotFound(format!(
        "Item with product id '{product_id}' could not be found in order '{order_id}'."
    ))
}

pub(crate) fn item_from_entity(model: ItemModel) -> Item {
    Item {
        order_id: model.order_id,
        product_id: model.product_id,
        price: model.price,
        quantity: model.quantity,
    }
}

/// Dispatches a list request to at most one finder; price takes
/// precedence over quantity. The order lookup runs before the query
/// result is inspected, so a missing order reports 404 even when a
/// filter value is bad.
pub async fn list_items(
    state: &AppState,
    order_id: i32,
    query: AppResult<ItemListQuery>,
) -> AppResult<Vec<Item>> {
    ensure_order_exists(&state.orm, order_id).await?;
    let query = query?;
    if let Some(price) = query.price {
        return find_by_price(state, order_id, price).await;
    }
    if let Some(quantity) = query.quantity {
        return find_by_quantity(state, order_id, quantity).await;
    }
    find_by_order_id(state, order_id).await
}

pub async fn find_by_order_id(state: &AppState, order_id: i32) -> AppResult<Vec<Item>> {
    collect(state, Condition::all().add(ItemCol::OrderId.eq(order_id))).await
}

pub async fn find_by_price(
    state: &AppState,
    order_id: i32,
    price: Decimal,
) -> AppResult<Vec<Item>> {
    collect(
        state,
        Condition::all()
            .add(ItemCol::OrderId.eq(order_id))
            .add(ItemCol::Price.eq(price)),
    )
    .await
}

pub async fn find_by_quantity(
    state: &AppState,
    order_id: i32,
    quantity: i32,
) -> AppResult<Vec<Item>> {
    collect(
        state,
        Condition::all()
            .add(ItemCol::OrderId.eq(order_id))
            .add(ItemCol::Quantity.eq(quantity)),
    )
    .await
}

async fn collect(state: &AppState, condition: Condition) -> AppResult<Vec<Item>> {
    let items = Items::find().filter(condition).all(&state.orm).await?;
    Ok(items.into_iter().map(item_from_entity).collect())
}

pub async fn get_item(state: &AppState, order_id: i32, product_id: i32) -> AppResult<Item> {
    let item = Items::find_by_id((order_id, product_id))
        .one(&state.orm)
        .await?
        .ok_or_else(|| item_not_found(order_id, product_id))?;
    Ok(item_from_entity(item))
}

/// Inserts an item under the order and refreshes the order amount in
/// the same transaction. The order lookup runs before the body result
/// is inspected, so a missing order reports 404 even when the body is
/// bad. A duplicate (order_id, product_id) pair is a validation error.
pub async fn create_item(
    state: &AppState,
    order_id: i32,
    payload: AppResult<ItemRequest>,
) -> AppResult<Item> {
    let txn = state.orm.begin().await?;
    lock_order(&txn, order_id).await?;
    let payload = payload?;
    payload.validate()?;
    if payload.order_id != order_id {
        return Err(AppError::BadRequest(format!(
            "body order_id '{}' does not match the order '{order_id}' in the path",
            payload.order_id
        )));
    }

    let item = ItemActive {
        order_id: Set(order_id),
        product_id: Set(payload.product_id),
        price: Set(payload.price),
        quantity: Set(payload.quantity),
    }
    .insert(&txn)
    .await
    .map_err(|err| duplicate_to_bad_request(err, order_id, payload.product_id))?;

    recompute_amount(&txn, order_id).await?;
    txn.commit().await?;

    tracing::info!(order_id, product_id = item.product_id, "item created");
    Ok(item_from_entity(item))
}

pub async fn update_item(
    state: &AppState,
    order_id: i32,
    product_id: i32,
    payload: AppResult<ItemRequest>,
) -> AppResult<Item> {
    let txn = state.orm.begin().await?;
    lock_order(&txn, order_id).await?;
    let existing = Items::find_by_id((order_id, product_id))
        .one(&txn)
        .await?
        .ok_or_else(|| item_not_found(order_id, product_id))?;
    let payload = payload?;
    payload.validate()?;
    if payload.order_id != order_id || payload.product_id != product_id {
        return Err(AppError::BadRequest(
            "body ids must match the item addressed by the path".to_string(),
        ));
    }

    let mut active: ItemActive = existing.into();
    active.price = Set(payload.price);
    active.quantity = Set(payload.quantity);
    let item = active.update(&txn).await?;

    recompute_amount(&txn, order_id).await?;
    txn.commit().await?;

    tracing::info!(order_id, product_id, "item updated");
    Ok(item_from_entity(item))
}

/// Deleting an absent item, or an item of an absent order, succeeds
/// without touching anything.
pub async fn delete_item(state: &AppState, order_id: i32, product_id: i32) -> AppResult<()> {
    let txn = state.orm.begin().await?;
    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let Some(order) = order else {
        return Ok(());
    };

    let result = Items::delete_by_id((order_id, product_id)).exec(&txn).await?;
    if result.rows_affected > 0 {
        recompute_amount(&txn, order.id).await?;
    }
    txn.commit().await?;

    tracing::info!(order_id, product_id, rows = result.rows_affected, "item deleted");
    Ok(())
}

async fn ensure_order_exists<C>(conn: &C, order_id: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    Orders::find_by_id(order_id)
        .one(conn)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    Ok(())
}

async fn lock_order(txn: &DatabaseTransaction, order_id: i32) -> AppResult<()> {
    Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| order_not_found(order_id))?;
    Ok(())
}

/// Recomputes the order amount from the surviving items. Must run
/// inside the transaction that already holds the order row lock.
/// A total past the decimal range is a validation error, so the
/// mutation that caused it rolls back instead of panicking.
async fn recompute_amount(txn: &DatabaseTransaction, order_id: i32) -> AppResult<()> {
    let items = Items::find()
        .filter(ItemCol::OrderId.eq(order_id))
        .all(txn)
        .await?;
    let total = items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| {
            item.price
                .checked_mul(Decimal::from(item.quantity))
                .and_then(|line| total.checked_add(line))
        })
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Amount of order '{order_id}' exceeds the supported numeric range."
            ))
        })?;
    order_service::update_amount(txn, order_id, total).await
}

fn duplicate_to_bad_request(err: DbErr, order_id: i32, product_id: i32) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::BadRequest(format!(
            "Item with product id '{product_id}' already exists in order '{order_id}'."
        )),
        _ => AppError::Database(err),
    }
}
