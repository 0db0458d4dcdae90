use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

/// Order list filters. At most one is honored per request; see
/// `order_service::list_orders` for the precedence.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub date: Option<NaiveDate>,
    pub status: Option<i32>,
    pub address: Option<String>,
    pub customer_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ItemListQuery {
    #[schema(value_type = Option<f64>)]
    pub price: Option<Decimal>,
    pub quantity: Option<i32>,
}
