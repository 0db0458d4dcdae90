use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Order lifecycle, stored and transmitted as a bare integer:
/// 0 = cancelled, 1 = preparing, 2 = delivering, 3 = delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(try_from = "i32", into = "i32")]
pub enum OrderStatus {
    #[sea_orm(num_value = 0)]
    Cancelled,
    #[sea_orm(num_value = 1)]
    Preparing,
    #[sea_orm(num_value = 2)]
    Delivering,
    #[sea_orm(num_value = 3)]
    Delivered,
}

impl TryFrom<i32> for OrderStatus {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderStatus::Cancelled),
            1 => Ok(OrderStatus::Preparing),
            2 => Ok(OrderStatus::Delivering),
            3 => Ok(OrderStatus::Delivered),
            other => Err(format!(
                "status must be 0 (cancelled), 1 (preparing), 2 (delivering) or 3 (delivered), got {other}"
            )),
        }
    }
}

impl From<OrderStatus> for i32 {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Cancelled => 0,
            OrderStatus::Preparing => 1,
            OrderStatus::Delivering => 2,
            OrderStatus::Delivered => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i32,
    pub date: NaiveDate,
    #[schema(value_type = i32)]
    pub status: OrderStatus,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub address: String,
    pub customer_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub order_id: i32,
    pub product_id: i32,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
}

impl Item {
    /// Contribution of this line to the owning order's amount, or
    /// `None` when price times quantity leaves the decimal range.
    pub fn amount(&self) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(self.quantity))
    }
}
