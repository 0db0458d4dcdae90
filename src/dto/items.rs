use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// Body accepted by item create and update. The caller picks the
/// product id; the order id must match the one in the request path.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ItemRequest {
    pub order_id: i32,
    pub product_id: i32,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: i32,
}

impl ItemRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.price <= Decimal::ZERO {
            return Err(AppError::BadRequest(format!(
                "price must be positive, got {}",
                self.price
            )));
        }
        if self.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }
        Ok(())
    }
}
