use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::models::OrderStatus;

/// Body accepted by order create and update.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub date: NaiveDate,
    #[schema(value_type = i32)]
    pub status: OrderStatus,
    #[schema(value_type = f64)]
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub address: String,
    pub customer_id: i32,
}

impl OrderRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.amount.is_sign_negative() {
            return Err(AppError::BadRequest(format!(
                "amount must not be negative, got {}",
                self.amount
            )));
        }
        if self.address.chars().count() > 64 {
            return Err(AppError::BadRequest(
                "address must be at most 64 characters".to_string(),
            ));
        }
        Ok(())
    }
}
