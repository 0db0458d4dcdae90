use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::error::{AppError, AppResult};

/// JSON body extractor whose rejection is an [`AppError`], so a missing
/// or wrong `Content-Type` turns into 415 and a malformed body into 400
/// instead of axum's plain-text rejections.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonBody(value))
    }
}

/// Splits a buffered body result into two stages. A media type problem
/// is reported right away; a parse or validation problem is deferred so
/// the handler can resolve the path id first and report 404 for a
/// missing record even when the body is bad.
pub fn split_body<T>(body: Result<JsonBody<T>, AppError>) -> AppResult<AppResult<T>> {
    match body {
        Ok(JsonBody(value)) => Ok(Ok(value)),
        Err(err @ AppError::UnsupportedMediaType(_)) => Err(err),
        Err(err) => Ok(Err(err)),
    }
}
