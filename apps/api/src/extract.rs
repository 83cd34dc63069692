use axum::extract::FromRequest;

use crate::errors::AppError;

/// `Json` whose rejections (bad syntax, wrong types, missing content type)
/// come back as a `VALIDATION_ERROR` body instead of axum's plain text.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
