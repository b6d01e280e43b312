use axum::extract::FromRequest;

use crate::errors::code_error::CodeErrorResp;

/// `axum::Form` whose rejections use the regular `{"detail": ...}` error body.
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(CodeErrorResp))]
pub struct AppForm<T>(pub T);
