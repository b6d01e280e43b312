use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    domain::auth::user::User,
    dto::{
        requests::auth::signup_validate_request::SignupValidateRequest,
        responses::{
            auth::signup_validate_response::SignupValidateResponse, response_data::http_resp,
        },
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse},
    init::state::ServerState,
    util::{
        extract::form::AppForm, string::validations::validate_signup_fields,
        time::now::tokio_now,
    },
};

#[utoipa::path(
    post,
    path = "/auth/signup/validate",
    tag = "auth",
    request_body(content = SignupValidateRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Code confirmed and user created", body = SignupValidateResponse),
        (status = 400, description = "Invalid email address or verification code", body = CodeErrorResp),
        (status = 409, description = "Email already registered", body = CodeErrorResp),
        (status = 422, description = "Invalid name or organization", body = CodeErrorResp)
    )
)]
pub async fn signup_validate_handler(
    Extension(request_received_time): Extension<DateTime<Utc>>,
    State(state): State<Arc<ServerState>>,
    AppForm(request): AppForm<SignupValidateRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    let fields = validate_signup_fields(&request.name, request.organization.as_deref())?;

    let user_email = request.email.trim();
    if !email_address::EmailAddress::is_valid(user_email) {
        return Err(CodeError::EMAIL_INVALID.into());
    }

    if state.user_exists(user_email).await {
        return Err(CodeError::USER_ALREADY_EXISTS.into());
    }

    state
        .confirm_signup_code(user_email, &request.code, request_received_time)
        .await?;

    let user = User::new(fields, user_email, request_received_time);
    state.insert_user(user.clone()).await?;

    info!(user_id = %user.user_id, user_email = %user.user_email, "User signed up.");

    Ok(http_resp(SignupValidateResponse::from(user), (), start))
}
