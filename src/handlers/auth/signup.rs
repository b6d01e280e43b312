use std::sync::Arc;

use axum::{Extension, extract::State, response::IntoResponse};
use chrono::{DateTime, Utc};
use tracing::info;

use crate::{
    dto::{
        requests::auth::signup_request::SignupRequest,
        responses::{auth::signup_response::SignupResponse, response_data::http_resp},
    },
    errors::code_error::{CodeError, CodeErrorResp, HandlerResponse, code_err},
    init::state::ServerState,
    util::{
        email::emails::SignupCodeEmail, extract::form::AppForm,
        string::validations::validate_signup_fields, time::now::tokio_now,
    },
};

#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body(content = SignupRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Verification code sent", body = SignupResponse),
        (status = 400, description = "Invalid email address", body = CodeErrorResp),
        (status = 409, description = "Email already registered", body = CodeErrorResp),
        (status = 422, description = "Invalid name or organization", body = CodeErrorResp),
        (status = 429, description = "Code requested again too soon", body = CodeErrorResp),
        (status = 502, description = "Verification email could not be sent", body = CodeErrorResp)
    )
)]
pub async fn signup_handler(
    Extension(request_received_time): Extension<DateTime<Utc>>,
    State(state): State<Arc<ServerState>>,
    AppForm(request): AppForm<SignupRequest>,
) -> HandlerResponse<impl IntoResponse> {
    let start = tokio_now();

    validate_signup_fields(&request.name, request.organization.as_deref())?;

    let user_email = request.email.trim();
    if !email_address::EmailAddress::is_valid(user_email) {
        return Err(CodeError::EMAIL_INVALID.into());
    }

    if state.user_exists(user_email).await {
        return Err(CodeError::USER_ALREADY_EXISTS.into());
    }

    let issued = state
        .issue_signup_code(user_email, request_received_time)
        .await?;

    let message = match SignupCodeEmail::new()
        .set_fields(&issued.code, issued.expires_at)
        .to_message(state.get_mail_from(), user_email)
    {
        Ok(message) => message,
        Err(e) => {
            state.revoke_signup_code(user_email).await;
            return Err(code_err(CodeError::INTERNAL_ERROR, e));
        }
    };

    // Sent inline so that a failed delivery is reported to the caller.
    if let Err(e) = state.get_mailer().send(message).await {
        state.revoke_signup_code(user_email).await;
        return Err(code_err(CodeError::EMAIL_SEND_FAILED, e));
    }

    if state.get_mailer().is_stub() {
        info!(user_email = %user_email, code = %issued.code, "Signup code issued (stub mailer).");
    }

    Ok(http_resp(
        SignupResponse {
            user_email: user_email.to_owned(),
            code_expires_at: issued.expires_at,
        },
        (),
        start,
    ))
}
