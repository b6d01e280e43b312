//! OpenAPI documentation registration for Swagger UI.
//!
//! Important: Utoipa only exposes operations you list in `#[openapi(paths(...))]`.
//! Handler functions still need their own `#[utoipa::path(...)]` attributes.

use utoipa::OpenApi;

// ---- handlers (for `paths(...)`) ----
use crate::handlers::{
    auth::{signup, signup_validate},
    server::{healthcheck, root},
};

// ---- schemas (for `components(schemas(...))`) ----
use crate::dto::{
    requests::auth::{
        signup_request::SignupRequest, signup_validate_request::SignupValidateRequest,
    },
    responses::auth::{
        signup_response::SignupResponse, signup_validate_response::SignupValidateResponse,
    },
};
use crate::errors::code_error::CodeErrorResp;
use crate::handlers::server::{healthcheck::ServerHealthcheckResponse, root::RootHandlerResponse};

/// Central OpenAPI document for Swagger UI.
#[derive(OpenApi)]
#[openapi(
    paths(
        // --- server ---
        healthcheck::healthcheck,
        root::root_handler,

        // --- auth ---
        signup::signup_handler,
        signup_validate::signup_validate_handler,
    ),
    components(
        schemas(
            // shared error response
            CodeErrorResp,

            // --- server DTOs ---
            ServerHealthcheckResponse,
            RootHandlerResponse,

            // --- auth DTOs ---
            SignupRequest,
            SignupResponse,
            SignupValidateRequest,
            SignupValidateResponse,
        )
    ),
    tags(
        (name = "server", description = "Server status endpoints"),
        (name = "auth", description = "Signup endpoints")
    )
)]
pub struct ApiDoc;
