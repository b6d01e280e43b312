use axum::Json;
use axum::extract::rejection::FormRejection;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use serde_derive::Serialize;
use std::error::Error;
use std::fmt;
use tracing::Level;

pub type HandlerResponse<T> = Result<T, CodeErrorResp>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeError {
    pub error_code: u16,
    pub http_status_code: StatusCode,
    pub message: &'static str,
    pub log_level: Level,
}

impl CodeError {
    // 0..: server faults
    pub const INTERNAL_ERROR: CodeError = CodeError {
        error_code: 0,
        http_status_code: StatusCode::INTERNAL_SERVER_ERROR,
        message: "Internal server error.",
        log_level: Level::ERROR,
    };
    pub const EMAIL_SEND_FAILED: CodeError = CodeError {
        error_code: 1,
        http_status_code: StatusCode::BAD_GATEWAY,
        message: "Could not send the verification code.",
        log_level: Level::ERROR,
    };

    // 100..: signup field validation
    pub const NAME_EMPTY: CodeError = CodeError {
        error_code: 100,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Name cannot be empty.",
        log_level: Level::INFO,
    };
    pub const NAME_TOO_LONG: CodeError = CodeError {
        error_code: 101,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Name is too long (maximum 255 characters).",
        log_level: Level::INFO,
    };
    pub const ORGANIZATION_EMPTY: CodeError = CodeError {
        error_code: 102,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Organization cannot be empty if provided.",
        log_level: Level::INFO,
    };
    pub const ORGANIZATION_TOO_LONG: CodeError = CodeError {
        error_code: 103,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Organization name is too long (maximum 255 characters).",
        log_level: Level::INFO,
    };
    pub const FORM_REJECTED: CodeError = CodeError {
        error_code: 104,
        http_status_code: StatusCode::UNPROCESSABLE_ENTITY,
        message: "Malformed form body.",
        log_level: Level::INFO,
    };

    // 200..: signup workflow
    pub const EMAIL_INVALID: CodeError = CodeError {
        error_code: 200,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Invalid email address.",
        log_level: Level::INFO,
    };
    pub const USER_ALREADY_EXISTS: CodeError = CodeError {
        error_code: 201,
        http_status_code: StatusCode::CONFLICT,
        message: "A user with this email already exists.",
        log_level: Level::INFO,
    };
    pub const CODE_RESEND_TOO_SOON: CodeError = CodeError {
        error_code: 202,
        http_status_code: StatusCode::TOO_MANY_REQUESTS,
        message: "A verification code was sent recently. Please wait before requesting another.",
        log_level: Level::WARN,
    };
    pub const CODE_INVALID: CodeError = CodeError {
        error_code: 203,
        http_status_code: StatusCode::BAD_REQUEST,
        message: "Invalid or expired verification code.",
        log_level: Level::WARN,
    };

    // 400..: routing
    pub const PATH_NOT_FOUND: CodeError = CodeError {
        error_code: 400,
        http_status_code: StatusCode::NOT_FOUND,
        message: "Invalid path!",
        log_level: Level::DEBUG,
    };
}

pub fn code_err(cerr: CodeError, e: impl Into<anyhow::Error>) -> CodeErrorResp {
    CodeErrorResp {
        error_code: cerr.error_code,
        http_status_code: cerr.http_status_code,
        message: cerr.message.to_string(),
        error_message: Some(e.into().to_string()),
        log_level: cerr.log_level,
    }
}

/// Wire form of every error: `{"detail": "<message>"}`.
///
/// Everything besides `detail` stays server-side; it is handed to the logging
/// middleware through `x-error-*` headers which that middleware strips.
#[derive(Serialize, Debug, utoipa::ToSchema)]
pub struct CodeErrorResp {
    #[serde(skip)]
    pub error_code: u16,
    #[serde(skip)]
    pub http_status_code: StatusCode,
    #[serde(rename = "detail")]
    pub message: String,
    #[serde(skip)]
    pub error_message: Option<String>,
    #[serde(skip)]
    pub log_level: Level,
}

impl From<CodeError> for CodeErrorResp {
    fn from(cerr: CodeError) -> Self {
        CodeErrorResp {
            error_code: cerr.error_code,
            http_status_code: cerr.http_status_code,
            message: cerr.message.to_string(),
            error_message: None,
            log_level: cerr.log_level,
        }
    }
}

impl From<FormRejection> for CodeErrorResp {
    fn from(rejection: FormRejection) -> Self {
        CodeErrorResp {
            error_code: CodeError::FORM_REJECTED.error_code,
            http_status_code: rejection.status(),
            message: rejection.body_text(),
            error_message: None,
            log_level: CodeError::FORM_REJECTED.log_level,
        }
    }
}

impl fmt::Display for CodeErrorResp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_message {
            Some(error_message) => write!(f, "{}: {}", self.message, error_message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl Error for CodeErrorResp {}

fn insert_header(headers: &mut HeaderMap, key: &'static str, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(key, value);
    }
}

impl IntoResponse for CodeErrorResp {
    fn into_response(self) -> axum::response::Response {
        let mut headers = HeaderMap::new();
        insert_header(&mut headers, "x-error-log-level", self.log_level.as_str());
        insert_header(
            &mut headers,
            "x-error-status-code",
            self.http_status_code.as_str(),
        );
        insert_header(&mut headers, "x-error-code", &self.error_code.to_string());
        insert_header(&mut headers, "x-error-message", &self.message);
        if let Some(error_message) = &self.error_message {
            insert_header(&mut headers, "x-error-detail", error_message);
        }

        (self.http_status_code, headers, Json(&self)).into_response()
    }
}
