use crate::errors::code_error::{CodeError, CodeErrorResp};

pub async fn fallback_handler() -> CodeErrorResp {
    CodeError::PATH_NOT_FOUND.into()
}
