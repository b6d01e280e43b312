use utoipa::ToSchema;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Form body of `POST /auth/signup/validate`.
#[derive(serde_derive::Deserialize, Zeroize, ZeroizeOnDrop, ToSchema)]
pub struct SignupValidateRequest {
    pub name: String,
    pub email: String,
    pub organization: Option<String>,
    pub code: String,
}
