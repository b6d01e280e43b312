use utoipa::ToSchema;

/// Form body of `POST /auth/signup`.
#[derive(serde_derive::Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    /// `None` when the field is not submitted at all.
    pub organization: Option<String>,
}
