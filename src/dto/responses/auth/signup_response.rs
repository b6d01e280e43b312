use utoipa::ToSchema;

#[derive(serde_derive::Serialize, ToSchema)]
pub struct SignupResponse {
    pub user_email: String,
    pub code_expires_at: chrono::DateTime<chrono::Utc>,
}
