use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::user::User;

#[derive(serde_derive::Serialize, ToSchema)]
pub struct SignupValidateResponse {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_organization: Option<String>,
    pub user_created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for SignupValidateResponse {
    fn from(user: User) -> Self {
        SignupValidateResponse {
            user_id: user.user_id,
            user_name: user.user_name,
            user_email: user.user_email,
            user_organization: user.user_organization,
            user_created_at: user.user_created_at,
        }
    }
}
