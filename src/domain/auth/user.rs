use chrono::{DateTime, Utc};
use serde_derive::Serialize;
use uuid::Uuid;

use crate::util::string::validations::SignupFields;

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub user_organization: Option<String>,
    pub user_created_at: DateTime<Utc>,
}

impl User {
    pub fn new(fields: SignupFields, user_email: &str, user_created_at: DateTime<Utc>) -> Self {
        User {
            user_id: Uuid::now_v7(),
            user_name: fields.name,
            user_email: user_email.trim().to_owned(),
            user_organization: fields.organization,
            user_created_at,
        }
    }
}
