use chrono::{DateTime, Utc};
use lettre::message::{Mailbox, header::ContentType};

pub const SIGNUP_CODE_EMAIL: &str = include_str!("./signup_code.html");

pub struct SignupCodeEmail {
    pub email: String,
}

impl Default for SignupCodeEmail {
    fn default() -> Self {
        Self::new()
    }
}

impl SignupCodeEmail {
    pub fn new() -> Self {
        SignupCodeEmail {
            email: SIGNUP_CODE_EMAIL.to_string(),
        }
    }

    pub fn set_fields(mut self, code: &str, expires_at: DateTime<Utc>) -> Self {
        self.email = self
            .email
            .replace("$1", code)
            .replace("$2", &expires_at.format("%Y-%m-%d %H:%M:%S UTC").to_string());
        self
    }

    pub fn to_message(self, from: &Mailbox, user_email: &str) -> anyhow::Result<lettre::Message> {
        Ok(lettre::Message::builder()
            .from(from.clone())
            .to(user_email.parse::<Mailbox>()?)
            .subject("Your signup verification code")
            .header(ContentType::TEXT_HTML)
            .body(self.email)?)
    }
}
