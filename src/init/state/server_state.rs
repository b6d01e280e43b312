use std::sync::atomic::AtomicU64;

use chrono::{DateTime, Utc};
use lettre::message::Mailbox;
use scc::hash_map::Entry;
use tracing::info;

use crate::domain::auth::signup_code::{PendingSignupCode, SignupCodePolicy};
use crate::domain::auth::user::User;
use crate::errors::code_error::CodeError;
use crate::util::crypto::signup_code::generate_signup_code;
use crate::util::email::mailer::Mailer;
use crate::util::string::validations::normalize_email;

use super::builder::ServerStateBuilder;
use super::deployment_environment::DeploymentEnvironment;

/// A freshly issued code, handed back to the signup handler for mailing.
pub struct IssuedSignupCode {
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

pub struct ServerState {
    pub(crate) app_name_version: String,
    pub(crate) server_start_time: tokio::time::Instant,
    pub(crate) responses_handled: AtomicU64,
    pub(crate) mailer: Mailer,
    pub(crate) mail_from: Mailbox,
    pub(crate) deployment_environment: DeploymentEnvironment,
    pub(crate) signup_code_policy: SignupCodePolicy,
    pub(crate) users: scc::HashMap<String, User>, // normalized email -> user
    pub(crate) pending_signup_codes: scc::HashMap<String, PendingSignupCode>, // normalized email -> code
}

impl ServerState {
    pub fn builder() -> ServerStateBuilder {
        ServerStateBuilder::default()
    }

    pub fn get_app_name_version(&self) -> String {
        self.app_name_version.clone()
    }

    pub fn get_uptime(&self) -> tokio::time::Duration {
        self.server_start_time.elapsed()
    }

    pub fn get_mailer(&self) -> &Mailer {
        &self.mailer
    }

    pub fn get_mail_from(&self) -> &Mailbox {
        &self.mail_from
    }

    pub fn get_deployment_environment(&self) -> DeploymentEnvironment {
        self.deployment_environment
    }

    pub fn get_responses_handled(&self) -> u64 {
        self.responses_handled
            .load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn add_responses_handled(&self) {
        self.responses_handled
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    pub async fn user_exists(&self, email: &str) -> bool {
        self.users
            .read_async(&normalize_email(email), |_, _| ())
            .await
            .is_some()
    }

    pub async fn insert_user(&self, user: User) -> Result<(), CodeError> {
        match self.users.entry_async(normalize_email(&user.user_email)).await {
            Entry::Occupied(_) => Err(CodeError::USER_ALREADY_EXISTS),
            Entry::Vacant(vac) => {
                vac.insert_entry(user);
                Ok(())
            }
        }
    }

    /// Generates and stores a new signup code for `email`, replacing any
    /// previous one unless it was issued within the resend cooldown.
    pub async fn issue_signup_code(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<IssuedSignupCode, CodeError> {
        let policy = &self.signup_code_policy;
        let code = generate_signup_code();
        let pending = PendingSignupCode::new(code.clone(), now, policy);
        let expires_at = pending.get_expires_at();

        match self.pending_signup_codes.entry_async(normalize_email(email)).await {
            Entry::Occupied(mut occ) => {
                if occ.get().blocks_resend(now, policy) {
                    return Err(CodeError::CODE_RESEND_TOO_SOON);
                }
                *occ.get_mut() = pending;
            }
            Entry::Vacant(vac) => {
                vac.insert_entry(pending);
            }
        }

        Ok(IssuedSignupCode { code, expires_at })
    }

    /// Drops the pending code for `email`, e.g. when it could not be delivered.
    pub async fn revoke_signup_code(&self, email: &str) {
        let _ = self
            .pending_signup_codes
            .remove_async(&normalize_email(email))
            .await;
    }

    /// Consumes the pending code for `email` if `submitted` matches it.
    ///
    /// Expired codes and codes that ran out of attempts are removed.
    pub async fn confirm_signup_code(
        &self,
        email: &str,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<(), CodeError> {
        let policy = &self.signup_code_policy;

        match self.pending_signup_codes.entry_async(normalize_email(email)).await {
            Entry::Vacant(_) => Err(CodeError::CODE_INVALID),
            Entry::Occupied(mut occ) => {
                if occ.get().is_expired(now) {
                    let _ = occ.remove();
                    return Err(CodeError::CODE_INVALID);
                }

                if occ.get().matches(submitted) {
                    let _ = occ.remove();
                    return Ok(());
                }

                if occ.get_mut().record_failed_attempt(policy) {
                    let _ = occ.remove();
                }
                Err(CodeError::CODE_INVALID)
            }
        }
    }

    pub async fn purge_expired_signup_codes(&self, now: DateTime<Utc>) -> usize {
        let before = self.pending_signup_codes.len();
        self.pending_signup_codes
            .retain_async(|_, pending| !pending.is_expired(now))
            .await;
        let purged = before.saturating_sub(self.pending_signup_codes.len());
        if purged > 0 {
            info!(purged, "Purged expired signup codes");
        }
        purged
    }
}

#[cfg(test)]
impl ServerState {
    pub async fn get_user(&self, email: &str) -> Option<User> {
        self.users
            .read_async(&normalize_email(email), |_, user| user.clone())
            .await
    }

    pub async fn get_pending_signup_code(&self, email: &str) -> Option<String> {
        self.pending_signup_codes
            .read_async(&normalize_email(email), |_, pending| {
                pending.get_code().to_owned()
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::string::validations::SignupFields;

    fn test_state(policy: SignupCodePolicy) -> ServerState {
        ServerState::builder()
            .app_name_version("signup-server-test".to_string())
            .server_start_time(tokio::time::Instant::now())
            .mailer(Mailer::stub())
            .mail_from("Signup <donotreply@example.com>".parse().unwrap())
            .deployment_environment(DeploymentEnvironment::Local)
            .signup_code_policy(policy)
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_issue_then_confirm() {
        let state = test_state(SignupCodePolicy::default());
        let now = Utc::now();

        let issued = state
            .issue_signup_code("Test@Example.com", now)
            .await
            .unwrap();
        assert_eq!(issued.expires_at, now + chrono::Duration::minutes(10));

        // key is case-insensitive
        state
            .confirm_signup_code("test@example.com", &issued.code, now)
            .await
            .unwrap();

        // consumed
        assert_eq!(
            state
                .confirm_signup_code("test@example.com", &issued.code, now)
                .await,
            Err(CodeError::CODE_INVALID)
        );
    }

    #[tokio::test]
    async fn test_resend_cooldown() {
        let state = test_state(SignupCodePolicy::default());
        let now = Utc::now();

        state.issue_signup_code("a@example.com", now).await.unwrap();
        assert_eq!(
            state
                .issue_signup_code("a@example.com", now + chrono::Duration::seconds(10))
                .await
                .err(),
            Some(CodeError::CODE_RESEND_TOO_SOON)
        );

        let reissued = state
            .issue_signup_code("a@example.com", now + chrono::Duration::seconds(61))
            .await
            .unwrap();
        assert_eq!(
            state.get_pending_signup_code("a@example.com").await,
            Some(reissued.code)
        );
    }

    #[tokio::test]
    async fn test_expired_code_is_rejected_and_removed() {
        let state = test_state(SignupCodePolicy::default());
        let now = Utc::now();

        let issued = state.issue_signup_code("a@example.com", now).await.unwrap();
        assert_eq!(
            state
                .confirm_signup_code("a@example.com", &issued.code, issued.expires_at)
                .await,
            Err(CodeError::CODE_INVALID)
        );
        assert!(state.get_pending_signup_code("a@example.com").await.is_none());
    }

    #[tokio::test]
    async fn test_code_is_dropped_after_max_attempts() {
        let state = test_state(SignupCodePolicy {
            max_attempts: 3,
            ..SignupCodePolicy::default()
        });
        let now = Utc::now();

        let issued = state.issue_signup_code("a@example.com", now).await.unwrap();
        let wrong = if issued.code == "000000" { "111111" } else { "000000" };

        for _ in 0..2 {
            assert_eq!(
                state.confirm_signup_code("a@example.com", wrong, now).await,
                Err(CodeError::CODE_INVALID)
            );
        }
        assert!(state.get_pending_signup_code("a@example.com").await.is_some());

        assert_eq!(
            state.confirm_signup_code("a@example.com", wrong, now).await,
            Err(CodeError::CODE_INVALID)
        );
        // the right code no longer helps
        assert_eq!(
            state
                .confirm_signup_code("a@example.com", &issued.code, now)
                .await,
            Err(CodeError::CODE_INVALID)
        );
    }

    #[tokio::test]
    async fn test_purge_expired_signup_codes() {
        let state = test_state(SignupCodePolicy::default());
        let now = Utc::now();

        state.issue_signup_code("old@example.com", now).await.unwrap();
        state
            .issue_signup_code("new@example.com", now + chrono::Duration::minutes(5))
            .await
            .unwrap();

        let purged = state
            .purge_expired_signup_codes(now + chrono::Duration::minutes(11))
            .await;
        assert_eq!(purged, 1);
        assert!(state.get_pending_signup_code("old@example.com").await.is_none());
        assert!(state.get_pending_signup_code("new@example.com").await.is_some());
    }

    #[tokio::test]
    async fn test_insert_user_is_unique_per_email() {
        let state = test_state(SignupCodePolicy::default());
        let fields = SignupFields {
            name: "Test User".to_string(),
            organization: None,
        };

        state
            .insert_user(User::new(fields.clone(), "test@example.com", Utc::now()))
            .await
            .unwrap();
        assert!(state.user_exists("TEST@example.com").await);
        assert_eq!(
            state
                .insert_user(User::new(fields, "Test@Example.com", Utc::now()))
                .await,
            Err(CodeError::USER_ALREADY_EXISTS)
        );
    }
}
