use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const DEFAULT_SIGNUP_CODE_TTL: chrono::Duration = chrono::Duration::minutes(10);
pub const DEFAULT_SIGNUP_CODE_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_SIGNUP_CODE_RESEND_COOLDOWN: chrono::Duration = chrono::Duration::seconds(60);
pub const MAX_SIGNUP_CODE_WINDOW_SECS: i64 = 60 * 60 * 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignupCodePolicy {
    pub ttl: chrono::Duration,
    pub max_attempts: u32,
    pub resend_cooldown: chrono::Duration,
}

impl Default for SignupCodePolicy {
    fn default() -> Self {
        SignupCodePolicy {
            ttl: DEFAULT_SIGNUP_CODE_TTL,
            max_attempts: DEFAULT_SIGNUP_CODE_MAX_ATTEMPTS,
            resend_cooldown: DEFAULT_SIGNUP_CODE_RESEND_COOLDOWN,
        }
    }
}

/// A verification code waiting to be confirmed by `/auth/signup/validate`.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct PendingSignupCode {
    code: String,
    #[zeroize(skip)]
    issued_at: DateTime<Utc>,
    #[zeroize(skip)]
    expires_at: DateTime<Utc>,
    failed_attempts: u32,
}

impl PendingSignupCode {
    pub fn new(code: String, issued_at: DateTime<Utc>, policy: &SignupCodePolicy) -> Self {
        PendingSignupCode {
            code,
            issued_at,
            expires_at: issued_at
                .checked_add_signed(policy.ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
            failed_attempts: 0,
        }
    }

    pub fn get_expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn blocks_resend(&self, now: DateTime<Utc>, policy: &SignupCodePolicy) -> bool {
        let cooldown_ends = self
            .issued_at
            .checked_add_signed(policy.resend_cooldown)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        !self.is_expired(now) && now < cooldown_ends
    }

    /// Compares without short-circuiting on the first differing byte.
    pub fn matches(&self, submitted: &str) -> bool {
        let expected = self.code.as_bytes();
        let submitted = submitted.trim().as_bytes();
        if expected.len() != submitted.len() {
            return false;
        }
        expected
            .iter()
            .zip(submitted)
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }

    /// Records a wrong guess. Returns `true` once the code is used up.
    pub fn record_failed_attempt(&mut self, policy: &SignupCodePolicy) -> bool {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.failed_attempts >= policy.max_attempts
    }
}

#[cfg(test)]
impl PendingSignupCode {
    pub fn get_code(&self) -> &str {
        &self.code
    }

    pub fn get_failed_attempts(&self) -> u32 {
        self.failed_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(now: DateTime<Utc>) -> PendingSignupCode {
        PendingSignupCode::new("123456".to_string(), now, &SignupCodePolicy::default())
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let code = pending(now);
        assert_eq!(code.get_expires_at(), now + DEFAULT_SIGNUP_CODE_TTL);
        assert!(!code.is_expired(now + chrono::Duration::minutes(9)));
        assert!(code.is_expired(now + chrono::Duration::minutes(10)));
    }

    #[test]
    fn test_out_of_range_policy_saturates() {
        let policy = SignupCodePolicy {
            ttl: chrono::Duration::MAX,
            max_attempts: 1,
            resend_cooldown: chrono::Duration::MAX,
        };
        let now = Utc::now();
        let code = PendingSignupCode::new("123456".to_string(), now, &policy);
        assert_eq!(code.get_expires_at(), DateTime::<Utc>::MAX_UTC);
        assert!(!code.is_expired(now));
        assert!(code.blocks_resend(now, &policy));
    }

    #[test]
    fn test_matches() {
        let code = pending(Utc::now());
        assert!(code.matches("123456"));
        assert!(code.matches(" 123456\n"));
        assert!(!code.matches("123457"));
        assert!(!code.matches("12345"));
        assert!(!code.matches(""));
    }

    #[test]
    fn test_resend_cooldown() {
        let policy = SignupCodePolicy::default();
        let now = Utc::now();
        let code = pending(now);
        assert!(code.blocks_resend(now + chrono::Duration::seconds(30), &policy));
        assert!(!code.blocks_resend(now + chrono::Duration::seconds(60), &policy));
    }

    #[test]
    fn test_attempts_run_out() {
        let policy = SignupCodePolicy {
            max_attempts: 2,
            ..SignupCodePolicy::default()
        };
        let mut code = pending(Utc::now());
        assert!(!code.record_failed_attempt(&policy));
        assert!(code.record_failed_attempt(&policy));
        assert_eq!(code.get_failed_attempts(), 2);
    }
}
