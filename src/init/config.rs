use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;

use anyhow::anyhow;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use tracing::Level;

use crate::domain::auth::signup_code::{MAX_SIGNUP_CODE_WINDOW_SECS, SignupCodePolicy};

use super::state::deployment_environment::DeploymentEnvironment;

const DEFAULT_MAIL_FROM: &str = "Signup <donotreply@localhost>";

pub struct AppConfig {
    pub host_ip: IpAddr,
    pub host_port: u16,
    pub deployment_environment: DeploymentEnvironment,
    pub log_level: Level,
    pub logs_dir: Option<String>,
    pub mail_from: Mailbox,
    pub signup_code_policy: SignupCodePolicy,
}

fn parse_or<T>(
    source: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match source(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("Environment variable {key} is invalid: {e}")),
        _ => Ok(default),
    }
}

/// Reads a whole-second window in `min..=MAX_SIGNUP_CODE_WINDOW_SECS`.
fn parse_window_secs(
    source: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: chrono::Duration,
    min: i64,
) -> anyhow::Result<chrono::Duration> {
    let secs = parse_or(source, key, default.num_seconds())?;
    if !(min..=MAX_SIGNUP_CODE_WINDOW_SECS).contains(&secs) {
        return Err(anyhow!(
            "Environment variable {key} must be between {min} and {MAX_SIGNUP_CODE_WINDOW_SECS} seconds"
        ));
    }
    chrono::Duration::try_seconds(secs)
        .ok_or_else(|| anyhow!("Environment variable {key} is out of range"))
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    pub fn from_source(source: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = SignupCodePolicy::default();

        let signup_code_policy = SignupCodePolicy {
            ttl: parse_window_secs(&source, "SIGNUP_CODE_TTL_SECS", defaults.ttl, 1)?,
            max_attempts: parse_or(&source, "SIGNUP_CODE_MAX_ATTEMPTS", defaults.max_attempts)?,
            resend_cooldown: parse_window_secs(
                &source,
                "SIGNUP_CODE_RESEND_COOLDOWN_SECS",
                defaults.resend_cooldown,
                0,
            )?,
        };

        if signup_code_policy.max_attempts == 0 {
            return Err(anyhow!("SIGNUP_CODE_MAX_ATTEMPTS must be at least 1"));
        }

        let mail_from = source("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string());
        let mail_from = mail_from
            .parse::<Mailbox>()
            .map_err(|e| anyhow!("Environment variable MAIL_FROM is invalid: {e}"))?;

        Ok(AppConfig {
            host_ip: parse_or(&source, "HOST_IP", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?,
            host_port: parse_or(&source, "HOST_PORT", 3000u16)?,
            deployment_environment: DeploymentEnvironment::from_env_value(
                source("CURR_ENV").as_deref(),
            ),
            log_level: parse_or(&source, "LOG_LEVEL", Level::INFO)?,
            logs_dir: source("LOGS_DIR").filter(|dir| !dir.trim().is_empty()),
            mail_from,
            signup_code_policy,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host_ip, self.host_port)
    }
}

pub struct EmailConfig {
    smtp_url: String,
    smtp_username: String,
    smtp_password: String,
}

impl EmailConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let smtp_url = std::env::var("AWS_SES_SMTP_URL")
            .map_err(|_| anyhow!("Environment variable AWS_SES_SMTP_URL not found"))?;
        let smtp_username = std::env::var("AWS_SES_SMTP_USERNAME")
            .map_err(|_| anyhow!("Environment variable AWS_SES_SMTP_USERNAME not found"))?;
        let smtp_password = std::env::var("AWS_SES_SMTP_ACCESS_KEY")
            .map_err(|_| anyhow!("Environment variable AWS_SES_SMTP_ACCESS_KEY not found"))?;

        Ok(EmailConfig {
            smtp_url,
            smtp_username,
            smtp_password,
        })
    }

    pub fn to_creds(&self) -> Credentials {
        Credentials::new(self.smtp_username.clone(), self.smtp_password.clone())
    }

    pub fn get_url(&self) -> String {
        self.smtp_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_source(move |key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
        assert_eq!(config.deployment_environment, DeploymentEnvironment::Prod);
        assert_eq!(config.log_level, Level::INFO);
        assert!(config.logs_dir.is_none());
        assert_eq!(config.signup_code_policy.ttl, chrono::Duration::minutes(10));
        assert_eq!(config.signup_code_policy.max_attempts, 5);
        assert_eq!(
            config.signup_code_policy.resend_cooldown,
            chrono::Duration::seconds(60)
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST_IP", "127.0.0.1"),
            ("HOST_PORT", "8080"),
            ("CURR_ENV", "dev"),
            ("LOG_LEVEL", "debug"),
            ("SIGNUP_CODE_TTL_SECS", "120"),
            ("SIGNUP_CODE_MAX_ATTEMPTS", "3"),
            ("SIGNUP_CODE_RESEND_COOLDOWN_SECS", "0"),
            ("MAIL_FROM", "Team <team@example.com>"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.deployment_environment, DeploymentEnvironment::Dev);
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.signup_code_policy.ttl, chrono::Duration::seconds(120));
        assert_eq!(config.signup_code_policy.max_attempts, 3);
        assert_eq!(config.signup_code_policy.resend_cooldown, chrono::Duration::zero());
        assert_eq!(config.mail_from.email.to_string(), "team@example.com");
    }

    #[test]
    fn test_window_upper_bound_is_inclusive() {
        let config = config_from(&[
            ("SIGNUP_CODE_TTL_SECS", "86400"),
            ("SIGNUP_CODE_RESEND_COOLDOWN_SECS", "86400"),
        ])
        .unwrap();
        assert_eq!(config.signup_code_policy.ttl, chrono::Duration::days(1));
        assert_eq!(config.signup_code_policy.resend_cooldown, chrono::Duration::days(1));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(config_from(&[("HOST_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("SIGNUP_CODE_TTL_SECS", "0")]).is_err());
        assert!(config_from(&[("SIGNUP_CODE_TTL_SECS", "-5")]).is_err());
        assert!(config_from(&[("SIGNUP_CODE_TTL_SECS", "9000000000000")]).is_err());
        assert!(config_from(&[("SIGNUP_CODE_TTL_SECS", "86401")]).is_err());
        assert!(config_from(&[("SIGNUP_CODE_RESEND_COOLDOWN_SECS", "-1")]).is_err());
        let huge = i64::MAX.to_string();
        assert!(config_from(&[("SIGNUP_CODE_RESEND_COOLDOWN_SECS", huge.as_str())]).is_err());
        assert!(config_from(&[("SIGNUP_CODE_MAX_ATTEMPTS", "0")]).is_err());
        assert!(config_from(&[("MAIL_FROM", "nobody")]).is_err());
    }
}
