use std::sync::atomic::AtomicU64;

use lettre::message::Mailbox;

use crate::domain::auth::signup_code::SignupCodePolicy;
use crate::util::email::mailer::Mailer;

use super::deployment_environment::DeploymentEnvironment;
use super::server_state::ServerState;

#[derive(Default)]
pub struct ServerStateBuilder {
    app_name_version: Option<String>,
    server_start_time: Option<tokio::time::Instant>,
    mailer: Option<Mailer>,
    mail_from: Option<Mailbox>,
    deployment_environment: Option<DeploymentEnvironment>,
    signup_code_policy: Option<SignupCodePolicy>,
}

impl ServerStateBuilder {
    pub fn app_name_version(mut self, app_name_version: String) -> Self {
        self.app_name_version = Some(app_name_version);
        self
    }

    pub fn server_start_time(mut self, server_start_time: tokio::time::Instant) -> Self {
        self.server_start_time = Some(server_start_time);
        self
    }

    pub fn mailer(mut self, mailer: Mailer) -> Self {
        self.mailer = Some(mailer);
        self
    }

    pub fn mail_from(mut self, mail_from: Mailbox) -> Self {
        self.mail_from = Some(mail_from);
        self
    }

    pub fn deployment_environment(mut self, deployment_environment: DeploymentEnvironment) -> Self {
        self.deployment_environment = Some(deployment_environment);
        self
    }

    pub fn signup_code_policy(mut self, signup_code_policy: SignupCodePolicy) -> Self {
        self.signup_code_policy = Some(signup_code_policy);
        self
    }

    pub fn build(self) -> anyhow::Result<ServerState> {
        Ok(ServerState {
            app_name_version: self
                .app_name_version
                .ok_or_else(|| anyhow::anyhow!("app_name_version is required"))?,
            server_start_time: self
                .server_start_time
                .ok_or_else(|| anyhow::anyhow!("server_start_time is required"))?,
            responses_handled: AtomicU64::new(0u64),
            mailer: self
                .mailer
                .ok_or_else(|| anyhow::anyhow!("mailer is required"))?,
            mail_from: self
                .mail_from
                .ok_or_else(|| anyhow::anyhow!("mail_from is required"))?,
            deployment_environment: self
                .deployment_environment
                .unwrap_or(DeploymentEnvironment::Prod),
            signup_code_policy: self.signup_code_policy.unwrap_or_default(),
            users: scc::HashMap::new(),
            pending_signup_codes: scc::HashMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_mailer() {
        let result = ServerState::builder()
            .app_name_version("signup-server-test".to_string())
            .server_start_time(tokio::time::Instant::now())
            .mail_from("Signup <donotreply@example.com>".parse().unwrap())
            .build();
        assert!(result.is_err());
    }
}
