use lettre::transport::stub::AsyncStubTransport;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::init::config::EmailConfig;

/// Outbound mail transport. `Stub` keeps messages in memory and is used for
/// local runs without SMTP credentials and in tests.
pub enum Mailer {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    Stub(AsyncStubTransport),
}

impl Mailer {
    pub fn smtp(config: &EmailConfig) -> anyhow::Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.get_url())?
            .credentials(config.to_creds())
            .build();
        Ok(Mailer::Smtp(transport))
    }

    pub fn stub() -> Self {
        Mailer::Stub(AsyncStubTransport::new_ok())
    }

    pub async fn send(&self, message: Message) -> anyhow::Result<()> {
        match self {
            Mailer::Smtp(transport) => {
                transport.send(message).await?;
            }
            Mailer::Stub(transport) => {
                transport.send(message).await?;
            }
        }
        Ok(())
    }

    pub fn is_stub(&self) -> bool {
        matches!(self, Mailer::Stub(_))
    }
}
