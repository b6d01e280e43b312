use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::jobs::job_funcs::init_scheduler::task_init;
use crate::routers::main_router::build_router;
use crate::util::email::mailer::Mailer;

use super::config::{AppConfig, EmailConfig};
use super::state::ServerState;

pub async fn server_init_proc(start: tokio::time::Instant, config: AppConfig) -> anyhow::Result<()> {
    let mailer = match EmailConfig::from_env() {
        Ok(email_config) => Mailer::smtp(&email_config)?,
        Err(e) if config.deployment_environment.allows_stub_mailer() => {
            warn!(error = %e, "SMTP is not configured; signup codes go to the in-memory stub mailer.");
            Mailer::stub()
        }
        Err(e) => return Err(e),
    };

    let state = Arc::new(
        ServerState::builder()
            .app_name_version(format!(
                "{} v{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .server_start_time(start)
            .mailer(mailer)
            .mail_from(config.mail_from.clone())
            .deployment_environment(config.deployment_environment)
            .signup_code_policy(config.signup_code_policy)
            .build()?,
    );

    task_init(Arc::clone(&state)).await?;

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(
        addr = %addr,
        app = %state.get_app_name_version(),
        elapsed = ?start.elapsed(),
        "Backend server starting..."
    );
    axum::serve(
        listener,
        build_router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Backend server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Could not install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Could not install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received.");
}
