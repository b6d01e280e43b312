use anyhow::anyhow;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use super::config::AppConfig;
use super::state::DeploymentEnvironment;

const LOG_FILE_PREFIX: &str = "signup-server.log";

/// Installs the global subscriber. JSON lines in production, human-readable
/// text elsewhere. With `LOGS_DIR` set, output goes to a daily rolling file
/// instead of stdout; the returned guard must live as long as the process.
pub fn init_tracing(config: &AppConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let (writer, guard) = match &config.logs_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (BoxMakeWriter::new(non_blocking), Some(guard))
        }
        None => (BoxMakeWriter::new(std::io::stdout), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_ansi(config.logs_dir.is_none())
        .with_writer(writer);

    let result = match config.deployment_environment {
        DeploymentEnvironment::Prod => builder.json().try_init(),
        _ => builder.try_init(),
    };
    result.map_err(|e| anyhow!("Could not initialize tracing subscriber: {e}"))?;

    Ok(guard)
}
