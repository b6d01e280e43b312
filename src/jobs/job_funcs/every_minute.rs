use std::sync::Arc;

use anyhow::{Result, anyhow};
use chrono::{Timelike, Utc};
use tracing::{debug, error};

use crate::{init::state::ServerState, util::time::duration_formatter::format_dt_difference};

/// Next UTC time at `second_offset` seconds into a minute that is still after `now`.
pub fn next_scheduled_mark(
    now: chrono::DateTime<chrono::Utc>,
    second_offset: u32,
) -> Result<chrono::DateTime<chrono::Utc>> {
    let truncated_to_minute = now
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .ok_or_else(|| anyhow!("Could not truncate to minute."))?;

    let mut target_time = truncated_to_minute + chrono::Duration::seconds(second_offset as i64);

    if target_time <= now {
        target_time += chrono::Duration::seconds(60);
    }

    Ok(target_time)
}

/// A helper that returns both (delay, human-readable schedule message).
pub fn next_scheduled_delay(
    task_descriptor: &str,
    second_offset: u32,
) -> Result<(tokio::time::Duration, String)> {
    let now = Utc::now();
    let next_mark = next_scheduled_mark(now, second_offset)?;

    let schedule_msg = format!(
        "Task '{}' will run in {}",
        task_descriptor,
        format_dt_difference(now, next_mark)
    );

    let delay = (next_mark - now).to_std().map_err(|e| {
        anyhow!(
            "Could not schedule job at next_scheduled_mark(). Chrono->Std error: {:?}",
            e
        )
    })?;

    Ok((delay, schedule_msg))
}

/// Runs `task` once per minute, `second_offset` seconds into the minute.
pub async fn schedule_task_every_minute_at<F, Fut>(
    state: Arc<ServerState>,
    task: F,
    task_descriptor: String,
    second_offset: u32,
) where
    F: Fn(Arc<ServerState>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    loop {
        let (delay, schedule_message) = match next_scheduled_delay(&task_descriptor, second_offset)
        {
            Ok((d, m)) => (d, m),
            Err(e) => {
                error!(
                    "Could not calculate next scheduled time for {}: {:?}",
                    task_descriptor, e
                );
                tokio::time::sleep(std::time::Duration::from_secs(10)).await;
                continue;
            }
        };

        debug!("{}", schedule_message);

        tokio::time::sleep(delay).await;

        task(Arc::clone(&state)).await;
        debug!(task = %task_descriptor, "Scheduled task finished.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_next_scheduled_mark() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 10).unwrap();

        assert_eq!(
            next_scheduled_mark(now, 30).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 17, 12, 30, 30).unwrap()
        );
        // already past this minute's mark
        assert_eq!(
            next_scheduled_mark(now, 5).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 17, 12, 31, 5).unwrap()
        );
        assert_eq!(
            next_scheduled_mark(now, 10).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 17, 12, 31, 10).unwrap()
        );
    }
}
