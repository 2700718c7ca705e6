//! Daily retention sweep.
//!
//! A single spawned task sleeps until the configured UTC hour, runs the
//! cleanup, and repeats. Runs are sequential by construction, so a slow
//! sweep can never overlap the next one.

use time::{Duration, OffsetDateTime, Time};
use tracing::{error, info};

use crate::state::AppState;

use super::service;

/// Time left until the next occurrence of `hour_utc:00:00`, strictly in the
/// future and never more than 24 hours away.
pub fn next_run_delay(now: OffsetDateTime, hour_utc: u8) -> std::time::Duration {
    let run_time = Time::from_hms(hour_utc, 0, 0).unwrap_or(Time::MIDNIGHT);
    let today = now.replace_time(run_time);
    let next = if today > now {
        today
    } else {
        today + Duration::days(1)
    };
    (next - now).unsigned_abs()
}

pub async fn run(state: AppState) {
    let hour_utc = state.config.cleanup.hour_utc;
    let threshold_days = state.config.cleanup.threshold_days;
    info!(hour_utc, threshold_days, "cleanup scheduler started");

    loop {
        let delay = next_run_delay(OffsetDateTime::now_utc(), hour_utc);
        info!(secs = delay.as_secs(), "next cleanup scheduled");
        tokio::time::sleep(delay).await;

        match service::run_cleanup(&state.db, threshold_days).await {
            Ok(deleted) => info!(deleted, "scheduled cleanup finished"),
            Err(e) => error!(error = %e, "scheduled cleanup failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn lands_on_the_configured_hour() {
        let now = datetime!(2024-05-10 14:30:00 UTC);
        let delay = next_run_delay(now, 3);
        let next = now + Duration::try_from(delay).unwrap();
        assert_eq!(next, datetime!(2024-05-11 03:00:00 UTC));
    }

    #[test]
    fn same_day_when_hour_is_still_ahead() {
        let now = datetime!(2024-05-10 01:15:00 UTC);
        let delay = next_run_delay(now, 3);
        let next = now + Duration::try_from(delay).unwrap();
        assert_eq!(next, datetime!(2024-05-10 03:00:00 UTC));
    }

    #[test]
    fn exactly_on_the_hour_waits_a_full_day() {
        let now = datetime!(2024-05-10 03:00:00 UTC);
        let delay = next_run_delay(now, 3);
        assert_eq!(delay, std::time::Duration::from_secs(24 * 3600));
    }

    #[test]
    fn delay_is_always_positive_and_at_most_a_day() {
        let base = datetime!(2024-01-01 00:00:00 UTC);
        for hour in [0u8, 3, 12, 23] {
            for offset_minutes in [0i64, 1, 59, 60 * 7, 60 * 23, 60 * 24 - 1] {
                let now = base + Duration::minutes(offset_minutes);
                let delay = next_run_delay(now, hour);
                assert!(delay > std::time::Duration::ZERO);
                assert!(delay <= std::time::Duration::from_secs(24 * 3600));
            }
        }
    }
}
