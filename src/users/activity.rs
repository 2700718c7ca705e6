use time::OffsetDateTime;

/// Days left before the retention cleanup removes an account.
///
/// Users with no recorded activity get the full window. The result is clamped
/// to `[0, threshold_days]`, so an already overdue account reports 0 and a
/// clock-skewed future timestamp cannot report more than the window.
pub fn days_until_deletion(
    last_activity_at: Option<OffsetDateTime>,
    now: OffsetDateTime,
    threshold_days: i64,
) -> i64 {
    let Some(last) = last_activity_at else {
        return threshold_days;
    };
    let inactive_days = (now - last).whole_days();
    (threshold_days - inactive_days).clamp(0, threshold_days)
}
