/// Trading window: tokens are tradable on their creation day only
use chrono::{DateTime, TimeZone};

/// Whether a token created at `created_at_secs` was created on the same
/// calendar day as `now`, in `now`'s time zone
pub fn created_same_day<Tz: TimeZone>(created_at_secs: i64, now: &DateTime<Tz>) -> bool {
    match now.timezone().timestamp_opt(created_at_secs, 0).single() {
        Some(created) => created.date_naive() == now.date_naive(),
        None => false,
    }
}
