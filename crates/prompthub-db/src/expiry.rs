use chrono::{DateTime, Duration, Utc};

/// A record is live for `lifetime_days` after creation and expired at any
/// instant strictly later than that. `lifetime_days = 0` means the record
/// expires immediately after creation. A lifetime too large for chrono to
/// represent means the record never expires; it must not panic a read path.
pub fn is_expired(created_at: DateTime<Utc>, lifetime_days: i64, now: DateTime<Utc>) -> bool {
    match Duration::try_days(lifetime_days).and_then(|d| created_at.checked_add_signed(d)) {
        Some(deadline) => now > deadline,
        None => false,
    }
}
