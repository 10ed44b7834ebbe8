use chrono::Utc;

pub fn now_naive() -> chrono::NaiveDateTime {
    Utc::now().naive_utc()
}

/// Current unix time in seconds, clamped at zero for clocks set before the epoch.
pub fn unix_now() -> u64 {
    u64::try_from(Utc::now().timestamp()).unwrap_or(0)
}
