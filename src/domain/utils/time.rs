use chrono::{DateTime, TimeDelta, Utc};

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Start of the clock hour containing `instant`.
pub fn truncate_to_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    let rem = instant.timestamp().rem_euclid(SECONDS_PER_HOUR);
    instant - TimeDelta::seconds(rem) - TimeDelta::nanoseconds(instant.timestamp_subsec_nanos() as i64)
}

/// Start of the clock hour after the one containing `instant`.
pub fn next_hour(instant: DateTime<Utc>) -> DateTime<Utc> {
    truncate_to_hour(instant) + TimeDelta::hours(1)
}

/// Rounds up to the next whole minute; whole minutes are returned unchanged.
pub fn ceil_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    let rem = instant.timestamp().rem_euclid(SECONDS_PER_MINUTE);
    let nanos = instant.timestamp_subsec_nanos() as i64;

    if rem == 0 && nanos == 0 {
        return instant;
    }

    instant - TimeDelta::seconds(rem) - TimeDelta::nanoseconds(nanos) + TimeDelta::minutes(1)
}

/// Signed difference `to - from` in fractional minutes.
pub fn minutes_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 60_000.0
}
