use chrono::{DateTime, Local, Utc};
use now::DateTimeNow;

/// Returns local midnight of the day `moment` falls on. "Today" always means the device's local
/// calendar day, not the UTC one.
pub fn start_of_local_day(moment: DateTime<Utc>) -> DateTime<Utc> {
    moment
        .with_timezone(&Local)
        .beginning_of_day()
        .with_timezone(&Utc)
}

/// Formats the time of day as zero padded 24-hour `HH:MM` in local time.
pub fn format_time_of_day(moment: DateTime<Utc>) -> String {
    moment.with_timezone(&Local).format("%H:%M").to_string()
}

#[cfg(test)]
pub use test_time::local_time;
