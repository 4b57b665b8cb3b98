use chrono::{DateTime, Utc};

/// Represents an entity responsible for providing dates across application. Records are stamped
/// with whatever the clock says, which lets tests pin "now" to a specific moment of a day.
pub trait Clock: Sync + Send + 'static {
    fn time(&self) -> DateTime<Utc>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn time(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
pub use manual::ManualClock;
