//! Time source for the booking engine

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Current time in the zone every booking computation uses
pub trait Clock: Send + Sync {
    fn timezone(&self) -> Tz;

    fn now(&self) -> DateTime<Tz>;
}

/// Wall clock in a fixed zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn timezone(&self) -> Tz {
        self.tz
    }

    fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }
}

/// Resolve an IANA zone name, falling back to UTC
pub fn parse_timezone(name: &str) -> Tz {
    match name.trim().parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::warn!(timezone = %name, "Unknown timezone, falling back to UTC");
            Tz::UTC
        }
    }
}
