//! Departure delay derived from planned and real times.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

/// How far a departure deviates from its timetable, in whole minutes.
///
/// Partial minutes round up (towards positive infinity), so 90 seconds late
/// is a two-minute delay and 90 seconds early is one minute early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Delay {
    minutes: i64,
}

/// Delay as shown to riders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "minutes", rename_all = "camelCase")]
pub enum Punctuality {
    OnTime,
    Late(u64),
    Early(u64),
}

impl Delay {
    /// Delay of a departure planned at `planned` that actually leaves at `real`.
    pub fn between(planned: DateTime<FixedOffset>, real: DateTime<FixedOffset>) -> Self {
        let millis = (real - planned).num_milliseconds();
        Self {
            minutes: div_ceil(millis, 60_000),
        }
    }

    /// Signed minutes; positive means late.
    pub fn minutes(self) -> i64 {
        self.minutes
    }

    pub fn punctuality(self) -> Punctuality {
        match self.minutes {
            0 => Punctuality::OnTime,
            m if m > 0 => Punctuality::Late(m.unsigned_abs()),
            m => Punctuality::Early(m.unsigned_abs()),
        }
    }
}

/// Ceiling division for a positive divisor.
fn div_ceil(n: i64, d: i64) -> i64 {
    let q = n / d;
    if n % d > 0 { q + 1 } else { q }
}
