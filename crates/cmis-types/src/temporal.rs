//! Conversion of store timestamps into CMIS date-times.
//!
//! The store records instants as milliseconds since the UNIX epoch. Every
//! exposed date-time is rounded up to the next whole second and interpreted
//! in UTC.

use chrono::{DateTime, Utc};

const MILLIS_PER_SECOND: i64 = 1000;

/// Round a millisecond timestamp up to a whole second.
///
/// `1500 -> 2000`, `2000 -> 2000`, `-1500 -> -1000`. Saturates at the
/// representable range.
pub fn round_up_to_second(millis: i64) -> i64 {
    let seconds = millis.div_euclid(MILLIS_PER_SECOND);
    let seconds = if millis.rem_euclid(MILLIS_PER_SECOND) == 0 {
        seconds
    } else {
        seconds + 1
    };
    seconds.saturating_mul(MILLIS_PER_SECOND)
}

/// Convert a store timestamp into a UTC date-time with whole-second precision.
///
/// Returns `None` if the instant is outside chrono's supported range.
pub fn millis_to_datetime(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(round_up_to_second(millis))
}
