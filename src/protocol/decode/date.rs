//! Date and time decoders.
//!
//! The server counts from 0001-01-01 and reserves one value past the valid
//! range of each type as its NULL marker. All encodings are offset by one so
//! that zero stays distinct from the first valid value.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Error, Result};

pub const LONGDATE_NULL: i64 = 3_155_380_704_000_000_001;
pub const SECONDDATE_NULL: i64 = 315_538_070_401;
pub const DAYDATE_NULL: i32 = 3_652_062;
pub const SECONDTIME_NULL: i32 = 86_402;

const SECONDS_PER_DAY: i64 = 86_400;
/// 100ns ticks per day.
const TICKS_PER_DAY: i64 = 864_000_000_000;

fn day_to_date(days: i64) -> Result<NaiveDate> {
    i32::try_from(days)
        .ok()
        .and_then(NaiveDate::from_num_days_from_ce_opt)
        .ok_or_else(|| Error::protocol(format!("Invalid day number: {}", days)))
}

/// Remove the offset of one, rejecting values with no valid predecessor.
fn unbias(value: i64, type_name: &str) -> Result<i64> {
    value
        .checked_sub(1)
        .ok_or_else(|| Error::protocol(format!("Invalid {} value: {}", type_name, value)))
}

/// Decode a DAYDATE (days since 0001-01-01, plus one).
pub fn decode_daydate(value: i32) -> Result<NaiveDate> {
    day_to_date(value as i64)
}

/// Decode a SECONDTIME (seconds since midnight, plus one).
pub fn decode_secondtime(value: i32) -> Result<NaiveTime> {
    u32::try_from(unbias(value as i64, "SECONDTIME")?)
        .ok()
        .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
        .ok_or_else(|| Error::protocol(format!("Invalid SECONDTIME value: {}", value)))
}

/// Decode a SECONDDATE (seconds since 0001-01-01 00:00:00, plus one).
pub fn decode_seconddate(value: i64) -> Result<NaiveDateTime> {
    let value = unbias(value, "SECONDDATE")?;
    let date = day_to_date(value.div_euclid(SECONDS_PER_DAY) + 1)?;
    let secs = value.rem_euclid(SECONDS_PER_DAY) as u32;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .ok_or_else(|| Error::protocol(format!("Invalid SECONDDATE value: {}", value + 1)))?;
    Ok(date.and_time(time))
}

/// Decode a LONGDATE (100ns ticks since 0001-01-01 00:00:00, plus one).
pub fn decode_longdate(value: i64) -> Result<NaiveDateTime> {
    let value = unbias(value, "LONGDATE")?;
    let date = day_to_date(value.div_euclid(TICKS_PER_DAY) + 1)?;
    let nanos = value.rem_euclid(TICKS_PER_DAY) * 100;
    let time = NaiveTime::from_num_seconds_from_midnight_opt(
        (nanos / 1_000_000_000) as u32,
        (nanos % 1_000_000_000) as u32,
    )
    .ok_or_else(|| Error::protocol(format!("Invalid LONGDATE value: {}", value + 1)))?;
    Ok(date.and_time(time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_daydate() {
        assert_eq!(decode_daydate(1).unwrap(), ymd(1, 1, 1));
        let days = ymd(2024, 2, 29).num_days_from_ce();
        assert_eq!(decode_daydate(days).unwrap(), ymd(2024, 2, 29));
        assert!(decode_daydate(i32::MAX).is_err());
    }

    #[test]
    fn test_secondtime() {
        assert_eq!(
            decode_secondtime(1).unwrap(),
            NaiveTime::from_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(
            decode_secondtime(3_600 * 13 + 61 + 1).unwrap(),
            NaiveTime::from_hms_opt(13, 1, 1).unwrap()
        );
        assert!(decode_secondtime(0).is_err());
        assert!(decode_secondtime(i32::MIN).is_err());
    }

    #[test]
    fn test_seconddate() {
        let expected = ymd(2000, 1, 2).and_hms_opt(3, 4, 5).unwrap();
        let days = (ymd(2000, 1, 2).num_days_from_ce() - 1) as i64;
        let value = days * SECONDS_PER_DAY + 3 * 3_600 + 4 * 60 + 5 + 1;
        assert_eq!(decode_seconddate(value).unwrap(), expected);
        assert!(decode_seconddate(i64::MIN).is_err());
    }

    #[test]
    fn test_longdate() {
        let expected = ymd(1999, 12, 31)
            .and_hms_nano_opt(23, 59, 59, 123_456_700)
            .unwrap();
        let days = (ymd(1999, 12, 31).num_days_from_ce() - 1) as i64;
        let ticks = (23 * 3_600 + 59 * 60 + 59) * 10_000_000 + 1_234_567;
        let value = days * TICKS_PER_DAY + ticks + 1;
        assert_eq!(decode_longdate(value).unwrap(), expected);
        assert!(decode_longdate(i64::MIN).is_err());
    }
}
