//! Column values of result rows.

use super::LobValue;
use crate::protocol::decode::Decimal128;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt;

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum HdbValue {
    /// NULL value.
    Null,
    /// TINYINT, SMALLINT, INTEGER, BIGINT.
    Integer(i64),
    Real(f32),
    Double(f64),
    Boolean(bool),
    /// DECIMAL and SMALLDECIMAL in wire representation.
    Decimal(Decimal128),
    /// Character types.
    String(String),
    /// BINARY and VARBINARY.
    Binary(Vec<u8>),
    /// DAYDATE.
    Date(NaiveDate),
    /// SECONDTIME.
    Time(NaiveTime),
    /// LONGDATE and SECONDDATE.
    Timestamp(NaiveDateTime),
    /// CLOB, NCLOB, BLOB, TEXT, BINTEXT.
    Lob(LobValue),
}

impl HdbValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, HdbValue::Null)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HdbValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Option<i64> {
        match self {
            HdbValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to convert to f64.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            HdbValue::Integer(v) => Some(*v as f64),
            HdbValue::Real(v) => Some(*v as f64),
            HdbValue::Double(v) => Some(*v),
            HdbValue::Decimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HdbValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            HdbValue::Timestamp(ts) => Some(*ts),
            _ => None,
        }
    }

    pub fn as_lob(&self) -> Option<&LobValue> {
        match self {
            HdbValue::Lob(lob) => Some(lob),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            HdbValue::Binary(bytes) => Some(bytes),
            HdbValue::Lob(lob) => Some(lob.as_bytes()),
            _ => None,
        }
    }
}

impl fmt::Display for HdbValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HdbValue::Null => write!(f, "NULL"),
            HdbValue::Integer(v) => write!(f, "{}", v),
            HdbValue::Real(v) => write!(f, "{}", v),
            HdbValue::Double(v) => write!(f, "{}", v),
            HdbValue::Boolean(v) => write!(f, "{}", v),
            HdbValue::Decimal(d) => write!(f, "{}", d),
            HdbValue::String(s) => write!(f, "{}", s),
            HdbValue::Binary(bytes) => write!(f, "<BINARY: {} bytes>", bytes.len()),
            HdbValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            HdbValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            HdbValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            HdbValue::Lob(lob) => match lob.as_string() {
                Some(text) if lob.is_complete() => write!(f, "{}", text),
                _ => write!(f, "<{}: {} bytes>", lob.type_code, lob.locator.byte_length),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hdb_value_null() {
        let val = HdbValue::Null;
        assert!(val.is_null());
        assert_eq!(val.as_str(), None);
        assert_eq!(format!("{}", val), "NULL");
    }

    #[test]
    fn test_hdb_value_string() {
        let val = HdbValue::String("hello".to_string());
        assert!(!val.is_null());
        assert_eq!(val.as_str(), Some("hello"));
        assert_eq!(format!("{}", val), "hello");
    }

    #[test]
    fn test_hdb_value_numbers() {
        assert_eq!(HdbValue::Integer(42).to_i64(), Some(42));
        assert_eq!(HdbValue::Integer(42).to_f64(), Some(42.0));
        assert_eq!(HdbValue::Double(1.5).to_i64(), None);
        assert_eq!(HdbValue::Real(0.5).to_f64(), Some(0.5));
    }

    #[test]
    fn test_hdb_value_timestamp_display() {
        let ts = NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(7, 8, 9)
            .unwrap();
        assert_eq!(HdbValue::Timestamp(ts).to_string(), "2024-05-06 07:08:09");
    }
}
