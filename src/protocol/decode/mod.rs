//! Row value decoders.
//!
//! [`RowDecoder`] is the seam between the result-set part and value
//! decoding. [`FieldValueDecoder`] is the default implementation and
//! handles the output representation of these types:
//!
//! | Type | Representation |
//! |------|----------------|
//! | TINYINT, SMALLINT, INTEGER, BIGINT | null indicator byte + value |
//! | REAL, DOUBLE | value, NULL when all bits set |
//! | BOOLEAN | 0 false, 1 NULL, 2 true |
//! | DECIMAL, SMALLDECIMAL | 16-byte decimal128 (`decimal`) |
//! | character and binary types | length indicator + bytes |
//! | LONGDATE, SECONDDATE, DAYDATE, SECONDTIME | integer (`date`) |
//! | LOB types | LOB descriptor |

mod date;
mod decimal;

pub use date::{
    decode_daydate, decode_longdate, decode_seconddate, decode_secondtime, DAYDATE_NULL,
    LONGDATE_NULL, SECONDDATE_NULL, SECONDTIME_NULL,
};
pub use decimal::{is_null_decimal, Decimal128};

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;
use crate::protocol::types::{FieldSet, HdbValue, LobValue, TypeCode};

/// Largest length sent in the indicator byte itself.
const LEN_IND_SMALL: u8 = 245;
/// Length follows as i16.
const LEN_IND_MEDIUM: u8 = 246;
/// Length follows as i32.
const LEN_IND_BIG: u8 = 247;
const LEN_IND_NULL: u8 = 255;

const BOOLEAN_FALSE: u8 = 0;
const BOOLEAN_NULL: u8 = 1;
const BOOLEAN_TRUE: u8 = 2;

/// Decodes the row values of a result-set part.
pub trait RowDecoder: Send + Sync {
    /// Decode `num_rows` rows laid out according to `fields`.
    fn decode_rows(
        &self,
        num_rows: usize,
        fields: &FieldSet,
        buf: &mut ReadBuffer,
    ) -> Result<Vec<Vec<HdbValue>>>;
}

/// Default row decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValueDecoder;

impl RowDecoder for FieldValueDecoder {
    fn decode_rows(
        &self,
        num_rows: usize,
        fields: &FieldSet,
        buf: &mut ReadBuffer,
    ) -> Result<Vec<Vec<HdbValue>>> {
        // Rows without columns occupy no bytes, so the count could not be
        // bounded by the buffer.
        if fields.is_empty() && num_rows > 0 {
            return Err(Error::protocol(format!(
                "{} rows received for a result without columns",
                num_rows
            )));
        }
        let mut rows = Vec::new();
        for _ in 0..num_rows {
            let mut values = Vec::with_capacity(fields.len());
            for field in fields.fields() {
                values.push(decode_value(buf, field.type_code())?);
            }
            rows.push(values);
        }
        Ok(rows)
    }
}

/// Decode one output value of type `type_code`.
pub fn decode_value(buf: &mut ReadBuffer, type_code: TypeCode) -> Result<HdbValue> {
    let value = match type_code {
        TypeCode::TINYINT => match buf.read_bool()? {
            true => HdbValue::Integer(buf.read_u8()? as i64),
            false => HdbValue::Null,
        },
        TypeCode::SMALLINT => match buf.read_bool()? {
            true => HdbValue::Integer(buf.read_i16()? as i64),
            false => HdbValue::Null,
        },
        TypeCode::INTEGER => match buf.read_bool()? {
            true => HdbValue::Integer(buf.read_i32()? as i64),
            false => HdbValue::Null,
        },
        TypeCode::BIGINT => match buf.read_bool()? {
            true => HdbValue::Integer(buf.read_i64()?),
            false => HdbValue::Null,
        },
        TypeCode::REAL => {
            let bits = buf.read_u32()?;
            if bits == u32::MAX {
                HdbValue::Null
            } else {
                HdbValue::Real(f32::from_bits(bits))
            }
        }
        TypeCode::DOUBLE => {
            let bits = buf.read_u64()?;
            if bits == u64::MAX {
                HdbValue::Null
            } else {
                HdbValue::Double(f64::from_bits(bits))
            }
        }
        TypeCode::BOOLEAN => match buf.read_u8()? {
            BOOLEAN_FALSE => HdbValue::Boolean(false),
            BOOLEAN_NULL => HdbValue::Null,
            BOOLEAN_TRUE => HdbValue::Boolean(true),
            other => {
                return Err(Error::protocol(format!("Invalid BOOLEAN value: {}", other)));
            }
        },
        TypeCode::DECIMAL | TypeCode::SMALLDECIMAL => {
            let bytes = buf.read_array::<16>()?;
            if is_null_decimal(&bytes) {
                HdbValue::Null
            } else {
                HdbValue::Decimal(Decimal128::from_bytes(bytes))
            }
        }
        TypeCode::LONGDATE => match buf.read_i64()? {
            LONGDATE_NULL => HdbValue::Null,
            v => HdbValue::Timestamp(decode_longdate(v)?),
        },
        TypeCode::SECONDDATE => match buf.read_i64()? {
            SECONDDATE_NULL => HdbValue::Null,
            v => HdbValue::Timestamp(decode_seconddate(v)?),
        },
        TypeCode::DAYDATE => match buf.read_i32()? {
            DAYDATE_NULL => HdbValue::Null,
            v => HdbValue::Date(decode_daydate(v)?),
        },
        TypeCode::SECONDTIME => match buf.read_i32()? {
            SECONDTIME_NULL => HdbValue::Null,
            v => HdbValue::Time(decode_secondtime(v)?),
        },
        tc if tc.is_lob() => match LobValue::decode(buf)? {
            Some(lob) => HdbValue::Lob(lob),
            None => HdbValue::Null,
        },
        tc if tc.is_char_type() => match read_var_bytes(buf)? {
            Some(bytes) => HdbValue::String(String::from_utf8_lossy(&bytes).into_owned()),
            None => HdbValue::Null,
        },
        TypeCode::BINARY | TypeCode::VARBINARY => match read_var_bytes(buf)? {
            Some(bytes) => HdbValue::Binary(bytes.to_vec()),
            None => HdbValue::Null,
        },
        other => return Err(Error::UnsupportedType { type_code: other.0 }),
    };
    Ok(value)
}

/// Read bytes behind a length indicator. `None` is NULL.
fn read_var_bytes(buf: &mut ReadBuffer) -> Result<Option<Bytes>> {
    let len = match buf.read_u8()? {
        LEN_IND_NULL => return Ok(None),
        ind if ind <= LEN_IND_SMALL => ind as usize,
        LEN_IND_MEDIUM => non_negative(buf.read_i16()? as i32)?,
        LEN_IND_BIG => non_negative(buf.read_i32()?)?,
        ind => {
            return Err(Error::protocol(format!("Invalid length indicator: {}", ind)));
        }
    };
    Ok(Some(buf.read_bytes(len)?))
}

pub(crate) fn non_negative(len: i32) -> Result<usize> {
    usize::try_from(len).map_err(|_| Error::protocol(format!("Negative value length: {}", len)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(type_code: TypeCode, data: &[u8]) -> Result<HdbValue> {
        let mut buf = ReadBuffer::new(Bytes::copy_from_slice(data));
        let value = decode_value(&mut buf, type_code)?;
        assert_eq!(buf.remaining(), 0, "trailing bytes for {}", type_code);
        Ok(value)
    }

    #[test]
    fn test_integers() {
        assert_eq!(decode(TypeCode::TINYINT, &[1, 200]).unwrap(), HdbValue::Integer(200));
        assert_eq!(decode(TypeCode::TINYINT, &[0]).unwrap(), HdbValue::Null);
        assert_eq!(
            decode(TypeCode::SMALLINT, &[1, 0xff, 0xff]).unwrap(),
            HdbValue::Integer(-1)
        );
        assert_eq!(
            decode(TypeCode::INTEGER, &[1, 0x10, 0, 0, 0]).unwrap(),
            HdbValue::Integer(16)
        );
        let mut bigint = vec![1];
        bigint.extend_from_slice(&(-5i64).to_le_bytes());
        assert_eq!(decode(TypeCode::BIGINT, &bigint).unwrap(), HdbValue::Integer(-5));
    }

    #[test]
    fn test_floats() {
        assert_eq!(
            decode(TypeCode::DOUBLE, &2.5f64.to_le_bytes()).unwrap(),
            HdbValue::Double(2.5)
        );
        assert_eq!(decode(TypeCode::DOUBLE, &[0xff; 8]).unwrap(), HdbValue::Null);
        assert_eq!(decode(TypeCode::REAL, &[0xff; 4]).unwrap(), HdbValue::Null);
    }

    #[test]
    fn test_boolean() {
        assert_eq!(decode(TypeCode::BOOLEAN, &[2]).unwrap(), HdbValue::Boolean(true));
        assert_eq!(decode(TypeCode::BOOLEAN, &[0]).unwrap(), HdbValue::Boolean(false));
        assert_eq!(decode(TypeCode::BOOLEAN, &[1]).unwrap(), HdbValue::Null);
        assert!(decode(TypeCode::BOOLEAN, &[9]).is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(
            decode(TypeCode::NVARCHAR, &[2, b'h', b'i']).unwrap(),
            HdbValue::String("hi".to_string())
        );
        assert_eq!(decode(TypeCode::VARCHAR, &[255]).unwrap(), HdbValue::Null);

        let mut medium = vec![246];
        medium.extend_from_slice(&300i16.to_le_bytes());
        medium.extend_from_slice(&[b'x'; 300]);
        assert_eq!(
            decode(TypeCode::NVARCHAR, &medium).unwrap(),
            HdbValue::String("x".repeat(300))
        );

        assert!(decode(TypeCode::VARCHAR, &[250]).is_err());
    }

    #[test]
    fn test_binary() {
        assert_eq!(
            decode(TypeCode::VARBINARY, &[3, 1, 2, 3]).unwrap(),
            HdbValue::Binary(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_decimal_null() {
        let mut bytes = [0u8; 16];
        bytes[15] = 0x70;
        assert_eq!(decode(TypeCode::DECIMAL, &bytes).unwrap(), HdbValue::Null);
    }

    #[test]
    fn test_dates_null() {
        assert_eq!(
            decode(TypeCode::LONGDATE, &LONGDATE_NULL.to_le_bytes()).unwrap(),
            HdbValue::Null
        );
        assert_eq!(
            decode(TypeCode::DAYDATE, &DAYDATE_NULL.to_le_bytes()).unwrap(),
            HdbValue::Null
        );
        assert!(matches!(
            decode(TypeCode::DAYDATE, &1i32.to_le_bytes()).unwrap(),
            HdbValue::Date(_)
        ));
    }

    #[test]
    fn test_lob_null() {
        assert_eq!(decode(TypeCode::NCLOB, &[26, 0x01]).unwrap(), HdbValue::Null);
    }

    #[test]
    fn test_unsupported_type() {
        assert!(matches!(
            decode(TypeCode::TIMESTAMP, &[0; 8]),
            Err(Error::UnsupportedType { type_code: 16 })
        ));
    }

    #[test]
    fn test_short_read() {
        assert!(decode(TypeCode::INTEGER, &[1, 0]).unwrap_err().is_io());
    }

    #[test]
    fn test_date_min_values_rejected() {
        let err = decode(TypeCode::SECONDTIME, &i32::MIN.to_le_bytes()).unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
        let err = decode(TypeCode::SECONDDATE, &i64::MIN.to_le_bytes()).unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
        let err = decode(TypeCode::LONGDATE, &i64::MIN.to_le_bytes()).unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    fn integer_column() -> FieldSet {
        use crate::protocol::types::{NameTable, ResultField};

        let mut data = vec![0x02, TypeCode::INTEGER.0 as u8];
        data.extend_from_slice(&[0; 22]);
        let mut names = NameTable::new();
        let field = ResultField::decode(&mut ReadBuffer::new(Bytes::from(data)), &mut names)
            .unwrap();
        FieldSet::new(vec![field], names)
    }

    #[test]
    fn test_huge_row_count_is_a_short_read() {
        let fields = integer_column();
        let mut buf = ReadBuffer::new(Bytes::from_static(&[1, 7, 0, 0, 0]));
        let err = FieldValueDecoder
            .decode_rows(i32::MAX as usize, &fields, &mut buf)
            .unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn test_rows_without_columns_rejected() {
        let fields = FieldSet::default();
        let mut buf = ReadBuffer::new(Bytes::new());
        let err = FieldValueDecoder
            .decode_rows(i32::MAX as usize, &fields, &mut buf)
            .unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));

        let rows = FieldValueDecoder.decode_rows(0, &fields, &mut buf).unwrap();
        assert!(rows.is_empty());
    }
}
