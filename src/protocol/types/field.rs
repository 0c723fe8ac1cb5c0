//! Column descriptors of a query result.
//!
//! A [`ResultField`] holds what the server sends per column: options, type
//! code, length, fraction and four offsets into the name block. The names
//! themselves live in the [`NameTable`] owned by the enclosing [`FieldSet`];
//! use [`FieldSet::field`] for a view that resolves them.

use std::fmt;
use std::io::Read;

use crate::error::{Error, Result};
use crate::protocol::buffer::ReadBuffer;

use super::names::NameTable;
use super::type_code::TypeCode;

/// Wire size of one column descriptor.
pub const RESULT_FIELD_SIZE: usize = 24;

/// Index of each name offset in [`ResultField::offsets`].
pub const TABLE_NAME: usize = 0;
pub const SCHEMA_NAME: usize = 1;
pub const COLUMN_NAME: usize = 2;
pub const COLUMN_DISPLAY_NAME: usize = 3;
pub const MAX_NAMES: usize = 4;

/// Column options bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnOptions(pub i8);

impl ColumnOptions {
    pub const MANDATORY: i8 = 0x01;
    pub const OPTIONAL: i8 = 0x02;

    pub fn contains(self, option: i8) -> bool {
        self.0 & option != 0
    }
}

impl fmt::Display for ColumnOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = Vec::with_capacity(2);
        if self.contains(Self::MANDATORY) {
            set.push("mandatory");
        }
        if self.contains(Self::OPTIONAL) {
            set.push("optional");
        }
        write!(f, "[{}]", set.join(" "))
    }
}

/// Metadata of one result column, as read from the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    options: ColumnOptions,
    type_code: TypeCode,
    fraction: i16,
    length: i16,
    offsets: [u32; MAX_NAMES],
}

impl ResultField {
    /// Read one descriptor and register its name offsets with `names`.
    pub fn decode(buf: &mut ReadBuffer, names: &mut NameTable) -> Result<Self> {
        let options = ColumnOptions(buf.read_i8()?);
        let type_code = TypeCode(buf.read_i8()?);
        let fraction = buf.read_i16()?;
        let length = buf.read_i16()?;
        buf.skip(2)?; // filler

        let mut offsets = [0u32; MAX_NAMES];
        for offset in offsets.iter_mut() {
            *offset = buf.read_u32()?;
            names.add_offset(*offset);
        }

        Ok(Self {
            options,
            type_code,
            fraction,
            length,
            offsets,
        })
    }

    pub fn options(&self) -> ColumnOptions {
        self.options
    }

    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Declared length, for variable-length types only.
    pub fn type_length(&self) -> Option<i64> {
        self.type_code
            .is_variable_length()
            .then_some(self.length as i64)
    }

    /// Precision and scale, for decimal types only.
    pub fn type_precision_scale(&self) -> Option<(i64, i64)> {
        self.type_code
            .is_decimal_type()
            .then_some((self.length as i64, self.fraction as i64))
    }

    /// Whether the column may hold NULL.
    pub fn nullable(&self) -> bool {
        self.options.0 == ColumnOptions::OPTIONAL
    }

    /// Result columns are never input parameters.
    pub fn is_input(&self) -> bool {
        false
    }

    pub fn is_output(&self) -> bool {
        true
    }

    /// Name offsets in table, schema, column, display-name order.
    pub fn offsets(&self) -> &[u32; MAX_NAMES] {
        &self.offsets
    }

    /// Streaming LOB reader attached to this column. Always `None`.
    pub fn lob_reader(&mut self) -> Option<&mut (dyn Read + Send)> {
        None
    }

    /// Result metadata is read-only; LOB streams cannot be attached here.
    pub fn set_lob_reader(&mut self, _reader: Box<dyn Read + Send>) -> Result<()> {
        Err(Error::LobReaderUnsupported)
    }
}

/// Column descriptors of one result together with their name table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    fields: Vec<ResultField>,
    names: NameTable,
}

impl FieldSet {
    pub fn new(fields: Vec<ResultField>, names: NameTable) -> Self {
        Self { fields, names }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[ResultField] {
        &self.fields
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Column view with resolved names.
    pub fn field(&self, index: usize) -> Option<Field<'_>> {
        self.fields.get(index).map(|field| Field {
            field,
            names: &self.names,
        })
    }

    /// Like [`FieldSet::field`], but reports the bounds as an error.
    pub fn try_field(&self, index: usize) -> Result<Field<'_>> {
        self.field(index).ok_or(Error::ColumnIndexOutOfBounds {
            index,
            count: self.fields.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Field<'_>> {
        self.fields.iter().map(move |field| Field {
            field,
            names: &self.names,
        })
    }

    /// Display names of all columns.
    pub fn column_names(&self) -> Vec<&str> {
        self.iter().map(|field| field.name()).collect()
    }

    /// Find column index by display name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.iter()
            .position(|field| field.name().eq_ignore_ascii_case(name))
    }
}

/// A column descriptor paired with the names it references.
#[derive(Debug, Clone, Copy)]
pub struct Field<'a> {
    field: &'a ResultField,
    names: &'a NameTable,
}

impl<'a> Field<'a> {
    pub fn descriptor(&self) -> &'a ResultField {
        self.field
    }

    /// Display name of the column.
    pub fn name(&self) -> &'a str {
        self.names.name(self.field.offsets[COLUMN_DISPLAY_NAME])
    }

    pub fn table_name(&self) -> &'a str {
        self.names.name(self.field.offsets[TABLE_NAME])
    }

    pub fn schema_name(&self) -> &'a str {
        self.names.name(self.field.offsets[SCHEMA_NAME])
    }

    pub fn column_name(&self) -> &'a str {
        self.names.name(self.field.offsets[COLUMN_NAME])
    }

    pub fn type_code(&self) -> TypeCode {
        self.field.type_code()
    }

    pub fn type_length(&self) -> Option<i64> {
        self.field.type_length()
    }

    pub fn type_precision_scale(&self) -> Option<(i64, i64)> {
        self.field.type_precision_scale()
    }

    pub fn nullable(&self) -> bool {
        self.field.nullable()
    }
}

impl fmt::Display for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "options {} type {} fraction {} length {} table {:?} schema {:?} column {:?} display {:?}",
            self.field.options,
            self.field.type_code,
            self.field.fraction,
            self.field.length,
            self.table_name(),
            self.schema_name(),
            self.column_name(),
            self.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn descriptor_bytes(
        options: i8,
        type_code: TypeCode,
        fraction: i16,
        length: i16,
        offsets: [u32; 4],
    ) -> Vec<u8> {
        let mut data = vec![options as u8, type_code.0 as u8];
        data.extend_from_slice(&fraction.to_le_bytes());
        data.extend_from_slice(&length.to_le_bytes());
        data.extend_from_slice(&[0xee, 0xee]); // filler
        for offset in offsets {
            data.extend_from_slice(&offset.to_le_bytes());
        }
        data
    }

    #[test]
    fn test_decode_descriptor() {
        let data = descriptor_bytes(ColumnOptions::OPTIONAL, TypeCode::DECIMAL, 2, 18, [0, 5, 12, 12]);
        assert_eq!(data.len(), RESULT_FIELD_SIZE);

        let mut names = NameTable::new();
        let mut buf = ReadBuffer::new(Bytes::from(data));
        let field = ResultField::decode(&mut buf, &mut names).unwrap();

        assert_eq!(buf.remaining(), 0);
        assert_eq!(field.type_code(), TypeCode::DECIMAL);
        assert_eq!(field.type_precision_scale(), Some((18, 2)));
        assert_eq!(field.type_length(), None);
        assert!(field.nullable());
        assert_eq!(field.offsets(), &[0, 5, 12, 12]);
        assert_eq!(names.offsets().collect::<Vec<_>>(), vec![0, 5, 12]);
    }

    #[test]
    fn test_length_not_applicable_for_fixed_types() {
        let data = descriptor_bytes(ColumnOptions::MANDATORY, TypeCode::INTEGER, 77, 99, [0; 4]);
        let mut names = NameTable::new();
        let field = ResultField::decode(&mut ReadBuffer::new(Bytes::from(data)), &mut names).unwrap();

        assert_eq!(field.type_length(), None);
        assert_eq!(field.type_precision_scale(), None);
        assert!(!field.nullable());
    }

    #[test]
    fn test_variable_length_type() {
        let data = descriptor_bytes(ColumnOptions::OPTIONAL, TypeCode::NVARCHAR, -1, 256, [0; 4]);
        let mut names = NameTable::new();
        let field = ResultField::decode(&mut ReadBuffer::new(Bytes::from(data)), &mut names).unwrap();

        assert_eq!(field.type_length(), Some(256));
        assert_eq!(field.type_precision_scale(), None);
    }

    #[test]
    fn test_nullable_requires_exact_optional() {
        let both = ColumnOptions::MANDATORY | ColumnOptions::OPTIONAL;
        let data = descriptor_bytes(both, TypeCode::INTEGER, 0, 0, [0; 4]);
        let mut names = NameTable::new();
        let field = ResultField::decode(&mut ReadBuffer::new(Bytes::from(data)), &mut names).unwrap();

        assert!(!field.nullable());
        assert_eq!(field.options().to_string(), "[mandatory optional]");
    }

    #[test]
    fn test_lob_reader_is_unsupported() {
        let data = descriptor_bytes(ColumnOptions::OPTIONAL, TypeCode::BLOB, 0, 0, [0; 4]);
        let mut names = NameTable::new();
        let mut field =
            ResultField::decode(&mut ReadBuffer::new(Bytes::from(data)), &mut names).unwrap();

        assert!(field.lob_reader().is_none());
        let err = field
            .set_lob_reader(Box::new(std::io::empty()))
            .unwrap_err();
        assert!(err.is_capability());
        assert!(matches!(err, Error::LobReaderUnsupported));
        assert!(field.lob_reader().is_none());
    }

    #[test]
    fn test_field_set_names() {
        let mut names = NameTable::new();
        let mut fields = Vec::new();
        for offsets in [[0, 3, 10, 10], [0, 3, 14, 14]] {
            let data = descriptor_bytes(ColumnOptions::OPTIONAL, TypeCode::INTEGER, 0, 0, offsets);
            fields.push(
                ResultField::decode(&mut ReadBuffer::new(Bytes::from(data)), &mut names).unwrap(),
            );
        }
        names.set_name(0, "T".to_string());
        names.set_name(3, "SYS".to_string());
        names.set_name(10, "ID".to_string());
        names.set_name(14, "NAME".to_string());

        let set = FieldSet::new(fields, names);
        assert_eq!(set.column_names(), vec!["ID", "NAME"]);
        assert_eq!(set.find_by_name("name"), Some(1));
        assert_eq!(set.find_by_name("missing"), None);

        let field = set.field(0).unwrap();
        assert_eq!(field.table_name(), "T");
        assert_eq!(field.schema_name(), "SYS");
        assert_eq!(field.column_name(), "ID");
        assert!(field.to_string().contains("type INTEGER"));

        assert!(set.field(2).is_none());
        assert!(matches!(
            set.try_field(2),
            Err(Error::ColumnIndexOutOfBounds { index: 2, count: 2 })
        ));
    }
}
