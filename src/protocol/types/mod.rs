//! Result metadata and value types.

mod field;
mod lob;
mod names;
mod row;
mod type_code;
mod value;

pub use field::{
    ColumnOptions, Field, FieldSet, ResultField, COLUMN_DISPLAY_NAME, COLUMN_NAME, MAX_NAMES,
    RESULT_FIELD_SIZE, SCHEMA_NAME, TABLE_NAME,
};
pub use lob::{LobLocator, LobOptions, LobValue};
pub use names::NameTable;
pub use row::Row;
pub use type_code::TypeCode;
pub use value::HdbValue;
