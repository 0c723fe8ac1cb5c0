//! SQL type codes as sent in column descriptors.
//!
//! Codes the library does not know are kept as-is: metadata decoding never
//! rejects a type, only row decoding does.

use std::fmt;

/// Type code of a result column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeCode(pub i8);

impl TypeCode {
    pub const NULL: TypeCode = TypeCode(0);
    pub const TINYINT: TypeCode = TypeCode(1);
    pub const SMALLINT: TypeCode = TypeCode(2);
    pub const INTEGER: TypeCode = TypeCode(3);
    pub const BIGINT: TypeCode = TypeCode(4);
    pub const DECIMAL: TypeCode = TypeCode(5);
    pub const REAL: TypeCode = TypeCode(6);
    pub const DOUBLE: TypeCode = TypeCode(7);
    pub const CHAR: TypeCode = TypeCode(8);
    pub const VARCHAR: TypeCode = TypeCode(9);
    pub const NCHAR: TypeCode = TypeCode(10);
    pub const NVARCHAR: TypeCode = TypeCode(11);
    pub const BINARY: TypeCode = TypeCode(12);
    pub const VARBINARY: TypeCode = TypeCode(13);
    pub const DATE: TypeCode = TypeCode(14);
    pub const TIME: TypeCode = TypeCode(15);
    pub const TIMESTAMP: TypeCode = TypeCode(16);
    pub const CLOB: TypeCode = TypeCode(25);
    pub const NCLOB: TypeCode = TypeCode(26);
    pub const BLOB: TypeCode = TypeCode(27);
    pub const BOOLEAN: TypeCode = TypeCode(28);
    pub const STRING: TypeCode = TypeCode(29);
    pub const NSTRING: TypeCode = TypeCode(30);
    pub const SMALLDECIMAL: TypeCode = TypeCode(47);
    pub const TEXT: TypeCode = TypeCode(51);
    pub const SHORTTEXT: TypeCode = TypeCode(52);
    pub const BINTEXT: TypeCode = TypeCode(53);
    pub const ALPHANUM: TypeCode = TypeCode(55);
    pub const LONGDATE: TypeCode = TypeCode(61);
    pub const SECONDDATE: TypeCode = TypeCode(62);
    pub const DAYDATE: TypeCode = TypeCode(63);
    pub const SECONDTIME: TypeCode = TypeCode(64);

    /// Whether the declared column length is meaningful for this type.
    pub fn is_variable_length(self) -> bool {
        matches!(
            self,
            Self::CHAR
                | Self::NCHAR
                | Self::VARCHAR
                | Self::NVARCHAR
                | Self::BINARY
                | Self::VARBINARY
                | Self::SHORTTEXT
                | Self::ALPHANUM
        )
    }

    /// Whether precision and scale are meaningful for this type.
    pub fn is_decimal_type(self) -> bool {
        matches!(self, Self::DECIMAL | Self::SMALLDECIMAL)
    }

    /// Whether values of this type arrive as LOB descriptors.
    pub fn is_lob(self) -> bool {
        matches!(
            self,
            Self::CLOB | Self::NCLOB | Self::BLOB | Self::TEXT | Self::BINTEXT
        )
    }

    /// Whether values of this type are text (as opposed to raw bytes).
    pub fn is_char_type(self) -> bool {
        matches!(
            self,
            Self::CHAR
                | Self::NCHAR
                | Self::VARCHAR
                | Self::NVARCHAR
                | Self::STRING
                | Self::NSTRING
                | Self::SHORTTEXT
                | Self::ALPHANUM
                | Self::CLOB
                | Self::NCLOB
                | Self::TEXT
        )
    }

    /// SQL name of the type, `None` for unknown codes.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Self::NULL => "NULL",
            Self::TINYINT => "TINYINT",
            Self::SMALLINT => "SMALLINT",
            Self::INTEGER => "INTEGER",
            Self::BIGINT => "BIGINT",
            Self::DECIMAL => "DECIMAL",
            Self::REAL => "REAL",
            Self::DOUBLE => "DOUBLE",
            Self::CHAR => "CHAR",
            Self::VARCHAR => "VARCHAR",
            Self::NCHAR => "NCHAR",
            Self::NVARCHAR => "NVARCHAR",
            Self::BINARY => "BINARY",
            Self::VARBINARY => "VARBINARY",
            Self::DATE => "DATE",
            Self::TIME => "TIME",
            Self::TIMESTAMP => "TIMESTAMP",
            Self::CLOB => "CLOB",
            Self::NCLOB => "NCLOB",
            Self::BLOB => "BLOB",
            Self::BOOLEAN => "BOOLEAN",
            Self::STRING => "STRING",
            Self::NSTRING => "NSTRING",
            Self::SMALLDECIMAL => "SMALLDECIMAL",
            Self::TEXT => "TEXT",
            Self::SHORTTEXT => "SHORTTEXT",
            Self::BINTEXT => "BINTEXT",
            Self::ALPHANUM => "ALPHANUM",
            Self::LONGDATE => "LONGDATE",
            Self::SECONDDATE => "SECONDDATE",
            Self::DAYDATE => "DAYDATE",
            Self::SECONDTIME => "SECONDTIME",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for TypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "UNKNOWN({})", self.0),
        }
    }
}
