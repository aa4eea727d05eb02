use crate::MySQLConverter;
use mysql_async::consts::ColumnType;
use std::collections::BTreeMap;

/// Character set number the server reports for binary columns.
pub const BINARY_CHARSET: u16 = 63;

/// Column type reported in the result set metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldType {
    Tiny,
    Short,
    Int24,
    Long,
    LongLong,
    Year,
    Bit,
    Float,
    Double,
    Decimal,
    Date,
    Time,
    Datetime,
    Timestamp,
    VarChar,
    VarString,
    String,
    Enum,
    Set,
    Json,
    TinyBlob,
    MediumBlob,
    Blob,
    LongBlob,
    Geometry,
    Null,
    Other,
}

impl From<ColumnType> for FieldType {
    fn from(value: ColumnType) -> Self {
        match value {
            ColumnType::MYSQL_TYPE_TINY => FieldType::Tiny,
            ColumnType::MYSQL_TYPE_SHORT => FieldType::Short,
            ColumnType::MYSQL_TYPE_INT24 => FieldType::Int24,
            ColumnType::MYSQL_TYPE_LONG => FieldType::Long,
            ColumnType::MYSQL_TYPE_LONGLONG => FieldType::LongLong,
            ColumnType::MYSQL_TYPE_YEAR => FieldType::Year,
            ColumnType::MYSQL_TYPE_BIT => FieldType::Bit,
            ColumnType::MYSQL_TYPE_FLOAT => FieldType::Float,
            ColumnType::MYSQL_TYPE_DOUBLE => FieldType::Double,
            ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
                FieldType::Decimal
            }
            ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => FieldType::Date,
            ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => FieldType::Time,
            ColumnType::MYSQL_TYPE_DATETIME | ColumnType::MYSQL_TYPE_DATETIME2 => {
                FieldType::Datetime
            }
            ColumnType::MYSQL_TYPE_TIMESTAMP | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
                FieldType::Timestamp
            }
            ColumnType::MYSQL_TYPE_VARCHAR => FieldType::VarChar,
            ColumnType::MYSQL_TYPE_VAR_STRING => FieldType::VarString,
            ColumnType::MYSQL_TYPE_STRING => FieldType::String,
            ColumnType::MYSQL_TYPE_ENUM => FieldType::Enum,
            ColumnType::MYSQL_TYPE_SET => FieldType::Set,
            ColumnType::MYSQL_TYPE_JSON => FieldType::Json,
            ColumnType::MYSQL_TYPE_TINY_BLOB => FieldType::TinyBlob,
            ColumnType::MYSQL_TYPE_MEDIUM_BLOB => FieldType::MediumBlob,
            ColumnType::MYSQL_TYPE_BLOB => FieldType::Blob,
            ColumnType::MYSQL_TYPE_LONG_BLOB => FieldType::LongBlob,
            ColumnType::MYSQL_TYPE_GEOMETRY => FieldType::Geometry,
            ColumnType::MYSQL_TYPE_NULL => FieldType::Null,
            _ => FieldType::Other,
        }
    }
}

/// How the raw column bytes become a [`keel_core::Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoder {
    Integer,
    Float,
    Decimal,
    /// UTF-8 text, raw bytes when the column uses the binary character set.
    Text,
    /// Untouched bytes.
    Bytes,
    /// Bytes for binary columns, text otherwise.
    Blob,
    Date,
    /// Provider datetime parser.
    Datetime,
    /// Provider time-delta parser.
    Interval,
}

impl Decoder {
    /// Converter applied to a column decoded this way.
    pub fn converter(&self, binary: bool) -> MySQLConverter {
        let text = MySQLConverter::Unicode {
            max_len: None,
            encoding: crate::DEFAULT_ENCODING.into(),
        };
        let bytes = MySQLConverter::ByteString {
            max_len: None,
            encoding: crate::DEFAULT_ENCODING.into(),
        };
        match self {
            Decoder::Integer => MySQLConverter::BigInt,
            Decoder::Float => MySQLConverter::Float,
            Decoder::Decimal => MySQLConverter::Decimal {
                precision: crate::MAX_DECIMAL_PRECISION,
                scale: crate::MAX_DECIMAL_SCALE,
            },
            Decoder::Text if binary => bytes,
            Decoder::Text => text,
            Decoder::Bytes => bytes,
            Decoder::Blob if binary => MySQLConverter::Blob,
            Decoder::Blob => text,
            Decoder::Date => MySQLConverter::Date,
            Decoder::Datetime => MySQLConverter::Datetime { precision: 6 },
            Decoder::Interval => MySQLConverter::Interval { precision: 6 },
        }
    }
}

/// Decoding rule per column type, applied to every result set of a connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeTable {
    decoders: BTreeMap<FieldType, Decoder>,
}

impl DecodeTable {
    /// What the transport does on its own: temporal columns and blobs stay text.
    pub fn raw() -> Self {
        use FieldType::*;
        let mut decoders = BTreeMap::new();
        for ty in [Tiny, Short, Int24, Long, LongLong, Year] {
            decoders.insert(ty, Decoder::Integer);
        }
        decoders.insert(Float, Decoder::Float);
        decoders.insert(Double, Decoder::Float);
        decoders.insert(Decimal, Decoder::Decimal);
        decoders.insert(Date, Decoder::Date);
        for ty in [
            Time, Datetime, Timestamp, VarChar, VarString, String, Enum, Set, Json, TinyBlob,
            MediumBlob, Blob, LongBlob,
        ] {
            decoders.insert(ty, Decoder::Text);
        }
        for ty in [Bit, Geometry, Null, Other] {
            decoders.insert(ty, Decoder::Bytes);
        }
        Self { decoders }
    }

    /// The raw table with the provider overrides: binary blobs as bytes and
    /// temporal columns through the provider parsers.
    pub fn provider() -> Self {
        let mut table = Self::raw();
        for ty in [
            FieldType::TinyBlob,
            FieldType::MediumBlob,
            FieldType::Blob,
            FieldType::LongBlob,
        ] {
            table.set(ty, Decoder::Blob);
        }
        table.set(FieldType::Timestamp, Decoder::Datetime);
        table.set(FieldType::Datetime, Decoder::Datetime);
        table.set(FieldType::Time, Decoder::Interval);
        table
    }

    pub fn set(&mut self, ty: FieldType, decoder: Decoder) -> &mut Self {
        self.decoders.insert(ty, decoder);
        self
    }

    pub fn decoder(&self, ty: FieldType) -> Decoder {
        self.decoders.get(&ty).copied().unwrap_or(Decoder::Bytes)
    }
}

impl Default for DecodeTable {
    fn default() -> Self {
        Self::provider()
    }
}
