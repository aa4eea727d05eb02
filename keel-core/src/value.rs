use rust_decimal::Decimal;
use std::fmt::{self, Display};
use time::{Date, Duration, PrimitiveDateTime};
use uuid::Uuid;

/// Closed set of domain types a provider knows how to store.
///
/// Every provider selects exactly one converter for each variant, the match
/// over this enum is exhaustive so adding a type forces every provider to
/// handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DomainType {
    Boolean,
    /// Unicode text.
    Unicode,
    /// Text stored as raw bytes in the column character set.
    ByteString,
    SmallInt,
    Int,
    BigInt,
    Float,
    Decimal,
    Blob,
    Date,
    Datetime,
    /// Signed time delta.
    Interval,
    Uuid,
}

impl DomainType {
    pub const ALL: [DomainType; 13] = [
        DomainType::Boolean,
        DomainType::Unicode,
        DomainType::ByteString,
        DomainType::SmallInt,
        DomainType::Int,
        DomainType::BigInt,
        DomainType::Float,
        DomainType::Decimal,
        DomainType::Blob,
        DomainType::Date,
        DomainType::Datetime,
        DomainType::Interval,
        DomainType::Uuid,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            DomainType::Boolean => "boolean",
            DomainType::Unicode => "unicode",
            DomainType::ByteString => "byte string",
            DomainType::SmallInt => "small integer",
            DomainType::Int => "integer",
            DomainType::BigInt => "big integer",
            DomainType::Float => "float",
            DomainType::Decimal => "decimal",
            DomainType::Blob => "blob",
            DomainType::Date => "date",
            DomainType::Datetime => "datetime",
            DomainType::Interval => "interval",
            DomainType::Uuid => "uuid",
        }
    }

    /// The typed NULL of this domain type.
    pub const fn empty_value(&self) -> Value {
        match self {
            DomainType::Boolean => Value::Boolean(None),
            DomainType::Unicode => Value::Varchar(None),
            DomainType::ByteString => Value::ByteString(None),
            DomainType::SmallInt => Value::Int16(None),
            DomainType::Int => Value::Int32(None),
            DomainType::BigInt => Value::Int64(None),
            DomainType::Float => Value::Float64(None),
            DomainType::Decimal => Value::Decimal(None),
            DomainType::Blob => Value::Blob(None),
            DomainType::Date => Value::Date(None),
            DomainType::Datetime => Value::Timestamp(None),
            DomainType::Interval => Value::Interval(None),
            DomainType::Uuid => Value::Uuid(None),
        }
    }
}

impl Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Dynamically typed value moving between the engine and the backend.
///
/// A `None` payload is a NULL that still remembers its domain type, `Null` is
/// the untyped NULL.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Varchar(Option<String>),
    ByteString(Option<Box<[u8]>>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Timestamp(Option<PrimitiveDateTime>),
    Interval(Option<Duration>),
    Uuid(Option<Uuid>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::ByteString(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::Interval(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// Domain type of the value, `None` only for the untyped `Null`.
    pub fn domain_type(&self) -> Option<DomainType> {
        Some(match self {
            Value::Null => return None,
            Value::Boolean(..) => DomainType::Boolean,
            Value::Varchar(..) => DomainType::Unicode,
            Value::ByteString(..) => DomainType::ByteString,
            Value::Int16(..) => DomainType::SmallInt,
            Value::Int32(..) => DomainType::Int,
            Value::Int64(..) => DomainType::BigInt,
            Value::Float64(..) => DomainType::Float,
            Value::Decimal(..) => DomainType::Decimal,
            Value::Blob(..) => DomainType::Blob,
            Value::Date(..) => DomainType::Date,
            Value::Timestamp(..) => DomainType::Datetime,
            Value::Interval(..) => DomainType::Interval,
            Value::Uuid(..) => DomainType::Uuid,
        })
    }

    pub fn same_type(&self, other: &Self) -> bool {
        self.domain_type() == other.domain_type()
    }

    /// Text content when the value is a non null `Varchar` or a `ByteString` holding UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Varchar(Some(v)) => Some(v),
            Value::ByteString(Some(v)) => std::str::from_utf8(v).ok(),
            _ => None,
        }
    }
}
