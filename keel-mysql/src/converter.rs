use crate::{
    MYSQL_DIALECT,
    conversions::{
        date_to_wire, datetime_to_wire, duration_to_wire, text, wire_to_date, wire_to_datetime,
        wire_to_duration, wire_to_text,
    },
};
use keel_core::{
    AsValue, ColumnConfig, Converter, ConverterRegistry, DomainType, Error, ProviderError, Result,
    Value, truncate_long,
};
use mysql_async::Value as WireValue;
use rust_decimal::Decimal;
use std::str::FromStr;
use time::{Date, Duration, PrimitiveDateTime};
use uuid::Uuid;

pub const DEFAULT_ENCODING: &str = "utf8";
pub const DEFAULT_DECIMAL_PRECISION: u8 = 12;
pub const DEFAULT_DECIMAL_SCALE: u8 = 2;
/// Largest `DECIMAL` the server accepts.
pub const MAX_DECIMAL_PRECISION: u8 = 65;
pub const MAX_DECIMAL_SCALE: u8 = 30;

/// Rule pairing one domain type with its MySQL column type and wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MySQLConverter {
    Boolean,
    Unicode {
        max_len: Option<u32>,
        encoding: String,
    },
    ByteString {
        max_len: Option<u32>,
        encoding: String,
    },
    SmallInt,
    Int,
    BigInt,
    Float,
    Decimal {
        precision: u8,
        scale: u8,
    },
    Blob,
    Date,
    Datetime {
        precision: u8,
    },
    Interval {
        precision: u8,
    },
    Uuid,
}

impl MySQLConverter {
    /// Converter used to bind a loose parameter, picked from the value itself.
    ///
    /// `None` for the untyped `Null`.
    pub fn for_value(value: &Value) -> Option<Self> {
        let ty = value.domain_type()?;
        let config = match ty {
            DomainType::Decimal => ColumnConfig::new()
                .precision(MAX_DECIMAL_PRECISION)
                .scale(MAX_DECIMAL_SCALE),
            DomainType::Datetime | DomainType::Interval => ColumnConfig::new().precision(6),
            _ => ColumnConfig::new(),
        };
        MySQLConverters::new(6).converter(ty, &config).ok()
    }

    fn check_len(&self, value: &str, max_len: Option<u32>, len: usize) -> Result<()> {
        match max_len {
            Some(max) if len > max as usize => Err(ProviderError::conversion(
                truncate_long!(value),
                self.domain_type().name(),
                format!("length {len} exceeds the maximum of {max}"),
            )
            .into()),
            _ => Ok(()),
        }
    }

    fn mismatch(&self, raw: &WireValue) -> Error {
        ProviderError::conversion(
            format!("{:?}", raw),
            self.domain_type().name(),
            "unexpected wire value",
        )
        .into()
    }

    fn integer(&self, raw: WireValue) -> Result<i64> {
        match raw {
            WireValue::Int(v) => Ok(v),
            WireValue::UInt(v) => i64::try_from(v).map_err(|e| {
                ProviderError::conversion(v.to_string(), self.domain_type().name(), e.to_string())
                    .into()
            }),
            WireValue::Bytes(v) => {
                let text = text(&v, self.domain_type().name())?;
                text.trim().parse::<i64>().map_err(|e| {
                    ProviderError::conversion(text, self.domain_type().name(), e.to_string())
                        .into()
                })
            }
            v => Err(self.mismatch(&v)),
        }
    }

    fn narrow<T: TryFrom<i64>>(&self, value: i64) -> Result<T> {
        T::try_from(value).map_err(|_| {
            ProviderError::conversion(
                value.to_string(),
                self.domain_type().name(),
                "out of range",
            )
            .into()
        })
    }
}

impl Converter for MySQLConverter {
    type Wire = WireValue;

    fn domain_type(&self) -> DomainType {
        match self {
            MySQLConverter::Boolean => DomainType::Boolean,
            MySQLConverter::Unicode { .. } => DomainType::Unicode,
            MySQLConverter::ByteString { .. } => DomainType::ByteString,
            MySQLConverter::SmallInt => DomainType::SmallInt,
            MySQLConverter::Int => DomainType::Int,
            MySQLConverter::BigInt => DomainType::BigInt,
            MySQLConverter::Float => DomainType::Float,
            MySQLConverter::Decimal { .. } => DomainType::Decimal,
            MySQLConverter::Blob => DomainType::Blob,
            MySQLConverter::Date => DomainType::Date,
            MySQLConverter::Datetime { .. } => DomainType::Datetime,
            MySQLConverter::Interval { .. } => DomainType::Interval,
            MySQLConverter::Uuid => DomainType::Uuid,
        }
    }

    fn sql_type(&self) -> String {
        match self {
            MySQLConverter::Boolean => "BOOLEAN".into(),
            MySQLConverter::Unicode { max_len, encoding }
            | MySQLConverter::ByteString { max_len, encoding } => match max_len {
                Some(len) => format!("VARCHAR({len}) CHARACTER SET {encoding}"),
                None => format!("LONGTEXT CHARACTER SET {encoding}"),
            },
            MySQLConverter::SmallInt => "SMALLINT".into(),
            MySQLConverter::Int => "INTEGER".into(),
            MySQLConverter::BigInt => "BIGINT".into(),
            MySQLConverter::Float => "DOUBLE".into(),
            MySQLConverter::Decimal { precision, scale } => {
                format!("DECIMAL({precision},{scale})")
            }
            MySQLConverter::Blob => "LONGBLOB".into(),
            MySQLConverter::Date => "DATE".into(),
            MySQLConverter::Datetime { precision: 0 } => "DATETIME".into(),
            MySQLConverter::Datetime { precision } => format!("DATETIME({precision})"),
            MySQLConverter::Interval { precision: 0 } => "TIME".into(),
            MySQLConverter::Interval { precision } => format!("TIME({precision})"),
            MySQLConverter::Uuid => "BINARY(16)".into(),
        }
    }

    fn to_wire(&self, value: Value) -> Result<WireValue> {
        if value.is_null() {
            return Ok(WireValue::NULL);
        }
        Ok(match self {
            MySQLConverter::Boolean => WireValue::Int(bool::try_from_value(value)? as i64),
            MySQLConverter::Unicode { max_len, .. } => {
                let v = String::try_from_value(value)?;
                self.check_len(&v, *max_len, v.chars().count())?;
                WireValue::Bytes(v.into_bytes())
            }
            MySQLConverter::ByteString { max_len, .. } => {
                let v: Box<[u8]> = match value {
                    Value::Varchar(Some(v)) => v.into_bytes().into(),
                    v => Box::<[u8]>::try_from_value(v)?,
                };
                self.check_len(&String::from_utf8_lossy(&v), *max_len, v.len())?;
                WireValue::Bytes(v.into_vec())
            }
            MySQLConverter::SmallInt => WireValue::Int(i16::try_from_value(value)? as i64),
            MySQLConverter::Int => WireValue::Int(i32::try_from_value(value)? as i64),
            MySQLConverter::BigInt => WireValue::Int(i64::try_from_value(value)?),
            MySQLConverter::Float => WireValue::Double(f64::try_from_value(value)?),
            MySQLConverter::Decimal { precision, scale } => {
                let v = Decimal::try_from_value(value)?.round_dp(*scale as u32);
                let integer_digits = v.trunc().abs().to_string().trim_start_matches('0').len();
                if integer_digits > precision.saturating_sub(*scale) as usize {
                    return Err(ProviderError::conversion(
                        v.to_string(),
                        "DECIMAL",
                        format!("does not fit DECIMAL({precision},{scale})"),
                    )
                    .into());
                }
                WireValue::Bytes(v.to_string().into_bytes())
            }
            MySQLConverter::Blob => WireValue::Bytes(Box::<[u8]>::try_from_value(value)?.into()),
            MySQLConverter::Date => date_to_wire(Date::try_from_value(value)?)?,
            MySQLConverter::Datetime { precision } => {
                datetime_to_wire(PrimitiveDateTime::try_from_value(value)?, *precision)?
            }
            MySQLConverter::Interval { precision } => {
                duration_to_wire(Duration::try_from_value(value)?, *precision)?
            }
            MySQLConverter::Uuid => {
                WireValue::Bytes(Uuid::try_from_value(value)?.as_bytes().to_vec())
            }
        })
    }

    fn from_wire(&self, raw: WireValue) -> Result<Value> {
        if matches!(raw, WireValue::NULL) {
            return Ok(self.domain_type().empty_value());
        }
        Ok(match self {
            MySQLConverter::Boolean => Value::Boolean(Some(self.integer(raw)? != 0)),
            MySQLConverter::Unicode { .. } => match raw {
                WireValue::Bytes(v) => Value::Varchar(Some(text(&v, "VARCHAR")?)),
                v => Value::Varchar(Some(wire_to_text(&v).ok_or_else(|| self.mismatch(&v))?)),
            },
            MySQLConverter::ByteString { .. } => match raw {
                WireValue::Bytes(v) => Value::ByteString(Some(v.into())),
                v => Value::ByteString(Some(
                    wire_to_text(&v)
                        .ok_or_else(|| self.mismatch(&v))?
                        .into_bytes()
                        .into(),
                )),
            },
            MySQLConverter::SmallInt => Value::Int16(Some(self.narrow(self.integer(raw)?)?)),
            MySQLConverter::Int => Value::Int32(Some(self.narrow(self.integer(raw)?)?)),
            MySQLConverter::BigInt => Value::Int64(Some(self.integer(raw)?)),
            MySQLConverter::Float => Value::Float64(Some(match raw {
                WireValue::Double(v) => v,
                WireValue::Float(v) => v as f64,
                WireValue::Int(v) => v as f64,
                WireValue::Bytes(v) => {
                    let text = text(&v, "DOUBLE")?;
                    text.trim().parse::<f64>().map_err(|e| {
                        ProviderError::conversion(text.as_str(), "DOUBLE", e.to_string())
                    })?
                }
                v => return Err(self.mismatch(&v)),
            })),
            MySQLConverter::Decimal { .. } => Value::Decimal(Some(match raw {
                WireValue::Int(v) => Decimal::from(v),
                WireValue::UInt(v) => Decimal::from(v),
                WireValue::Bytes(v) => {
                    let text = text(&v, "DECIMAL")?;
                    Decimal::from_str(text.trim()).map_err(|e| {
                        ProviderError::conversion(text.as_str(), "DECIMAL", e.to_string())
                    })?
                }
                v => return Err(self.mismatch(&v)),
            })),
            MySQLConverter::Blob => match raw {
                WireValue::Bytes(v) => Value::Blob(Some(v.into())),
                v => return Err(self.mismatch(&v)),
            },
            MySQLConverter::Date => Value::Date(Some(wire_to_date(raw)?)),
            MySQLConverter::Datetime { .. } => Value::Timestamp(Some(wire_to_datetime(raw)?)),
            MySQLConverter::Interval { .. } => Value::Interval(Some(wire_to_duration(raw)?)),
            MySQLConverter::Uuid => match raw {
                WireValue::Bytes(v) => Value::Uuid(Some(Uuid::from_slice(&v).map_err(|e| {
                    ProviderError::conversion(format!("{v:?}"), "BINARY(16)", e.to_string())
                })?)),
                v => return Err(self.mismatch(&v)),
            },
        })
    }
}

/// MySQL converter registry, aware of the time precision the server supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MySQLConverters {
    max_time_precision: u8,
}

impl MySQLConverters {
    pub const fn new(max_time_precision: u8) -> Self {
        Self { max_time_precision }
    }

    pub const fn max_time_precision(&self) -> u8 {
        self.max_time_precision
    }
}

impl Default for MySQLConverters {
    fn default() -> Self {
        Self::new(MYSQL_DIALECT.max_time_precision)
    }
}

impl ConverterRegistry for MySQLConverters {
    type Converter = MySQLConverter;

    fn converter(&self, ty: DomainType, config: &ColumnConfig) -> Result<MySQLConverter> {
        let encoding = || {
            config
                .encoding
                .clone()
                .unwrap_or_else(|| DEFAULT_ENCODING.to_string())
        };
        Ok(match ty {
            DomainType::Boolean => MySQLConverter::Boolean,
            DomainType::Unicode => MySQLConverter::Unicode {
                max_len: config.max_len,
                encoding: encoding(),
            },
            DomainType::ByteString => MySQLConverter::ByteString {
                max_len: config.max_len,
                encoding: encoding(),
            },
            DomainType::SmallInt => MySQLConverter::SmallInt,
            DomainType::Int => MySQLConverter::Int,
            DomainType::BigInt => MySQLConverter::BigInt,
            DomainType::Float => MySQLConverter::Float,
            DomainType::Decimal => {
                let precision = config.precision.unwrap_or(DEFAULT_DECIMAL_PRECISION);
                let scale = config.scale.unwrap_or(DEFAULT_DECIMAL_SCALE);
                if !(1..=MAX_DECIMAL_PRECISION).contains(&precision)
                    || scale > MAX_DECIMAL_SCALE
                    || scale > precision
                {
                    let error = Error::msg(format!(
                        "Invalid DECIMAL({precision},{scale}): precision must be in 1..={}, \
                         scale at most {} and not above the precision",
                        MAX_DECIMAL_PRECISION, MAX_DECIMAL_SCALE
                    ));
                    log::error!("{:#}", error);
                    return Err(error);
                }
                MySQLConverter::Decimal { precision, scale }
            }
            DomainType::Blob => MySQLConverter::Blob,
            DomainType::Date => MySQLConverter::Date,
            DomainType::Datetime => MySQLConverter::Datetime {
                precision: MYSQL_DIALECT
                    .time_precision(config.precision, self.max_time_precision),
            },
            DomainType::Interval => MySQLConverter::Interval {
                precision: MYSQL_DIALECT
                    .time_precision(config.precision, self.max_time_precision),
            },
            DomainType::Uuid => MySQLConverter::Uuid,
        })
    }
}
