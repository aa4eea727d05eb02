use crate::{DomainType, Result, Value};

/// Per column configuration captured by a converter when it is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnConfig {
    /// Maximum length in characters of text columns.
    pub max_len: Option<u32>,
    /// Character set of text columns.
    pub encoding: Option<String>,
    /// Decimal precision, or fractional seconds digits of time columns.
    pub precision: Option<u8>,
    pub scale: Option<u8>,
    pub auto_increment: bool,
}

impl ColumnConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn max_len(mut self, value: u32) -> Self {
        self.max_len = Some(value);
        self
    }
    pub fn encoding(mut self, value: impl Into<String>) -> Self {
        self.encoding = Some(value.into());
        self
    }
    pub fn precision(mut self, value: u8) -> Self {
        self.precision = Some(value);
        self
    }
    pub fn scale(mut self, value: u8) -> Self {
        self.scale = Some(value);
        self
    }
    pub fn auto_increment(mut self, value: bool) -> Self {
        self.auto_increment = value;
        self
    }
}

/// Stateless rule pairing a domain type with its column type and wire format.
pub trait Converter {
    /// Parameter and column representation of the transport.
    type Wire;

    fn domain_type(&self) -> DomainType;
    /// Column type declaration used in DDL.
    fn sql_type(&self) -> String;
    fn to_wire(&self, value: Value) -> Result<Self::Wire>;
    fn from_wire(&self, raw: Self::Wire) -> Result<Value>;
}

/// Selects the converter of a domain type.
pub trait ConverterRegistry {
    type Converter: Converter;

    fn converter(&self, ty: DomainType, config: &ColumnConfig) -> Result<Self::Converter>;

    fn column_type_for(&self, ty: DomainType, config: &ColumnConfig) -> Result<String> {
        Ok(self.converter(ty, config)?.sql_type())
    }
}
