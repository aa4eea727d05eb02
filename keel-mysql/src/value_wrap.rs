use crate::MySQLConverter;
use keel_core::{Converter, Error, Value};

/// Statement parameter on its way to the server.
pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        match MySQLConverter::for_value(&value.0) {
            Some(converter) => converter.to_wire(value.0),
            None => Ok(mysql_async::Value::NULL),
        }
    }
}
