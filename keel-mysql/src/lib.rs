mod config;
mod connection;
mod constraints;
mod conversions;
mod converter;
mod decode;
mod driver;
mod introspect;
mod row_wrap;
mod sql_writer;
mod value_wrap;

pub use config::*;
pub use connection::*;
pub use conversions::{str_to_datetime, str_to_duration};
pub use converter::*;
pub use decode::*;
pub use driver::*;
pub(crate) use row_wrap::*;
pub use sql_writer::*;
pub(crate) use value_wrap::*;
