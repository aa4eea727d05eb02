mod as_value;
mod converter;
mod dialect;
mod driver;
mod error;
mod executor;
mod fragment;
mod operator;
mod pool;
mod query;
mod sql_writer;
mod table_ref;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use converter::*;
pub use dialect::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use fragment::*;
pub use operator::*;
pub use pool::*;
pub use query::*;
pub use sql_writer::*;
pub use table_ref::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
