use std::borrow::Cow;

/// How bind parameters are spelled in the SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `?`
    Qmark,
    /// `%s`
    Format,
    /// `:1`, `:2`, ...
    Numeric,
    /// `$1`, `$2`, ...
    Dollar,
}

/// Syntax facts of one SQL backend.
///
/// Built once as a constant when the provider is defined and only ever shared
/// by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialect {
    pub name: &'static str,
    pub quote_char: char,
    pub param_style: ParamStyle,
    pub max_name_len: usize,
    /// `CREATE TABLE IF NOT EXISTS` is understood natively.
    pub table_if_not_exists: bool,
    /// `CREATE INDEX IF NOT EXISTS` is understood natively.
    pub index_if_not_exists: bool,
    pub select_for_update_nowait: bool,
    /// Foreign keys can be declared inside `CREATE TABLE`.
    pub inline_fk_syntax: bool,
    pub default_time_precision: u8,
    pub max_time_precision: u8,
}

impl Dialect {
    /// Placeholder for the parameter at `index` (from 0).
    pub fn placeholder(&self, index: usize) -> Cow<'static, str> {
        match self.param_style {
            ParamStyle::Qmark => Cow::Borrowed("?"),
            ParamStyle::Format => Cow::Borrowed("%s"),
            ParamStyle::Numeric => Cow::Owned(format!(":{}", index + 1)),
            ParamStyle::Dollar => Cow::Owned(format!("${}", index + 1)),
        }
    }

    /// Truncates an identifier to the longest name the backend accepts.
    pub fn normalize_name<'a>(&self, name: &'a str) -> &'a str {
        match name.char_indices().nth(self.max_name_len) {
            Some((end, _)) => {
                log::warn!(
                    "Identifier `{}` is longer than {} characters and will be truncated",
                    name,
                    self.max_name_len
                );
                &name[..end]
            }
            None => name,
        }
    }

    /// Fractional seconds precision effectively usable, given what the server supports.
    pub fn time_precision(&self, requested: Option<u8>, server_max: u8) -> u8 {
        requested
            .unwrap_or(self.default_time_precision)
            .min(server_max)
            .min(6)
    }
}
