use crate::{Dialect, Value};
use std::{
    borrow::Cow,
    fmt::{self, Display},
};

/// One piece of rendered SQL.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Literal SQL text.
    Sql(Cow<'static, str>),
    /// A bind parameter, spelled by the dialect placeholder when the fragment is built.
    Param(Value),
}

/// Sequence of tokens produced by the renderer.
///
/// Operands handed to [`crate::SqlWriter::write_operator`] are fragments
/// already rendered by the engine, the writer only stitches them together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    pub tokens: Vec<Token>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sql(value: impl Into<Cow<'static, str>>) -> Self {
        let mut result = Self::new();
        result.push_sql(value);
        result
    }

    pub fn param(value: impl Into<Value>) -> Self {
        let mut result = Self::new();
        result.push_param(value);
        result
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Appends literal text, merging with a preceding literal.
    pub fn push_sql(&mut self, value: impl Into<Cow<'static, str>>) -> &mut Self {
        let value = value.into();
        if value.is_empty() {
            return self;
        }
        match self.tokens.last_mut() {
            Some(Token::Sql(last)) => last.to_mut().push_str(&value),
            _ => self.tokens.push(Token::Sql(value)),
        }
        self
    }

    pub fn push_param(&mut self, value: impl Into<Value>) -> &mut Self {
        self.tokens.push(Token::Param(value.into()));
        self
    }

    pub fn append(&mut self, other: &Fragment) -> &mut Self {
        for token in &other.tokens {
            match token {
                Token::Sql(v) => self.push_sql(v.clone()),
                Token::Param(v) => self.push_param(v.clone()),
            };
        }
        self
    }

    /// Appends every fragment with `separator` in between.
    pub fn append_separated<'a>(
        &mut self,
        values: impl IntoIterator<Item = &'a Fragment>,
        separator: &'static str,
    ) -> &mut Self {
        for (i, v) in values.into_iter().enumerate() {
            if i > 0 {
                self.push_sql(separator);
            }
            self.append(v);
        }
        self
    }

    /// Final SQL text with the dialect placeholders, plus the ordered parameters.
    pub fn build(self, dialect: &Dialect) -> (String, Vec<Value>) {
        let mut sql = String::new();
        let mut params = Vec::new();
        for token in self.tokens {
            match token {
                Token::Sql(v) => sql.push_str(&v),
                Token::Param(v) => {
                    sql.push_str(&dialect.placeholder(params.len()));
                    params.push(v);
                }
            }
        }
        (sql, params)
    }
}

impl From<&'static str> for Fragment {
    fn from(value: &'static str) -> Self {
        Fragment::sql(value)
    }
}

impl From<String> for Fragment {
    fn from(value: String) -> Self {
        Fragment::sql(value)
    }
}

/// Debug friendly rendering, parameters appear as `{value:?}`.
impl Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                Token::Sql(v) => f.write_str(v)?,
                Token::Param(v) => write!(f, "{{{:?}}}", v)?,
            }
        }
        Ok(())
    }
}
