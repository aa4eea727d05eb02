use std::fmt::{self, Display};

/// A table name split into its optional schema qualifier and the bare name.
#[derive(Default, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TableRef {
    pub schema: Option<String>,
    pub name: String,
}

impl TableRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    pub fn with_schema(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    /// Splits `schema.table` on the last dot outside of quotes.
    ///
    /// Parts may be quoted with backticks or double quotes, the quotes are removed.
    pub fn parse(value: &str) -> Self {
        let mut quote: Option<char> = None;
        let mut split = None;
        for (i, c) in value.char_indices() {
            match (quote, c) {
                (None, '`' | '"') => quote = Some(c),
                (Some(q), c) if q == c => quote = None,
                (None, '.') => split = Some(i),
                _ => {}
            }
        }
        match split {
            Some(i) => Self::with_schema(unquote(&value[..i]), unquote(&value[i + 1..])),
            None => Self::new(unquote(value)),
        }
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }
}

fn unquote(value: &str) -> String {
    let value = value.trim();
    for quote in ['`', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            let inner = &value[1..value.len() - 1];
            let doubled = format!("{quote}{quote}");
            return inner.replace(&doubled, &quote.to_string());
        }
    }
    value.to_string()
}

impl From<&str> for TableRef {
    fn from(value: &str) -> Self {
        TableRef::parse(value)
    }
}

impl Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(schema) = &self.schema {
            write!(f, "{}.", schema)?;
        }
        f.write_str(&self.name)
    }
}
