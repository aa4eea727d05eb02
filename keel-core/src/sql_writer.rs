use crate::{
    ColumnConfig, DatePart, Dialect, DomainType, Error, Fragment, Operator, ProviderError, Result,
    TableRef, TrimSide,
};
use std::str::FromStr;

/// Dialect printer turning abstract operators and schema statements into SQL tokens.
///
/// The default methods render standard SQL, a provider overrides only what
/// its backend spells differently. Nothing here performs I/O.
pub trait SqlWriter {
    fn dialect(&self) -> &'static Dialect;

    /// Column type declaration for `ty`, used by [`SqlWriter::write_column_def`].
    fn column_type(&self, ty: DomainType, config: &ColumnConfig) -> Result<String>;

    fn unsupported(&self, operator: Operator) -> Error {
        let error = Error::new(ProviderError::unsupported(
            operator.name(),
            self.dialect().name,
        ));
        log::error!("{:#}", error);
        error
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Quote an identifier doubling inner quote characters.
    fn write_identifier_quoted(&self, out: &mut Fragment, value: &str) {
        let quote = self.dialect().quote_char;
        let value = self.dialect().normalize_name(value);
        let mut buff = String::with_capacity(value.len() + 2);
        buff.push(quote);
        self.write_escaped(&mut buff, value, quote, &format!("{quote}{quote}"));
        buff.push(quote);
        out.push_sql(buff);
    }

    fn write_table_ref(&self, out: &mut Fragment, value: &TableRef) {
        if let Some(schema) = &value.schema {
            self.write_identifier_quoted(out, schema);
            out.push_sql(".");
        }
        self.write_identifier_quoted(out, &value.name);
    }

    /// Single quoted string literal.
    fn write_value_string(&self, out: &mut Fragment, value: &str) {
        let mut buff = String::with_capacity(value.len() + 2);
        buff.push('\'');
        self.write_escaped(&mut buff, value, '\'', "''");
        buff.push('\'');
        out.push_sql(buff);
    }

    /// Resolve the operator by name and render it.
    fn render_operator(&self, name: &str, args: &[Fragment]) -> Result<Fragment> {
        let operator = Operator::from_str(name).map_err(|_| {
            let error = Error::new(ProviderError::unsupported(name, self.dialect().name));
            log::error!("{:#}", error);
            error
        })?;
        let mut out = Fragment::new();
        self.write_operator(&mut out, operator, args)?;
        Ok(out)
    }

    fn write_operator(
        &self,
        out: &mut Fragment,
        operator: Operator,
        args: &[Fragment],
    ) -> Result<()> {
        operator.check_arity(args.len()).map_err(|e| {
            let error = Error::new(e);
            log::error!("{:#}", error);
            error
        })?;
        if let Some(side) = operator.trim_side() {
            return self.write_trim(out, side, &args[0], args.get(1));
        }
        if let Some(part) = operator.date_part() {
            return self.write_date_part(out, part, &args[0]);
        }
        match operator {
            Operator::Concat => self.write_concat(out, args),
            Operator::Upper => self.write_function(out, "upper", args),
            Operator::Lower => self.write_function(out, "lower", args),
            Operator::Length => self.write_length(out, &args[0]),
            Operator::Abs => self.write_function(out, "abs", args),
            Operator::Coalesce => self.write_function(out, "coalesce", args),
            Operator::Random => self.write_random(out),
            Operator::Now => self.write_now(out),
            Operator::Ilike => self.write_ilike(out, &args[0], &args[1]),
            Operator::RegexpLike => self.write_regexp_like(out, &args[0], &args[1]),
            _ => Err(self.unsupported(operator)),
        }
    }

    /// `name(arg, arg, ...)`
    fn write_function(
        &self,
        out: &mut Fragment,
        name: &'static str,
        args: &[Fragment],
    ) -> Result<()> {
        out.push_sql(name).push_sql("(");
        out.append_separated(args, ", ");
        out.push_sql(")");
        Ok(())
    }

    fn write_concat(&self, out: &mut Fragment, args: &[Fragment]) -> Result<()> {
        out.push_sql("(");
        out.append_separated(args, " || ");
        out.push_sql(")");
        Ok(())
    }

    /// Number of characters.
    fn write_length(&self, out: &mut Fragment, expr: &Fragment) -> Result<()> {
        self.write_function(out, "length", std::slice::from_ref(expr))
    }

    fn write_random(&self, out: &mut Fragment) -> Result<()> {
        out.push_sql("random()");
        Ok(())
    }

    fn write_now(&self, out: &mut Fragment) -> Result<()> {
        out.push_sql("CURRENT_TIMESTAMP");
        Ok(())
    }

    /// Case insensitive match.
    fn write_ilike(&self, out: &mut Fragment, expr: &Fragment, pattern: &Fragment) -> Result<()> {
        out.append(expr).push_sql(" ILIKE ").append(pattern);
        Ok(())
    }

    /// No standard spelling, dialects opt in.
    fn write_regexp_like(
        &self,
        _out: &mut Fragment,
        _expr: &Fragment,
        _pattern: &Fragment,
    ) -> Result<()> {
        Err(self.unsupported(Operator::RegexpLike))
    }

    /// Without `chars` whitespace is stripped, otherwise only the given character set.
    fn write_trim(
        &self,
        out: &mut Fragment,
        side: TrimSide,
        expr: &Fragment,
        chars: Option<&Fragment>,
    ) -> Result<()> {
        let name = match side {
            TrimSide::Both => "trim",
            TrimSide::Leading => "ltrim",
            TrimSide::Trailing => "rtrim",
        };
        out.push_sql(name).push_sql("(").append(expr);
        if let Some(chars) = chars {
            out.push_sql(", ").append(chars);
        }
        out.push_sql(")");
        Ok(())
    }

    fn write_date_part(&self, out: &mut Fragment, part: DatePart, expr: &Fragment) -> Result<()> {
        out.push_sql("EXTRACT(")
            .push_sql(part.name())
            .push_sql(" FROM ")
            .append(expr)
            .push_sql(")");
        Ok(())
    }

    /// `CREATE TABLE [IF NOT EXISTS] <table>`, the clause only when the backend supports it.
    ///
    /// Returns whether the clause was emitted, when it was not the caller is
    /// expected to check the catalog first.
    fn write_create_table_head(
        &self,
        out: &mut Fragment,
        table: &TableRef,
        if_not_exists: bool,
    ) -> bool {
        out.push_sql("CREATE TABLE ");
        let emitted = if_not_exists && self.dialect().table_if_not_exists;
        if emitted {
            out.push_sql("IF NOT EXISTS ");
        }
        self.write_table_ref(out, table);
        emitted
    }

    /// `CREATE [UNIQUE] INDEX [IF NOT EXISTS] <name> ON <table> (<columns>)`
    fn write_create_index(
        &self,
        out: &mut Fragment,
        name: &str,
        table: &TableRef,
        columns: &[&str],
        unique: bool,
        if_not_exists: bool,
    ) -> bool {
        out.push_sql(if unique { "CREATE UNIQUE INDEX " } else { "CREATE INDEX " });
        let emitted = if_not_exists && self.dialect().index_if_not_exists;
        if emitted {
            out.push_sql("IF NOT EXISTS ");
        }
        self.write_identifier_quoted(out, name);
        out.push_sql(" ON ");
        self.write_table_ref(out, table);
        out.push_sql(" (");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push_sql(", ");
            }
            self.write_identifier_quoted(out, column);
        }
        out.push_sql(")");
        emitted
    }

    /// `<name> <type> [NOT NULL] [PRIMARY KEY ...]`
    fn write_column_def(
        &self,
        out: &mut Fragment,
        name: &str,
        ty: DomainType,
        config: &ColumnConfig,
        nullable: bool,
        primary_key: bool,
    ) -> Result<()> {
        self.write_identifier_quoted(out, name);
        out.push_sql(" ").push_sql(self.column_type(ty, config)?);
        if primary_key {
            out.push_sql(" PRIMARY KEY");
            if config.auto_increment {
                self.write_auto_increment(out);
            }
        } else if !nullable {
            out.push_sql(" NOT NULL");
        }
        Ok(())
    }

    fn write_auto_increment(&self, out: &mut Fragment) {
        out.push_sql(" GENERATED BY DEFAULT AS IDENTITY");
    }

    /// `ALTER TABLE <table> ADD CONSTRAINT <name> FOREIGN KEY (..) REFERENCES <parent> (..)`
    fn write_add_foreign_key(
        &self,
        out: &mut Fragment,
        name: &str,
        table: &TableRef,
        columns: &[&str],
        parent: &TableRef,
        parent_columns: &[&str],
    ) {
        let write_columns = |out: &mut Fragment, columns: &[&str]| {
            out.push_sql(" (");
            for (i, column) in columns.iter().enumerate() {
                if i > 0 {
                    out.push_sql(", ");
                }
                self.write_identifier_quoted(out, column);
            }
            out.push_sql(")");
        };
        out.push_sql("ALTER TABLE ");
        self.write_table_ref(out, table);
        out.push_sql(" ADD CONSTRAINT ");
        self.write_identifier_quoted(out, name);
        out.push_sql(" FOREIGN KEY");
        write_columns(out, columns);
        out.push_sql(" REFERENCES ");
        self.write_table_ref(out, parent);
        write_columns(out, parent_columns);
    }

    /// Row locking suffix of a select.
    fn write_for_update(&self, out: &mut Fragment, nowait: bool) -> Result<()> {
        out.push_sql(" FOR UPDATE");
        if nowait {
            if !self.dialect().select_for_update_nowait {
                let error = Error::new(ProviderError::unsupported(
                    "SELECT FOR UPDATE NOWAIT",
                    self.dialect().name,
                ));
                log::error!("{:#}", error);
                return Err(error);
            }
            out.push_sql(" NOWAIT");
        }
        Ok(())
    }
}
