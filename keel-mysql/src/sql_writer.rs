use crate::{MYSQL_DIALECT, MySQLConverters};
use keel_core::{
    ColumnConfig, ConverterRegistry, DatePart, Dialect, DomainType, Fragment, Operator, Result,
    SqlWriter, TrimSide,
};

/// Renders operators and schema statements with the MySQL spelling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MySQLSqlWriter {
    converters: MySQLConverters,
}

impl MySQLSqlWriter {
    /// Writer whose time columns use up to `max_time_precision` fractional digits.
    pub const fn new(max_time_precision: u8) -> Self {
        Self {
            converters: MySQLConverters::new(max_time_precision),
        }
    }
}

impl SqlWriter for MySQLSqlWriter {
    fn dialect(&self) -> &'static Dialect {
        &MYSQL_DIALECT
    }

    fn column_type(&self, ty: DomainType, config: &ColumnConfig) -> Result<String> {
        self.converters.column_type_for(ty, config)
    }

    fn write_value_string(&self, out: &mut Fragment, value: &str) {
        let mut buff = String::with_capacity(value.len() + 2);
        buff.push('\'');
        for c in value.chars() {
            match c {
                '\'' => buff.push_str("''"),
                '\\' => buff.push_str("\\\\"),
                _ => buff.push(c),
            }
        }
        buff.push('\'');
        out.push_sql(buff);
    }

    fn write_concat(&self, out: &mut Fragment, args: &[Fragment]) -> Result<()> {
        self.write_function(out, "concat", args)
    }

    fn write_length(&self, out: &mut Fragment, expr: &Fragment) -> Result<()> {
        self.write_function(out, "char_length", std::slice::from_ref(expr))
    }

    fn write_random(&self, out: &mut Fragment) -> Result<()> {
        out.push_sql("rand()");
        Ok(())
    }

    fn write_now(&self, out: &mut Fragment) -> Result<()> {
        out.push_sql("now()");
        Ok(())
    }

    fn write_ilike(
        &self,
        _out: &mut Fragment,
        _expr: &Fragment,
        _pattern: &Fragment,
    ) -> Result<()> {
        Err(self.unsupported(Operator::Ilike))
    }

    fn write_regexp_like(
        &self,
        out: &mut Fragment,
        expr: &Fragment,
        pattern: &Fragment,
    ) -> Result<()> {
        out.append(expr).push_sql(" REGEXP ").append(pattern);
        Ok(())
    }

    fn write_trim(
        &self,
        out: &mut Fragment,
        side: TrimSide,
        expr: &Fragment,
        chars: Option<&Fragment>,
    ) -> Result<()> {
        let Some(chars) = chars else {
            let name = match side {
                TrimSide::Both => "trim",
                TrimSide::Leading => "ltrim",
                TrimSide::Trailing => "rtrim",
            };
            return self.write_function(out, name, std::slice::from_ref(expr));
        };
        let side = match side {
            TrimSide::Both => "both",
            TrimSide::Leading => "leading",
            TrimSide::Trailing => "trailing",
        };
        out.push_sql("trim(")
            .push_sql(side)
            .push_sql(" ")
            .append(chars)
            .push_sql(" from ")
            .append(expr)
            .push_sql(")");
        Ok(())
    }

    fn write_date_part(&self, out: &mut Fragment, part: DatePart, expr: &Fragment) -> Result<()> {
        let name = match part {
            DatePart::Year => "year",
            DatePart::Month => "month",
            DatePart::Day => "day",
            DatePart::Hour => "hour",
            DatePart::Minute => "minute",
            DatePart::Second => "second",
        };
        self.write_function(out, name, std::slice::from_ref(expr))
    }

    fn write_auto_increment(&self, out: &mut Fragment) {
        out.push_sql(" AUTO_INCREMENT");
    }
}
