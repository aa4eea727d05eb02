use crate::{BINARY_CHARSET, DecodeTable, FieldType};
use keel_core::{Converter, ErrorContext, Result, Row, RowLabeled, RowNames};

/// Decodes one server row through `table`.
pub(crate) fn decode_row(mut row: mysql_async::Row, table: &DecodeTable) -> Result<RowLabeled> {
    let columns = row.columns();
    let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
    let values: Row = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let raw = row
                .take::<mysql_async::Value, _>(i)
                .unwrap_or(mysql_async::Value::NULL);
            let binary = column.character_set() == BINARY_CHARSET;
            table
                .decoder(FieldType::from(column.column_type()))
                .converter(binary)
                .from_wire(raw)
                .with_context(|| format!("While decoding the column `{}`", column.name_str()))
        })
        .collect::<Result<_>>()?;
    Ok(RowLabeled::new(names, values))
}
