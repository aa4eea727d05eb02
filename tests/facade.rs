#[cfg(test)]
mod tests {
    use indoc::indoc;
    use keel::{
        ColumnConfig, DomainType, Driver, Fragment, Query, SqlWriter, TableRef,
        mysql::{MySQLConfig, MySQLDriver},
    };

    #[test]
    fn create_table_through_the_facade() {
        let driver = MySQLDriver::new();
        let writer = driver.sql_writer();
        let table = TableRef::parse("shop.customers");
        let mut out = Fragment::new();
        writer.write_create_table_head(&mut out, &table, true);
        out.push_sql(" (\n    ");
        writer
            .write_column_def(
                &mut out,
                "id",
                DomainType::BigInt,
                &ColumnConfig::new().auto_increment(true),
                false,
                true,
            )
            .unwrap();
        out.push_sql(",\n    ");
        writer
            .write_column_def(
                &mut out,
                "name",
                DomainType::Unicode,
                &ColumnConfig::new().max_len(80),
                false,
                false,
            )
            .unwrap();
        out.push_sql("\n)");
        let query = Query::from_fragment(out, driver.dialect());
        assert_eq!(
            query.sql,
            indoc! {"
                CREATE TABLE IF NOT EXISTS `shop`.`customers` (
                    `id` BIGINT PRIMARY KEY AUTO_INCREMENT,
                    `name` VARCHAR(80) CHARACTER SET utf8 NOT NULL
                )"}
        );
        assert!(query.params.is_empty());
    }

    #[test]
    fn parameters_use_question_marks() {
        let writer = MySQLDriver::new().sql_writer();
        let mut out = Fragment::sql("SELECT * FROM ");
        writer.write_table_ref(&mut out, &TableRef::new("orders"));
        out.push_sql(" WHERE ")
            .append(
                &writer
                    .render_operator("year", &[Fragment::sql("created")])
                    .unwrap(),
            )
            .push_sql(" = ")
            .push_param(2024i32)
            .push_sql(" AND label = ")
            .push_param("x");
        let query = Query::from_fragment(out, writer.dialect());
        assert_eq!(
            query.sql,
            "SELECT * FROM `orders` WHERE year(created) = ? AND label = ?"
        );
        assert_eq!(query.params.len(), 2);
        assert_eq!(
            MySQLConfig::from_url("mysql://app@localhost/shop")
                .unwrap()
                .pool_key()
                .to_string(),
            "app@localhost:3306/shop"
        );
    }
}
