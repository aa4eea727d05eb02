#[cfg(test)]
mod tests {
    use keel_core::{
        AsValue, Dialect, DomainType, ParamStyle, ProviderError, RowLabeled, TableRef, Value,
    };
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    #[test]
    fn typed_nulls() {
        assert!(Value::Null.is_null());
        assert_eq!(Value::Null.domain_type(), None);
        for ty in DomainType::ALL {
            let empty = ty.empty_value();
            assert!(empty.is_null(), "{ty}");
            assert_eq!(empty.domain_type(), Some(ty));
        }
        assert_eq!(Option::<i32>::None.as_value(), Value::Int32(None));
        assert_eq!(Option::<String>::None.as_value(), Value::Varchar(None));
        assert!(Value::Int32(None).same_type(&Value::Int32(Some(5))));
        assert!(!Value::Int32(None).same_type(&Value::Int64(None)));
    }

    #[test]
    fn native_values() {
        assert_eq!(true.as_value(), Value::Boolean(Some(true)));
        assert_eq!(
            Decimal::from_str("12.50").unwrap().as_value(),
            Value::Decimal(Some(Decimal::new(1250, 2)))
        );
        assert_eq!(
            Value::from("text"),
            Value::Varchar(Some("text".to_string()))
        );
        assert_eq!(
            datetime!(2024-01-02 03:04:05.5).as_value(),
            Value::Timestamp(Some(datetime!(2024-01-02 03:04:05.5)))
        );

        let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
        assert_eq!(Uuid::try_from_value(id.as_value()).unwrap(), id);
        assert_eq!(i64::try_from_value(Value::Int16(Some(-3))).unwrap(), -3);
        assert_eq!(
            time::Date::try_from_value(Value::Timestamp(Some(datetime!(2024-01-02 03:04))))
                .unwrap(),
            date!(2024 - 01 - 02)
        );
        assert_eq!(
            Option::<bool>::try_from_value(Value::Boolean(None)).unwrap(),
            None
        );
    }

    #[test]
    fn mismatches_are_conversion_errors() {
        let error = i32::try_from_value(Value::Varchar(Some("12".into())))
            .expect_err("Text is not an integer");
        assert!(matches!(
            error.downcast_ref::<ProviderError>(),
            Some(ProviderError::Conversion { target: "i32", .. })
        ));
        assert!(i32::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert!(i16::try_from_value(Value::Int16(None)).is_err());
    }

    #[test]
    fn row_lookup() {
        let row = RowLabeled::new(
            ["Variable_name".to_string(), "Value".to_string()].into(),
            [
                Value::Varchar(Some("foreign_key_checks".into())),
                Value::Varchar(Some("ON".into())),
            ]
            .into(),
        );
        assert_eq!(row.get_column("value").and_then(Value::as_str), Some("ON"));
        assert_eq!(row.get(0).and_then(Value::as_str), Some("foreign_key_checks"));
        assert_eq!(row.get_column("missing"), None);
    }

    #[test]
    fn table_refs() {
        assert_eq!(TableRef::parse("orders"), TableRef::new("orders"));
        assert_eq!(
            TableRef::parse("shop.orders"),
            TableRef::with_schema("shop", "orders")
        );
        assert_eq!(
            TableRef::parse("`my.shop`.`order``s`"),
            TableRef::with_schema("my.shop", "order`s")
        );
        assert_eq!(TableRef::from("shop.orders").schema(), Some("shop"));
    }

    #[test]
    fn dialect_helpers() {
        let dialect = Dialect {
            name: "Test",
            quote_char: '`',
            param_style: ParamStyle::Numeric,
            max_name_len: 4,
            table_if_not_exists: true,
            index_if_not_exists: false,
            select_for_update_nowait: false,
            inline_fk_syntax: false,
            default_time_precision: 3,
            max_time_precision: 6,
        };
        assert_eq!(dialect.placeholder(0), ":1");
        assert_eq!(dialect.placeholder(9), ":10");
        assert_eq!(dialect.normalize_name("abc"), "abc");
        assert_eq!(dialect.normalize_name("abcdef"), "abcd");
        assert_eq!(dialect.normalize_name("àèìòù"), "àèìò");
        assert_eq!(dialect.time_precision(None, 6), 3);
        assert_eq!(dialect.time_precision(Some(6), 0), 0);
        assert_eq!(dialect.time_precision(Some(9), 6), 6);
    }
}
