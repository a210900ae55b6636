use rusqlite::types::Value;

use crate::error::DriverError;
use crate::types::{ParamType, RowValues};

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Positional `SQLite` parameters.
pub struct Params(pub Vec<Value>);

impl Params {
    #[must_use]
    pub fn convert(params: &[RowValues]) -> Self {
        Params(params.iter().map(row_value_to_sqlite_value).collect())
    }

    #[must_use]
    pub fn as_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.0.iter().map(|v| v as &dyn rusqlite::ToSql).collect()
    }
}

fn quote_text(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn quote_blob(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    format!("X'{hex}'")
}

/// Render `value` as an `SQLite` literal, coerced to `param_type`.
///
/// # Errors
/// Returns `DriverError` when the value cannot be represented as `param_type`.
pub fn quote_literal(value: &RowValues, param_type: ParamType) -> Result<String, DriverError> {
    let not_representable =
        || DriverError::new(format!("cannot quote {value:?} as {param_type:?}"));

    match param_type {
        ParamType::Null => Ok("NULL".to_string()),
        ParamType::Int => match value {
            RowValues::Int(i) => Ok(i.to_string()),
            RowValues::Bool(b) => Ok(i64::from(*b).to_string()),
            RowValues::Text(s) => s
                .trim()
                .parse::<i64>()
                .map(|i| i.to_string())
                .map_err(|_| not_representable()),
            _ => Err(not_representable()),
        },
        ParamType::Bool => value
            .as_bool()
            .map(|b| i64::from(*b).to_string())
            .ok_or_else(not_representable),
        ParamType::Lob => match value {
            RowValues::Blob(bytes) => Ok(quote_blob(bytes)),
            RowValues::Text(s) => Ok(quote_blob(s.as_bytes())),
            _ => Err(not_representable()),
        },
        ParamType::Str => Ok(match value {
            RowValues::Null => "NULL".to_string(),
            RowValues::Int(i) => quote_text(&i.to_string()),
            RowValues::Float(f) => quote_text(&f.to_string()),
            RowValues::Text(s) => quote_text(s),
            RowValues::Bool(b) => quote_text(&i64::from(*b).to_string()),
            RowValues::Timestamp(dt) => quote_text(&dt.format("%F %T%.f").to_string()),
            RowValues::JSON(jval) => quote_text(&jval.to_string()),
            RowValues::Blob(bytes) => quote_blob(bytes),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_strings_by_doubling() {
        let quoted = quote_literal(&"won't matter".into(), ParamType::Str).unwrap();
        assert_eq!(quoted, "'won''t matter'");
    }

    #[test]
    fn quotes_by_type_hint() {
        assert_eq!(quote_literal(&" 42 ".into(), ParamType::Int).unwrap(), "42");
        assert_eq!(quote_literal(&RowValues::Int(1), ParamType::Bool).unwrap(), "1");
        assert_eq!(quote_literal(&vec![0xAB_u8, 0x01].into(), ParamType::Lob).unwrap(), "X'AB01'");
        assert_eq!(quote_literal(&"x".into(), ParamType::Null).unwrap(), "NULL");
        assert!(quote_literal(&"abc".into(), ParamType::Int).is_err());
    }
}
