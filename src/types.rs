use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values that can be bound as positional parameters or read back from a row.
///
/// ```rust
/// use sql_router::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }
}

macro_rules! row_values_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for RowValues {
                fn from(value: $ty) -> Self {
                    RowValues::$variant(value.into())
                }
            }
        )*
    };
}

row_values_from! {
    i64 => Int,
    i32 => Int,
    u32 => Int,
    f64 => Float,
    bool => Bool,
    String => Text,
    &str => Text,
    NaiveDateTime => Timestamp,
    JsonValue => JSON,
    Vec<u8> => Blob,
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Logical database endpoint a statement is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Writable endpoint; all writes and every statement inside a transaction.
    Primary,
    /// Read-only endpoint; default for reads.
    Replica,
}

impl Endpoint {
    /// Resolve the endpoint for a statement.
    ///
    /// A transaction lives on one connection, so it pins everything to the primary.
    #[must_use]
    pub fn route(use_primary: bool, in_transaction: bool) -> Self {
        if use_primary || in_transaction {
            Endpoint::Primary
        } else {
            Endpoint::Replica
        }
    }

    #[must_use]
    pub fn is_primary(self) -> bool {
        matches!(self, Endpoint::Primary)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Primary => f.write_str("primary"),
            Endpoint::Replica => f.write_str("replica"),
        }
    }
}

/// Type hint passed to the driver's native quoting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamType {
    Null,
    Int,
    #[default]
    Str,
    Lob,
    Bool,
}
