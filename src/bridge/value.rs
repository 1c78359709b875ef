use crate::database::column::ColumnType;
use crate::database::host::HostValue;
use crate::error::Result;
use duckdb::types::Value;

impl HostValue for Value {
    fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match *self {
            Value::TinyInt(value) => Some(value.into()),
            Value::SmallInt(value) => Some(value.into()),
            Value::Int(value) => Some(value.into()),
            Value::BigInt(value) => Some(value),
            Value::UTinyInt(value) => Some(value.into()),
            Value::USmallInt(value) => Some(value.into()),
            Value::UInt(value) => Some(value.into()),
            Value::UBigInt(value) => i64::try_from(value).ok(),
            _ => None,
        }
    }

    fn as_float(&self) -> Option<f64> {
        match *self {
            Value::Float(value) => Some(value.into()),
            Value::Double(value) => Some(value),
            _ => None,
        }
    }

    fn as_boolean(&self) -> Option<bool> {
        match *self {
            Value::Boolean(value) => Some(value),
            _ => None,
        }
    }

    fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Value::List(items) | Value::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    fn from_text(value: &str) -> Result<Self> {
        Ok(Value::Text(value.to_owned()))
    }

    fn from_integer(value: i64) -> Result<Self> {
        Ok(Value::BigInt(value))
    }

    fn from_float(value: f64) -> Result<Self> {
        Ok(Value::Double(value))
    }

    fn from_boolean(value: bool) -> Result<Self> {
        Ok(Value::Boolean(value))
    }

    fn from_sequence(items: Vec<Self>) -> Result<Self> {
        Ok(Value::List(items))
    }
}

/// Parses a text cell into the type of the column it is appended to.
///
/// SQL callers pass rows as `VARCHAR[]`, so `'35'` has to become a `BIGINT` before an
/// `int` column accepts it. Booleans follow the preview spelling (`True`/`False`) as
/// well as SQL's `true`/`false`. Text that does not parse is returned unchanged and
/// is rejected by the column type check.
pub(crate) fn coerce(kind: ColumnType, value: Value) -> Value {
    let Value::Text(text) = &value else {
        return value;
    };
    let parsed = match kind {
        ColumnType::Str => None,
        ColumnType::Int => text.trim().parse::<i64>().ok().map(Value::BigInt),
        ColumnType::Float => text.trim().parse::<f64>().ok().map(Value::Double),
        ColumnType::Bool => match text.trim() {
            "True" | "true" => Some(Value::Boolean(true)),
            "False" | "false" => Some(Value::Boolean(false)),
            _ => None,
        },
    };
    parsed.unwrap_or(value)
}

/// Coerces every cell of a row against the column types of the table.
///
/// Rows of the wrong shape are returned unchanged so the table reports them.
pub(crate) fn coerce_row(kinds: &[ColumnType], row: Value) -> Value {
    match row {
        Value::List(items) if items.len() == kinds.len() => Value::List(
            kinds
                .iter()
                .zip(items)
                .map(|(kind, item)| coerce(*kind, item))
                .collect(),
        ),
        row => row,
    }
}
