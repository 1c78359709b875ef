//! # Extension Core Module
//!
//! DuckDB table functions exposing the table engine to SQL, plus the parameter
//! handling they share.
use crate::bridge::value::coerce_row;
use crate::bridge::ValueBridge;
use crate::database::column::{Column, ColumnType};
use crate::database::host::HostValue;
use crate::database::table::Table;
use crate::error::{QuickTableError, Result};
use duckdb::core::{LogicalTypeHandle, LogicalTypeId};
use duckdb::types::Value;
use duckdb::vtab::BindInfo;
use tracing::debug;

pub(crate) mod blueprint_table_function;
pub(crate) mod preview_table_function;
pub(crate) mod quicktable_table_function;

/// Rows emitted per `func` call.
const STEP: usize = 1000;

// Parameter handling

/// Trait for handling named parameters in DuckDB table functions.
///
/// # Type Parameters
///
/// * `T` - The type of the parameter value
pub(crate) trait NamedParam<T> {
    /// Returns the parameter name as used in SQL
    fn name() -> &'static str;

    /// Returns the DuckDB logical type for this parameter
    fn kind() -> LogicalTypeHandle;

    /// Returns the complete parameter definition (name and type)
    fn definition() -> (String, LogicalTypeHandle) {
        (Self::name().to_string(), Self::kind())
    }

    /// Extracts the parameter value from bind information, `None` if not provided
    fn read(bind: &BindInfo) -> Option<T>;
}

/// Whether VARCHAR row cells are parsed into the declared column types (default: true)
pub(crate) struct CoerceParam;

impl NamedParam<bool> for CoerceParam {
    fn name() -> &'static str {
        "coerce"
    }

    fn kind() -> LogicalTypeHandle {
        LogicalTypeHandle::from(LogicalTypeId::Boolean)
    }

    fn read(bind: &BindInfo) -> Option<bool> {
        Some(bind.get_named_parameter(Self::name())?.to_bool())
    }
}

/// Type of the blueprint and rows parameters: `VARCHAR[][]`.
pub(crate) fn nested_varchar_list() -> LogicalTypeHandle {
    LogicalTypeHandle::list(&LogicalTypeHandle::list(&LogicalTypeHandle::from(
        LogicalTypeId::Varchar,
    )))
}

/// Parameters shared by the table functions that build a populated table.
pub(crate) struct TableParameters {
    /// Blueprint as `[[name, type], ...]`
    blueprint: Value,
    /// Rows as `[[cell, ...], ...]`
    rows: Value,
    /// Whether text cells are parsed into the column types
    coerce: bool,
}

impl TryFrom<&BindInfo> for TableParameters {
    type Error = QuickTableError;

    fn try_from(bind: &BindInfo) -> Result<Self, Self::Error> {
        Ok(TableParameters {
            blueprint: bind.get_parameter(0).to_host(),
            rows: bind.get_parameter(1).to_host(),
            coerce: CoerceParam::read(bind).unwrap_or(true),
        })
    }
}

impl TryFrom<&TableParameters> for Table {
    type Error = QuickTableError;

    /// Builds the table and appends every row, stopping at the first rejected one.
    fn try_from(parameters: &TableParameters) -> Result<Self, Self::Error> {
        let mut table = Table::new(&parameters.blueprint)?;
        let kinds: Vec<ColumnType> = table.columns().iter().map(Column::kind).collect();
        let rows = parameters
            .rows
            .as_sequence()
            .ok_or(QuickTableError::NonSequenceRow)?;
        for row in rows {
            if parameters.coerce {
                table.append(&coerce_row(&kinds, row.clone()))?;
            } else {
                table.append(row)?;
            }
        }
        debug!(width = table.width(), size = table.len(), "built table from SQL parameters");
        Ok(table)
    }
}

/// Maps a column type to the DuckDB type of its result column.
pub(crate) const fn to_logical_type_id(kind: ColumnType) -> LogicalTypeId {
    match kind {
        ColumnType::Str => LogicalTypeId::Varchar,
        ColumnType::Int => LogicalTypeId::Bigint,
        ColumnType::Float => LogicalTypeId::Double,
        ColumnType::Bool => LogicalTypeId::Boolean,
    }
}
