//! # Quicktable Table Function
//!
//! `quicktable(blueprint, rows, coerce := true)` builds a table from SQL lists and
//! scans it back, one result column per blueprint entry.
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

use crate::database::column::Cell;
use crate::database::table::Table;
use crate::error::{QuickTableError, ResultMessage};
use crate::extension::{
    nested_varchar_list, to_logical_type_id, CoerceParam, NamedParam, TableParameters, STEP,
};
use duckdb::{
    core::{DataChunkHandle, FlatVector, Inserter, LogicalTypeHandle},
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};
use std::{
    error::Error,
    sync::atomic::{AtomicUsize, Ordering},
};

pub(crate) const NAME: &str = "quicktable";

/// Bind data for the quicktable function: the fully built table.
#[repr(C)]
pub(crate) struct QuickTableBindData {
    table: Table,
}

/// Initialization data for the quicktable function.
#[repr(C)]
pub(crate) struct QuickTableInitData {
    /// First row of the next batch
    row: AtomicUsize,
}

pub(crate) struct QuickTableFunction;

impl VTab for QuickTableFunction {
    type InitData = QuickTableInitData;
    type BindData = QuickTableBindData;

    /// Builds the table during bind so that schema, type and allocation errors are
    /// reported before execution starts.
    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = TableParameters::try_from(bind).with_prefix(NAME)?;
        let table = Table::try_from(&parameters).with_prefix(NAME)?;
        if table.width() == 0 {
            Err(QuickTableError::Host(format!("{NAME}: table without columns")))?;
        }

        for column in table.columns() {
            bind.add_result_column(
                column.name(),
                LogicalTypeHandle::from(to_logical_type_id(column.kind())),
            );
        }
        Ok(QuickTableBindData { table })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(QuickTableInitData {
            row: AtomicUsize::new(0),
        })
    }

    /// Emits the stored rows in batches of `STEP`.
    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let bind = func.get_bind_data();
        let init = func.get_init_data();
        let lower = init.row.fetch_add(STEP, Ordering::Relaxed);
        let upper = bind.table.len().min(lower.saturating_add(STEP));

        if lower >= upper {
            output.set_len(0);
            return Ok(());
        }

        let mut vectors: Vec<FlatVector> = (0..bind.table.width())
            .map(|index| output.flat_vector(index))
            .collect();
        for (index, row) in (lower..upper).enumerate() {
            match bind.table.cells(row) {
                Some(cells) => populate(&mut vectors, index, cells),
                None => vectors.iter_mut().for_each(|vector| vector.set_null(index)),
            }
        }
        output.set_len(upper - lower);
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![nested_varchar_list(), nested_varchar_list()])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![CoerceParam::definition()])
    }
}

/// Writes one row of cells at position `index` of the output vectors.
fn populate(vectors: &mut [FlatVector], index: usize, cells: Vec<Cell>) {
    for (vector, cell) in vectors.iter_mut().zip(cells) {
        match cell {
            Cell::Str(value) => vector.insert(index, value.as_str()),
            Cell::Int(value) => primitive_setter(vector, index, value),
            Cell::Float(value) => primitive_setter(vector, index, value),
            Cell::Bool(value) => primitive_setter(vector, index, value),
        }
    }
}

/// Sets a primitive value in a DuckDB vector using direct memory access.
fn primitive_setter<T>(vector: &mut FlatVector, index: usize, value: T) {
    unsafe {
        let pointer: *mut T = vector.as_mut_ptr();
        std::ptr::write(pointer.add(index), value);
    }
}
