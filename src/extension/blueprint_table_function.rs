//! # Quicktable Blueprint Table Function
//!
//! `quicktable_blueprint(blueprint)` validates a blueprint, builds the empty table and
//! lists its columns back as `(column_name, column_type)` rows.
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

use crate::bridge::ValueBridge;
use crate::database::host::HostValue;
use crate::database::table::Table;
use crate::error::{QuickTableError, ResultMessage};
use crate::extension::{nested_varchar_list, STEP};
use duckdb::{
    core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId},
    types::Value,
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};
use std::{
    error::Error,
    sync::atomic::{AtomicUsize, Ordering},
};

pub(crate) const NAME: &str = "quicktable_blueprint";

#[repr(C)]
pub(crate) struct BlueprintBindData {
    /// `(name, type)` pairs read back from the built table
    columns: Vec<(String, String)>,
}

#[repr(C)]
pub(crate) struct BlueprintInitData {
    row: AtomicUsize,
}

pub(crate) struct BlueprintTableFunction;

/// Splits the blueprint of `table` into `(name, type)` pairs.
fn descriptors(table: &Table) -> Result<Vec<(String, String)>, QuickTableError> {
    let blueprint: Value = table.blueprint()?;
    let entries = blueprint
        .as_sequence()
        .ok_or(QuickTableError::InvalidBlueprint)?;
    entries
        .iter()
        .map(|entry| match entry.as_sequence() {
            Some([name, kind]) => match (name.as_text(), kind.as_text()) {
                (Some(name), Some(kind)) => Ok((name.to_owned(), kind.to_owned())),
                _ => Err(QuickTableError::InvalidBlueprint),
            },
            _ => Err(QuickTableError::InvalidBlueprint),
        })
        .collect()
}

impl VTab for BlueprintTableFunction {
    type InitData = BlueprintInitData;
    type BindData = BlueprintBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let blueprint = bind.get_parameter(0).to_host();
        let table = Table::new(&blueprint).with_prefix(NAME)?;
        let columns = descriptors(&table).with_prefix(NAME)?;

        bind.add_result_column("column_name", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        bind.add_result_column("column_type", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        Ok(BlueprintBindData { columns })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(BlueprintInitData {
            row: AtomicUsize::new(0),
        })
    }

    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let bind = func.get_bind_data();
        let init = func.get_init_data();
        let lower = init.row.fetch_add(STEP, Ordering::Relaxed);
        let upper = bind.columns.len().min(lower.saturating_add(STEP));

        if lower >= upper {
            output.set_len(0);
            return Ok(());
        }

        let names = output.flat_vector(0);
        let kinds = output.flat_vector(1);
        for (index, (name, kind)) in bind.columns[lower..upper].iter().enumerate() {
            names.insert(index, name.as_str());
            kinds.insert(index, kind.as_str());
        }
        output.set_len(upper - lower);
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![nested_varchar_list()])
    }
}
