//! # Quicktable Preview Table Function
//!
//! `quicktable_preview(blueprint, rows, coerce := true)` builds a table and returns its
//! rendered preview, one `line` row per preview line.
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

use crate::database::table::Table;
use crate::error::ResultMessage;
use crate::extension::{nested_varchar_list, CoerceParam, NamedParam, TableParameters};
use duckdb::{
    core::{DataChunkHandle, Inserter, LogicalTypeHandle, LogicalTypeId},
    vtab::{BindInfo, InitInfo, TableFunctionInfo, VTab},
};
use std::{
    error::Error,
    sync::atomic::{AtomicBool, Ordering},
};

pub(crate) const NAME: &str = "quicktable_preview";

#[repr(C)]
pub(crate) struct PreviewBindData {
    lines: Vec<String>,
}

#[repr(C)]
pub(crate) struct PreviewInitData {
    done: AtomicBool,
}

pub(crate) struct PreviewTableFunction;

impl VTab for PreviewTableFunction {
    type InitData = PreviewInitData;
    type BindData = PreviewBindData;

    fn bind(bind: &BindInfo) -> Result<Self::BindData, Box<dyn Error>> {
        let parameters = TableParameters::try_from(bind).with_prefix(NAME)?;
        let table = Table::try_from(&parameters).with_prefix(NAME)?;
        let lines = table.render_lines().with_prefix(NAME)?;
        table.dispose();

        bind.add_result_column("line", LogicalTypeHandle::from(LogicalTypeId::Varchar));
        Ok(PreviewBindData { lines })
    }

    fn init(_: &InitInfo) -> Result<Self::InitData, Box<dyn Error>> {
        Ok(PreviewInitData {
            done: AtomicBool::new(false),
        })
    }

    /// The preview never exceeds the header plus `PREVIEW_ROWS` lines, so it fits in
    /// a single chunk.
    fn func(
        func: &TableFunctionInfo<Self>,
        output: &mut DataChunkHandle,
    ) -> Result<(), Box<dyn Error>> {
        let init = func.get_init_data();
        if init.done.swap(true, Ordering::Relaxed) {
            output.set_len(0);
            return Ok(());
        }

        let bind = func.get_bind_data();
        let vector = output.flat_vector(0);
        for (index, line) in bind.lines.iter().enumerate() {
            vector.insert(index, line.as_str());
        }
        output.set_len(bind.lines.len());
        Ok(())
    }

    fn parameters() -> Option<Vec<LogicalTypeHandle>> {
        Some(vec![nested_varchar_list(), nested_varchar_list()])
    }

    fn named_parameters() -> Option<Vec<(String, LogicalTypeHandle)>> {
        Some(vec![CoerceParam::definition()])
    }
}
