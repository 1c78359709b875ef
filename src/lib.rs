//! # Quicktable
//!
//! A small columnar table engine: a table is created from a blueprint of
//! `(name, type)` pairs, grows one row at a time and renders a bounded,
//! pipe-delimited preview of its first rows.
//!
//! ## Features
//!
//! - **Typed columns**: `str`, `int`, `float` and `bool` columns stored as native
//!   vectors, one per blueprint entry
//! - **Atomic appends**: a row is type-checked against every column before any of
//!   them changes, so a rejected row leaves the table untouched
//! - **Fallible growth**: storage grows by a factor of 1.2 through `try_reserve_exact`,
//!   reporting allocation failures as errors
//! - **Host agnostic**: rows cross the boundary as any type implementing [`HostValue`]
//!
//! ## Table Functions
//!
//! Loaded as a DuckDB extension, the crate registers three table functions:
//!
//! - `quicktable`: Build a table from SQL lists and scan its rows
//! - `quicktable_blueprint`: Validate a blueprint and list its columns
//! - `quicktable_preview`: Render the preview of a table, one row per line
extern crate duckdb;
extern crate duckdb_loadable_macros;
extern crate libduckdb_sys;

pub mod database;
pub mod error;

mod bridge;
mod extension;

pub use crate::database::column::{Cell, Column, ColumnType};
pub use crate::database::host::HostValue;
pub use crate::database::table::Table;
pub use crate::error::{ErrorKind, QuickTableError, Result};

use crate::extension::blueprint_table_function::{self, BlueprintTableFunction};
use crate::extension::preview_table_function::{self, PreviewTableFunction};
use crate::extension::quicktable_table_function::{self, QuickTableFunction};
use anyhow::Context;
use duckdb::Connection;
use duckdb_loadable_macros::duckdb_entrypoint_c_api;
use libduckdb_sys as ffi;

/// Extension entry point for DuckDB.
///
/// Registers the `quicktable`, `quicktable_blueprint` and `quicktable_preview` table
/// functions on `connection`.
///
/// # Errors
///
/// Returns an error if any table function fails to register with DuckDB.
#[duckdb_entrypoint_c_api()]
pub unsafe fn extension_entrypoint(connection: Connection) -> anyhow::Result<()> {
    connection
        .register_table_function::<QuickTableFunction>(quicktable_table_function::NAME)
        .context("Failed to register quicktable table function")?;
    connection
        .register_table_function::<BlueprintTableFunction>(blueprint_table_function::NAME)
        .context("Failed to register quicktable_blueprint table function")?;
    connection
        .register_table_function::<PreviewTableFunction>(preview_table_function::NAME)
        .context("Failed to register quicktable_preview table function")?;
    Ok(())
}
