//! # Host Boundary
//!
//! DuckDB side of the table engine: raw access to `duckdb_value` handles passed to
//! table functions, and the `HostValue` contract for `duckdb::types::Value`.
use duckdb::types::Value as OwnedValue;
use duckdb::vtab::Value;
use libduckdb_sys::{
    duckdb_free, duckdb_get_bool, duckdb_get_double, duckdb_get_int64, duckdb_get_list_child,
    duckdb_get_list_size, duckdb_get_type_id, duckdb_get_value_type, duckdb_get_varchar,
    duckdb_is_null_value, duckdb_logical_type, duckdb_type, duckdb_value,
    DUCKDB_TYPE_DUCKDB_TYPE_BIGINT, DUCKDB_TYPE_DUCKDB_TYPE_BOOLEAN,
    DUCKDB_TYPE_DUCKDB_TYPE_DOUBLE, DUCKDB_TYPE_DUCKDB_TYPE_FLOAT,
    DUCKDB_TYPE_DUCKDB_TYPE_INTEGER, DUCKDB_TYPE_DUCKDB_TYPE_LIST,
    DUCKDB_TYPE_DUCKDB_TYPE_SMALLINT, DUCKDB_TYPE_DUCKDB_TYPE_TINYINT,
    DUCKDB_TYPE_DUCKDB_TYPE_UINTEGER, DUCKDB_TYPE_DUCKDB_TYPE_USMALLINT,
    DUCKDB_TYPE_DUCKDB_TYPE_UTINYINT, DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR,
};
use std::{ffi::CStr, os::raw::c_void};

pub(crate) mod value;

/// A bridge trait that extends DuckDB's table function `Value` with access to its
/// raw pointer, typed extraction and conversion into an owned `duckdb::types::Value`.
///
/// # Safety Warning
///
/// The raw pointer is obtained by reinterpreting the `Value` wrapper. Any change to
/// the layout of `duckdb::vtab::Value` breaks every method of this trait.
pub(crate) trait ValueBridge {
    /// Extracts the raw `duckdb_value` pointer from the `Value` struct.
    ///
    /// # Safety
    ///
    /// Relies on `Value` being a plain wrapper around a single `duckdb_value` field.
    unsafe fn get_value_ptr(&self) -> duckdb_value;

    /// Returns true if the value is SQL NULL
    fn is_null(&self) -> bool {
        unsafe { duckdb_is_null_value(self.get_value_ptr()) }
    }

    /// Returns the value as a boolean
    fn to_bool(&self) -> bool {
        unsafe { duckdb_get_bool(self.get_value_ptr()) }
    }

    /// Returns the value as a int64
    fn to_int64(&self) -> i64 {
        unsafe { duckdb_get_int64(self.get_value_ptr()) }
    }

    /// Returns the value as a double
    fn to_double(&self) -> f64 {
        unsafe { duckdb_get_double(self.get_value_ptr()) }
    }

    /// Returns the value as a String
    fn to_varchar(&self) -> String {
        unsafe {
            let varchar = duckdb_get_varchar(self.get_value_ptr());
            let c_str = CStr::from_ptr(varchar);
            let string = c_str.to_string_lossy().into_owned();
            duckdb_free(varchar as *mut c_void);
            string
        }
    }

    /// Returns the value as a list
    fn to_list(&self) -> Vec<Value> {
        unsafe {
            let size = duckdb_get_list_size(self.get_value_ptr());
            (0..size)
                .map(|index| Value::from(duckdb_get_list_child(self.get_value_ptr(), index)))
                .collect()
        }
    }

    /// Returns the value logical type, owned by the value itself
    fn value_type(&self) -> duckdb_logical_type {
        unsafe { duckdb_get_value_type(self.get_value_ptr()) }
    }

    /// Returns the type id of the value logical type
    fn type_id(&self) -> duckdb_type {
        unsafe { duckdb_get_type_id(self.value_type()) }
    }

    /// Copies the value into an owned host value.
    ///
    /// Integers of every width up to 32 bits unsigned become `BigInt`, both float
    /// widths become `Double`, lists are converted recursively. Types the table
    /// engine cannot store come back as `Null`.
    fn to_host(&self) -> OwnedValue {
        if self.is_null() {
            return OwnedValue::Null;
        }
        match self.type_id() {
            DUCKDB_TYPE_DUCKDB_TYPE_BOOLEAN => OwnedValue::Boolean(self.to_bool()),
            DUCKDB_TYPE_DUCKDB_TYPE_TINYINT
            | DUCKDB_TYPE_DUCKDB_TYPE_SMALLINT
            | DUCKDB_TYPE_DUCKDB_TYPE_INTEGER
            | DUCKDB_TYPE_DUCKDB_TYPE_BIGINT
            | DUCKDB_TYPE_DUCKDB_TYPE_UTINYINT
            | DUCKDB_TYPE_DUCKDB_TYPE_USMALLINT
            | DUCKDB_TYPE_DUCKDB_TYPE_UINTEGER => OwnedValue::BigInt(self.to_int64()),
            DUCKDB_TYPE_DUCKDB_TYPE_FLOAT | DUCKDB_TYPE_DUCKDB_TYPE_DOUBLE => {
                OwnedValue::Double(self.to_double())
            }
            DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR => OwnedValue::Text(self.to_varchar()),
            DUCKDB_TYPE_DUCKDB_TYPE_LIST => {
                OwnedValue::List(self.to_list().iter().map(ValueBridge::to_host).collect())
            }
            _ => OwnedValue::Null,
        }
    }
}

impl ValueBridge for Value {
    /// # DANGER: Highly unstable memory layout hack
    ///
    /// This implementation assumes that `Value` is a simple wrapper around a single
    /// `duckdb_value` field with no additional data or padding.
    ///
    /// **DO NOT USE IN DIRECTLY**
    unsafe fn get_value_ptr(&self) -> duckdb_value {
        *(self as *const Value as *const duckdb_value)
    }
}
