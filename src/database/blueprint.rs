//! Blueprint validation.
//!
//! A blueprint is an ordered sequence of `(name, type)` pairs, `type` being one of
//! `"str"`, `"int"`, `"float"` or `"bool"`. Validation is read-only and stops at the
//! first bad entry.
use crate::database::column::ColumnType;
use crate::database::host::HostValue;
use crate::error::{QuickTableError, Result};

/// Checks the shape of a blueprint before any column is built.
pub fn validate<V: HostValue>(blueprint: &V) -> Result<()> {
    let descriptors = blueprint
        .as_sequence()
        .ok_or(QuickTableError::InvalidBlueprint)?;
    if descriptors.iter().all(is_valid_descriptor) {
        Ok(())
    } else {
        Err(QuickTableError::InvalidBlueprint)
    }
}

fn is_valid_descriptor<V: HostValue>(descriptor: &V) -> bool {
    match descriptor.as_sequence() {
        Some([name, kind]) => {
            name.as_text().is_some()
                && kind
                    .as_text()
                    .is_some_and(|kind| ColumnType::parse(kind).is_ok())
        }
        _ => false,
    }
}
