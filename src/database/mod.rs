//! # Table Engine
//!
//! In-memory columnar storage: typed growable columns, blueprint validation, the
//! table orchestrating them and the tabular preview renderer.
pub mod blueprint;
pub mod column;
pub mod host;
pub mod render;
pub mod table;
