//! Contract between the table engine and the host runtime's dynamic values.
//!
//! The engine never stores a host value: appends extract a native copy through the
//! `as_*` accessors and reads build fresh host values through the `from_*` constructors.
use crate::error::Result;

/// A dynamically typed value handed across the host boundary.
///
/// Implementors expose a type test plus extraction for the four cell kinds, a
/// sequence view used for blueprints and rows, and constructors back from native
/// values. Constructors are fallible because some hosts allocate on conversion.
pub trait HostValue: Sized {
    /// Returns the text payload if this value is a string.
    fn as_text(&self) -> Option<&str>;

    /// Returns the payload if this value is a 64-bit integer.
    fn as_integer(&self) -> Option<i64>;

    /// Returns the payload if this value is a double precision float.
    fn as_float(&self) -> Option<f64>;

    /// Returns the payload if this value is a boolean.
    fn as_boolean(&self) -> Option<bool>;

    /// Returns the items if this value is an ordered sequence.
    fn as_sequence(&self) -> Option<&[Self]>;

    fn from_text(value: &str) -> Result<Self>;

    fn from_integer(value: i64) -> Result<Self>;

    fn from_float(value: f64) -> Result<Self>;

    fn from_boolean(value: bool) -> Result<Self>;

    /// Makes a sequence holding `items` in order.
    fn from_sequence(items: Vec<Self>) -> Result<Self>;
}
