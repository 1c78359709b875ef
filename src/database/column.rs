use crate::database::host::HostValue;
use crate::error::{QuickTableError, Result};
use std::collections::TryReserveError;
use std::fmt::Display;
use tracing::trace;

/// Number of slots a freshly created column reserves.
pub const INITIAL_CAPACITY: usize = 20;

/// Supported column data types.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ColumnType {
    /// UTF-8 strings, owned by the column
    Str,
    /// 64-bit signed integers
    Int,
    /// Double-precision floating point numbers
    Float,
    /// Boolean values (true/false)
    Bool,
}

impl ColumnType {
    /// Returns the blueprint tag of the column type.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Str => "str",
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
        }
    }

    /// Parses a blueprint tag. Matching is exact and case-sensitive.
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "str" => Ok(Self::Str),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "bool" => Ok(Self::Bool),
            _ => Err(QuickTableError::InvalidColumnType {
                kind: name.to_string(),
            }),
        }
    }
}

impl Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single typed scalar stored in, or read out of, a column.
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// Returns the column type able to hold this cell.
    pub fn kind(&self) -> ColumnType {
        match self {
            Cell::Str(_) => ColumnType::Str,
            Cell::Int(_) => ColumnType::Int,
            Cell::Float(_) => ColumnType::Float,
            Cell::Bool(_) => ColumnType::Bool,
        }
    }

    /// Type-checks a host value against `kind` and copies it into a native cell.
    pub fn from_host<V: HostValue>(kind: ColumnType, value: &V) -> Result<Self> {
        let cell = match kind {
            ColumnType::Str => value.as_text().map(|text| Cell::Str(text.to_owned())),
            ColumnType::Int => value.as_integer().map(Cell::Int),
            ColumnType::Float => value.as_float().map(Cell::Float),
            ColumnType::Bool => value.as_boolean().map(Cell::Bool),
        };
        cell.ok_or(QuickTableError::EntryTypeMismatch(kind))
    }

    /// Builds a fresh host value holding a copy of this cell.
    pub fn to_host<V: HostValue>(&self) -> Result<V> {
        match self {
            Cell::Str(value) => V::from_text(value),
            Cell::Int(value) => V::from_integer(*value),
            Cell::Float(value) => V::from_float(*value),
            Cell::Bool(value) => V::from_boolean(*value),
        }
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cell::Str(value) => f.write_str(value),
            Cell::Int(value) => write!(f, "{}", value),
            // Lowercase like C's `%.2f`; infinities already print as `inf`/`-inf`.
            Cell::Float(value) if value.is_nan() => f.write_str("nan"),
            Cell::Float(value) => write!(f, "{:.2}", value),
            Cell::Bool(true) => f.write_str("True"),
            Cell::Bool(false) => f.write_str("False"),
        }
    }
}

/// Homogeneous backing storage, one variant per column type.
#[derive(Clone, Debug)]
enum ColumnData {
    Str(Vec<String>),
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
}

impl ColumnData {
    fn with_capacity(kind: ColumnType, capacity: usize) -> Result<Self, TryReserveError> {
        let mut data = match kind {
            ColumnType::Str => ColumnData::Str(Vec::new()),
            ColumnType::Int => ColumnData::Int(Vec::new()),
            ColumnType::Float => ColumnData::Float(Vec::new()),
            ColumnType::Bool => ColumnData::Bool(Vec::new()),
        };
        data.reserve_exact(capacity)?;
        Ok(data)
    }

    fn kind(&self) -> ColumnType {
        match self {
            ColumnData::Str(_) => ColumnType::Str,
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Bool(_) => ColumnType::Bool,
        }
    }

    fn len(&self) -> usize {
        match self {
            ColumnData::Str(values) => values.len(),
            ColumnData::Int(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Bool(values) => values.len(),
        }
    }

    fn capacity(&self) -> usize {
        match self {
            ColumnData::Str(values) => values.capacity(),
            ColumnData::Int(values) => values.capacity(),
            ColumnData::Float(values) => values.capacity(),
            ColumnData::Bool(values) => values.capacity(),
        }
    }

    fn reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        match self {
            ColumnData::Str(values) => values.try_reserve_exact(additional),
            ColumnData::Int(values) => values.try_reserve_exact(additional),
            ColumnData::Float(values) => values.try_reserve_exact(additional),
            ColumnData::Bool(values) => values.try_reserve_exact(additional),
        }
    }

    /// Stores `cell`, returning it back when its kind does not match the storage.
    fn push(&mut self, cell: Cell) -> Result<(), Cell> {
        match (self, cell) {
            (ColumnData::Str(values), Cell::Str(value)) => values.push(value),
            (ColumnData::Int(values), Cell::Int(value)) => values.push(value),
            (ColumnData::Float(values), Cell::Float(value)) => values.push(value),
            (ColumnData::Bool(values), Cell::Bool(value)) => values.push(value),
            (_, cell) => return Err(cell),
        }
        Ok(())
    }

    fn pop(&mut self) -> Option<Cell> {
        match self {
            ColumnData::Str(values) => values.pop().map(Cell::Str),
            ColumnData::Int(values) => values.pop().map(Cell::Int),
            ColumnData::Float(values) => values.pop().map(Cell::Float),
            ColumnData::Bool(values) => values.pop().map(Cell::Bool),
        }
    }

    fn get(&self, index: usize) -> Option<Cell> {
        match self {
            ColumnData::Str(values) => values.get(index).cloned().map(Cell::Str),
            ColumnData::Int(values) => values.get(index).copied().map(Cell::Int),
            ColumnData::Float(values) => values.get(index).copied().map(Cell::Float),
            ColumnData::Bool(values) => values.get(index).copied().map(Cell::Bool),
        }
    }
}

/// One field of a table: a name, a fixed type and a growable run of cells.
#[derive(Clone, Debug)]
pub struct Column {
    /// Column name, attached by blueprint-driven initialization
    name: String,
    /// Cell storage, its variant fixes the column type
    data: ColumnData,
}

impl Column {
    /// Creates an unnamed, empty column with `INITIAL_CAPACITY` reserved slots.
    pub fn new(kind: ColumnType) -> Result<Self> {
        let data = ColumnData::with_capacity(kind, INITIAL_CAPACITY)
            .map_err(QuickTableError::allocation("failed to allocate column"))?;
        Ok(Column {
            name: String::new(),
            data,
        })
    }

    /// Creates a column from a `(name, type)` blueprint descriptor.
    pub fn init<V: HostValue>(descriptor: &V) -> Result<Self> {
        let fields = descriptor
            .as_sequence()
            .filter(|fields| fields.len() == 2)
            .ok_or(QuickTableError::InvalidBlueprint)?;
        let name = fields[0].as_text().ok_or(QuickTableError::InvalidBlueprint)?;
        let kind = fields[1].as_text().ok_or(QuickTableError::InvalidBlueprint)?;

        let mut column = Column::new(ColumnType::parse(kind)?)?;
        column.name = name.to_owned();
        Ok(column)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnType {
        self.data.kind()
    }

    /// Number of stored cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots available before the next growth.
    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// Makes room for one more cell, growing the storage by a factor of 1.2 when full.
    ///
    /// On failure the column is left untouched.
    pub(crate) fn reserve_one(&mut self) -> Result<()> {
        let size = self.len();
        let capacity = self.capacity();
        if size < capacity {
            return Ok(());
        }
        let grown = (capacity * 6).div_ceil(5).max(size + 1);
        self.data
            .reserve_exact(grown - size)
            .map_err(QuickTableError::allocation("failed to grow column"))?;
        trace!(column = %self.name, from = capacity, to = self.capacity(), "grew column");
        Ok(())
    }

    /// Stores an already type-checked cell. Room must have been made with `reserve_one`.
    pub(crate) fn push_cell(&mut self, cell: Cell) -> Result<()> {
        let kind = self.kind();
        self.data
            .push(cell)
            .map_err(|_| QuickTableError::EntryTypeMismatch(kind))
    }

    /// Appends a host value, copying its payload.
    ///
    /// Fails with a type error when the value does not match the column type; a
    /// failed append leaves the size unchanged.
    pub fn append<V: HostValue>(&mut self, value: &V) -> Result<()> {
        self.reserve_one()?;
        let cell = Cell::from_host(self.kind(), value)?;
        self.push_cell(cell)
    }

    /// Returns a copy of the cell at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.data.get(index)
    }

    /// Converts the cell at `index` into a host value.
    ///
    /// The index is validated by the owning table.
    pub fn read<V: HostValue>(&self, index: usize) -> Result<V> {
        self.get(index)
            .ok_or(QuickTableError::IndexOutOfRange)?
            .to_host()
    }

    /// Removes the last cell, releasing its payload. Capacity is kept.
    pub(crate) fn pop(&mut self) -> Option<Cell> {
        self.data.pop()
    }

    /// Renders the cell at `index` for the table preview.
    pub fn cell_as_string(&self, index: usize) -> Option<String> {
        self.get(index).map(|cell| cell.to_string())
    }

    /// Renders the column header as `"<name> (<type>)"`.
    pub fn header_as_string(&self) -> String {
        format!("{} ({})", self.name, self.kind())
    }

    /// Builds the `(name, type)` descriptor of this column.
    pub fn descriptor<V: HostValue>(&self) -> Result<V> {
        V::from_sequence(vec![
            V::from_text(&self.name)?,
            V::from_text(self.kind().as_str())?,
        ])
    }
}
