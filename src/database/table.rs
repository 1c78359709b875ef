use crate::database::blueprint;
use crate::database::column::{Cell, Column};
use crate::database::host::HostValue;
use crate::database::render;
use crate::error::{QuickTableError, Result};
use std::fmt::Display;
use tracing::{debug, trace};

/// A fixed-width, row-appendable table stored as one typed column per field.
///
/// Every column always holds exactly `len()` cells. The default value is the zeroed,
/// uninitialized table (no columns, no rows).
#[derive(Clone, Debug, Default)]
pub struct Table {
    /// Columns in blueprint order
    columns: Vec<Column>,
    /// Row count
    size: usize,
}

impl Table {
    /// Validates `blueprint` and builds an empty table from it.
    pub fn new<V: HostValue>(blueprint: &V) -> Result<Self> {
        let mut table = Table::default();
        table.init(blueprint)?;
        Ok(table)
    }

    /// Builds the columns described by `blueprint`, replacing any previous content.
    ///
    /// On failure the table is left as it was.
    pub fn init<V: HostValue>(&mut self, blueprint: &V) -> Result<()> {
        blueprint::validate(blueprint)?;
        let descriptors = blueprint
            .as_sequence()
            .ok_or(QuickTableError::InvalidBlueprint)?;

        let mut columns = Vec::new();
        columns
            .try_reserve_exact(descriptors.len())
            .map_err(QuickTableError::allocation("failed to allocate table"))?;
        for descriptor in descriptors {
            columns.push(Column::init(descriptor)?);
        }

        self.columns = columns;
        self.size = 0;
        debug!(width = self.width(), "initialized table");
        Ok(())
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    /// Returns a copy of the cells of row `index`, or `None` past the end.
    pub(crate) fn cells(&self, index: usize) -> Option<Vec<Cell>> {
        if index >= self.size {
            return None;
        }
        self.columns.iter().map(|column| column.get(index)).collect()
    }

    /// Reads row `index` as a host sequence ordered like the blueprint.
    pub fn row_at<V: HostValue>(&self, index: usize) -> Result<V> {
        if index >= self.size {
            return Err(QuickTableError::IndexOutOfRange);
        }
        let row = self
            .columns
            .iter()
            .map(|column| column.read(index))
            .collect::<Result<Vec<V>>>()?;
        V::from_sequence(row)
    }

    /// Reads a row by signed index; negative values count from the end.
    pub fn item<V: HostValue>(&self, index: isize) -> Result<V> {
        let resolved = if index < 0 {
            index.checked_add_unsigned(self.size)
        } else {
            Some(index)
        };
        match resolved.and_then(|index| usize::try_from(index).ok()) {
            Some(index) => self.row_at(index),
            None => Err(QuickTableError::IndexOutOfRange),
        }
    }

    /// Appends a host row holding exactly `width()` values.
    ///
    /// The row is type-checked against every column before any column is touched, so
    /// a rejected row leaves the whole table unchanged.
    pub fn append<V: HostValue>(&mut self, row: &V) -> Result<()> {
        let values = row.as_sequence().ok_or(QuickTableError::NonSequenceRow)?;
        self.check_arity(values.len())?;
        let cells = self
            .columns
            .iter()
            .zip(values)
            .map(|(column, value)| Cell::from_host(column.kind(), value))
            .collect::<Result<Vec<Cell>>>()?;
        self.commit(cells)
    }

    /// Removes the last row and returns it as a host sequence.
    pub fn pop<V: HostValue>(&mut self) -> Result<V> {
        if self.size == 0 {
            return Err(QuickTableError::PopFromEmptyTable);
        }
        let row = self.row_at(self.size - 1)?;
        for column in &mut self.columns {
            column.pop();
        }
        self.size -= 1;
        trace!(size = self.size, "popped row");
        Ok(row)
    }

    /// Rebuilds the blueprint as a host sequence of `(name, type)` pairs.
    pub fn blueprint<V: HostValue>(&self) -> Result<V> {
        let descriptors = self
            .columns
            .iter()
            .map(Column::descriptor)
            .collect::<Result<Vec<V>>>()?;
        V::from_sequence(descriptors)
    }

    /// Renders the bounded tabular preview, see `render::render`.
    pub fn render(&self) -> Result<String> {
        render::render(self)
    }

    /// Renders the preview one line per entry, see `render::render_lines`.
    pub fn render_lines(&self) -> Result<Vec<String>> {
        render::render_lines(self)
    }

    /// Releases every column. Equivalent to dropping the table.
    pub fn dispose(self) {
        debug!(width = self.width(), size = self.size, "disposed table");
    }

    fn check_arity(&self, actual: usize) -> Result<()> {
        if actual == self.width() {
            Ok(())
        } else {
            Err(QuickTableError::RowLengthMismatch {
                expected: self.width(),
                actual,
            })
        }
    }

    /// Stores type-checked cells, one per column, as a single row.
    fn commit(&mut self, cells: Vec<Cell>) -> Result<()> {
        // Growing only changes capacity, so a failed reservation leaves every size intact.
        for column in &mut self.columns {
            column.reserve_one()?;
        }
        for (index, cell) in cells.into_iter().enumerate() {
            if let Err(error) = self.columns[index].push_cell(cell) {
                for column in &mut self.columns[..index] {
                    column.pop();
                }
                return Err(error);
            }
        }
        self.size += 1;
        Ok(())
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let preview = self.render().map_err(|_| std::fmt::Error)?;
        f.write_str(&preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::column::INITIAL_CAPACITY;
    use crate::error::ErrorKind;
    use duckdb::types::Value;

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    fn blueprint(columns: &[(&str, &str)]) -> Value {
        Value::List(
            columns
                .iter()
                .map(|(name, kind)| Value::List(vec![text(name), text(kind)]))
                .collect(),
        )
    }

    fn pokemon() -> Table {
        Table::new(&blueprint(&[
            ("Name", "str"),
            ("Level", "int"),
            ("Wild", "bool"),
            ("Power", "float"),
        ]))
        .unwrap()
    }

    fn row(name: &str, level: i64, wild: bool, power: f64) -> Value {
        Value::List(vec![
            text(name),
            Value::BigInt(level),
            Value::Boolean(wild),
            Value::Double(power),
        ])
    }

    fn column_sizes(table: &Table) -> Vec<usize> {
        table.columns().iter().map(Column::len).collect()
    }

    #[test]
    fn table_initial() {
        let table = Table::default();

        assert_eq!(table.width(), 0);
        assert_eq!(table.len(), 0);
        assert_eq!(table.blueprint::<Value>().unwrap(), Value::List(vec![]));
    }

    #[test]
    fn table_blueprint_round_trip() {
        let expected = blueprint(&[
            ("Name", "str"),
            ("Level", "int"),
            ("Wild", "bool"),
            ("Power", "float"),
        ]);
        let table = Table::new(&expected).unwrap();

        assert_eq!(table.width(), 4);
        assert_eq!(table.blueprint::<Value>().unwrap(), expected);
        assert_eq!(table.column_names(), vec!["Name", "Level", "Wild", "Power"]);
    }

    #[test]
    fn table_invalid_blueprint() {
        let error = Table::new(&blueprint(&[("Name", "str"), ("Level", "long")])).unwrap_err();

        assert_eq!(error.to_string(), "invalid blueprint");
        assert_eq!(error.kind(), ErrorKind::Schema);
    }

    #[test]
    fn table_failed_init_keeps_previous_state() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();

        assert!(table.init(&Value::Null).is_err());
        assert_eq!(table.width(), 4);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn table_append_and_read() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();
        table.append(&row("Raichu", 45, true, 14.0)).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.row_at::<Value>(0).unwrap(), row("Pikachu", 12, false, 12.2));
        assert_eq!(table.row_at::<Value>(1).unwrap(), row("Raichu", 45, true, 14.0));
        assert_eq!(column_sizes(&table), vec![2, 2, 2, 2]);
    }

    #[test]
    fn table_append_many_rows() {
        let mut table = pokemon();
        for i in 0..1000 {
            table.append(&row("Pikachu", i, true, 12.0)).unwrap();
        }

        assert_eq!(table.len(), 1000);
        for i in [0, INITIAL_CAPACITY, 999] {
            assert_eq!(
                table.row_at::<Value>(i).unwrap(),
                row("Pikachu", i as i64, true, 12.0)
            );
        }
    }

    #[test]
    fn table_index_out_of_range() {
        let mut table = pokemon();
        let error = table.row_at::<Value>(0).unwrap_err();
        assert_eq!(error.to_string(), "table index out of range");
        assert_eq!(error.kind(), ErrorKind::Index);

        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();
        assert!(table.row_at::<Value>(1).is_err());
        assert!(table.item::<Value>(-2).is_err());
        assert!(table.item::<Value>(isize::MIN).is_err());
    }

    #[test]
    fn table_negative_index() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();
        table.append(&row("Raichu", 45, true, 14.0)).unwrap();

        assert_eq!(table.item::<Value>(-1).unwrap(), row("Raichu", 45, true, 14.0));
        assert_eq!(table.item::<Value>(-2).unwrap(), row("Pikachu", 12, false, 12.2));
        assert_eq!(table.item::<Value>(0).unwrap(), row("Pikachu", 12, false, 12.2));
    }

    #[test]
    fn table_append_non_sequence() {
        let mut table = pokemon();
        let error = table.append(&Value::Null).unwrap_err();

        assert_eq!(error.to_string(), "append with non-sequence");
        assert_eq!(error.kind(), ErrorKind::Type);
    }

    #[test]
    fn table_append_mismatching_length() {
        let mut table = pokemon();
        let error = table.append(&Value::List(vec![text("Pikachu")])).unwrap_err();

        assert_eq!(error.to_string(), "append with mismatching row length");
        assert_eq!(error.kind(), ErrorKind::Type);
        assert_eq!(column_sizes(&table), vec![0, 0, 0, 0]);
    }

    #[test]
    fn table_append_mismatching_type_is_atomic() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();

        let cases = [
            (
                Value::List(vec![Value::Null, Value::BigInt(12), Value::Boolean(true), Value::Double(12.5)]),
                "non-str entry for str column",
            ),
            (
                Value::List(vec![text("Pikachu"), Value::Null, Value::Boolean(true), Value::Double(12.5)]),
                "non-int entry for int column",
            ),
            (
                Value::List(vec![text("Pikachu"), Value::BigInt(12), Value::Null, Value::Double(12.5)]),
                "non-bool entry for bool column",
            ),
            (
                Value::List(vec![text("Pikachu"), Value::BigInt(12), Value::Boolean(true), Value::Null]),
                "non-float entry for float column",
            ),
        ];
        for (value, message) in cases {
            let error = table.append(&value).unwrap_err();
            assert_eq!(error.to_string(), message);
            assert_eq!(error.kind(), ErrorKind::Type);
            assert_eq!(table.len(), 1);
            assert_eq!(column_sizes(&table), vec![1, 1, 1, 1]);
        }
    }

    #[test]
    fn table_cells() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 35, true, 1.5)).unwrap();

        assert_eq!(
            table.cells(0).unwrap(),
            vec![
                Cell::Str("Pikachu".to_owned()),
                Cell::Int(35),
                Cell::Bool(true),
                Cell::Float(1.5),
            ]
        );
        assert_eq!(table.cells(1), None);
        assert_eq!(Table::default().cells(0), None);
    }

    #[test]
    fn table_pop() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();
        table.append(&row("Raichu", 46, false, 175.0)).unwrap();

        let last = table.item::<Value>(-1).unwrap();
        assert_eq!(table.pop::<Value>().unwrap(), last);
        assert_eq!(table.len(), 1);
        assert_eq!(column_sizes(&table), vec![1, 1, 1, 1]);

        table.append(&row("Charizard", 45, false, 164.3)).unwrap();
        assert_eq!(table.row_at::<Value>(1).unwrap(), row("Charizard", 45, false, 164.3));
    }

    #[test]
    fn table_pop_empty() {
        let mut table = pokemon();
        let error = table.pop::<Value>().unwrap_err();

        assert_eq!(error.to_string(), "pop from empty table");
        assert_eq!(error.kind(), ErrorKind::Index);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn zero_width_table_counts_rows() {
        let mut table = Table::new(&Value::List(vec![])).unwrap();
        table.append(&Value::List(vec![])).unwrap();
        table.append(&Value::List(vec![])).unwrap();
        assert_eq!(table.len(), 2);

        assert_eq!(table.pop::<Value>().unwrap(), Value::List(vec![]));
        table.pop::<Value>().unwrap();
        assert_eq!(table.len(), 0);
        assert!(table.pop::<Value>().is_err());
    }

    #[test]
    fn table_dispose() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 12, false, 12.2)).unwrap();
        table.dispose();
    }
}
