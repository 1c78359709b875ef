//! Bounded, pipe-delimited preview of a table.
//!
//! ```text
//! | Name (str) | Level (int) |
//! | Pikachu    | 35          |
//! | Charmander | 12          |
//! ```
//!
//! Only the first `PREVIEW_ROWS` rows are sampled for column widths and rendered.
use crate::database::column::Column;
use crate::database::table::Table;
use crate::error::{QuickTableError, Result};

/// Number of leading rows a preview shows.
pub const PREVIEW_ROWS: usize = 5;

/// Renders the preview of `table` as newline-joined lines.
pub fn render(table: &Table) -> Result<String> {
    Ok(render_lines(table)?.join("\n"))
}

/// Renders the preview of `table` one entry per line: the header, then at most
/// `PREVIEW_ROWS` rows. Cell text is kept verbatim, embedded newlines included.
///
/// A table without columns renders no lines.
pub fn render_lines(table: &Table) -> Result<Vec<String>> {
    if table.width() == 0 {
        return Ok(Vec::new());
    }

    let rows = table.len().min(PREVIEW_ROWS);
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .map(|column| display_width(column, rows))
        .collect();

    let mut lines = Vec::new();
    lines
        .try_reserve_exact(rows + 1)
        .map_err(QuickTableError::allocation("failed to allocate table preview"))?;

    let headers = table.columns().iter().map(Column::header_as_string);
    lines.push(write_line(headers, &widths)?);
    for row in 0..rows {
        let cells = table
            .columns()
            .iter()
            .map(|column| column.cell_as_string(row).unwrap_or_default());
        lines.push(write_line(cells, &widths)?);
    }
    Ok(lines)
}

/// Width of a column in chars: its header or its longest sampled cell, whichever is wider.
fn display_width(column: &Column, rows: usize) -> usize {
    (0..rows)
        .filter_map(|row| column.cell_as_string(row))
        .map(|cell| cell.chars().count())
        .fold(column.header_as_string().chars().count(), usize::max)
}

fn write_line(cells: impl Iterator<Item = String>, widths: &[usize]) -> Result<String> {
    let length = 1 + widths.iter().map(|width| width + 3).sum::<usize>();
    let mut line = String::new();
    line.try_reserve_exact(length)
        .map_err(QuickTableError::allocation("failed to allocate table preview"))?;

    for (cell, width) in cells.zip(widths) {
        line.push_str("| ");
        line.push_str(&cell);
        let padding = width.saturating_sub(cell.chars().count());
        line.extend(std::iter::repeat(' ').take(padding + 1));
    }
    line.push('|');
    Ok(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use duckdb::types::Value;

    fn text(value: &str) -> Value {
        Value::Text(value.to_owned())
    }

    fn pokemon() -> Table {
        Table::new(&Value::List(vec![
            Value::List(vec![text("Name"), text("str")]),
            Value::List(vec![text("Level"), text("int")]),
            Value::List(vec![text("Wild"), text("bool")]),
            Value::List(vec![text("Power"), text("float")]),
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

    #[test]
    fn render_empty_blueprint() {
        let table = Table::new(&Value::List(vec![])).unwrap();
        assert_eq!(table.render().unwrap(), "");
        assert_eq!(table.to_string(), "");
    }

    #[test]
    fn render_header_only() {
        let table = pokemon();
        assert_eq!(
            table.render().unwrap(),
            "| Name (str) | Level (int) | Wild (bool) | Power (float) |"
        );
    }

    #[test]
    fn render_two_columns() {
        let mut table = Table::new(&Value::List(vec![
            Value::List(vec![text("Name"), text("str")]),
            Value::List(vec![text("Level"), text("int")]),
        ]))
        .unwrap();
        table.append(&Value::List(vec![text("Pikachu"), Value::BigInt(35)])).unwrap();
        table.append(&Value::List(vec![text("Charmander"), Value::BigInt(12)])).unwrap();

        assert_eq!(
            table.render().unwrap(),
            [
                "| Name (str) | Level (int) |",
                "| Pikachu    | 35          |",
                "| Charmander | 12          |",
            ]
            .join("\n")
        );
    }

    #[test]
    fn render_wide_cells_widen_columns() {
        let mut table = Table::new(&Value::List(vec![
            Value::List(vec![text("N"), text("str")]),
        ]))
        .unwrap();
        table.append(&Value::List(vec![text("Bulbasaur")])).unwrap();

        assert_eq!(table.render().unwrap(), "| N (str)   |\n| Bulbasaur |");
    }

    #[test]
    fn render_integration() {
        let mut table = pokemon();
        table.append(&row("Pikachu", 18, true, 32.16)).unwrap();
        table.append(&row("Charizard", 45, false, 164.3)).unwrap();

        assert_eq!(
            table.to_string(),
            [
                "| Name (str) | Level (int) | Wild (bool) | Power (float) |",
                "| Pikachu    | 18          | True        | 32.16         |",
                "| Charizard  | 45          | False       | 164.30        |",
            ]
            .join("\n")
        );

        table.pop::<Value>().unwrap();
        for i in 0..1000 {
            table.append(&row("Charizard", i, false, 164.3)).unwrap();
        }

        assert_eq!(table.len(), 1001);
        assert_eq!(
            table.render().unwrap(),
            [
                "| Name (str) | Level (int) | Wild (bool) | Power (float) |",
                "| Pikachu    | 18          | True        | 32.16         |",
                "| Charizard  | 0           | False       | 164.30        |",
                "| Charizard  | 1           | False       | 164.30        |",
                "| Charizard  | 2           | False       | 164.30        |",
                "| Charizard  | 3           | False       | 164.30        |",
            ]
            .join("\n")
        );
    }

    #[test]
    fn render_lines_keep_embedded_newlines() {
        let mut table = Table::new(&Value::List(vec![
            Value::List(vec![text("N"), text("str")]),
            Value::List(vec![text("P"), text("float")]),
        ]))
        .unwrap();
        table.append(&Value::List(vec![text("a\nb"), Value::Double(1.0)])).unwrap();
        table.append(&Value::List(vec![text("c\r"), Value::Double(2.0)])).unwrap();

        let lines = render_lines(&table).unwrap();
        assert_eq!(lines.len(), 1 + table.len().min(PREVIEW_ROWS));
        assert_eq!(lines[1], "| a\nb     | 1.00      |");
        assert_eq!(lines[2], "| c\r      | 2.00      |");
        assert_eq!(table.render().unwrap(), lines.join("\n"));
        assert!(render_lines(&Table::default()).unwrap().is_empty());
    }

    #[test]
    fn render_widths_count_chars() {
        let mut table = Table::new(&Value::List(vec![
            Value::List(vec![text("N"), text("str")]),
        ]))
        .unwrap();
        table.append(&Value::List(vec![text("Flabébé!!!!")])).unwrap();
        table.append(&Value::List(vec![text("Pikachu")])).unwrap();

        assert_eq!(
            render_lines(&table).unwrap(),
            vec![
                "| N (str)     |".to_owned(),
                "| Flabébé!!!! |".to_owned(),
                "| Pikachu     |".to_owned(),
            ]
        );
    }

    #[test]
    fn render_ignores_rows_after_preview() {
        let mut table = Table::new(&Value::List(vec![
            Value::List(vec![text("Name"), text("str")]),
        ]))
        .unwrap();
        for name in ["a", "b", "c", "d", "e", "a very long name past the preview"] {
            table.append(&Value::List(vec![text(name)])).unwrap();
        }

        let preview = table.render().unwrap();
        assert_eq!(preview.lines().count(), 6);
        assert!(preview.starts_with("| Name (str) |\n| a          |"));
    }
}
