use anyhow::Result;
use std::io::Write;

const INDENT: &str = "    ";
const MIN_WIDTH: usize = 4;
const PADDING: usize = 4;

/// Writes tab-separated rows as space-aligned columns. Tabs inside a row
/// start a new column; the last cell of each row is not padded.
pub fn write_table(w: &mut dyn Write, rows: &[String]) -> Result<()> {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.split('\t').map(str::to_string).collect();
            cells[0].insert_str(0, INDENT);
            cells
        })
        .collect();

    let mut widths: Vec<usize> = Vec::new();
    for row in &cells {
        for (i, cell) in row.iter().enumerate().take(row.len() - 1) {
            let width = (cell.chars().count() + PADDING).max(MIN_WIDTH);
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(width),
                None => widths.push(width),
            }
        }
    }

    for row in &cells {
        let last = row.len() - 1;
        for (i, cell) in row.iter().enumerate() {
            if i == last {
                writeln!(w, "{}", cell)?;
            } else {
                write!(w, "{:<width$}", cell, width = widths[i])?;
            }
        }
    }
    Ok(())
}
