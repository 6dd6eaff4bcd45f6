//! Read LaTeX tables written by [`render_latex`](super::latex::render_latex).
//!
//! Only the `tabular` body is interpreted. Lines that start with a
//! backslash and do not end a row (`\hline`, `\toprule`, ...) are rules
//! and are skipped. The first row holds the column names; a second row
//! consisting only of `$...$` or empty cells is taken as the unit row.
//!
//! Header cells written from a known display format map back to the
//! original column name, so `$H_0 [\mathrm{km/s/Mpc}]$` reads as `H0`.

use std::fs;
use std::path::Path;

use crate::error::CosmotexError;
use crate::table::{Column, Table, Value};
use crate::writer::column_for_format;
use crate::Result;

use super::latex::unescape_latex;

/// Strip `$...$` math delimiters.
fn math_content(cell: &str) -> Option<&str> {
    cell.strip_prefix('$')?.strip_suffix('$')
}

/// Split a row on `&`, keeping escaped `\&` inside the cell.
fn split_cells(row: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in row.chars() {
        if ch == '&' && !escaped {
            cells.push(current.trim().to_string());
            current.clear();
        } else {
            current.push(ch);
        }
        escaped = ch == '\\' && !escaped;
    }
    cells.push(current.trim().to_string());
    cells
}

fn parse_list(inner: &str) -> Option<Vec<f64>> {
    if inner.trim().is_empty() {
        return Some(Vec::new());
    }
    inner.split(',').map(|v| v.trim().parse().ok()).collect()
}

/// Type a column's cells together.
///
/// Empty cells are missing values. The remaining cells must all parse as
/// the same type, tried in the order Int, Float, Bool, List; otherwise the
/// whole column is text. A text cell that looks like a number therefore
/// stays text as long as its column holds any other text.
fn parse_column(cells: &[String]) -> Vec<Value> {
    fn all_parse<T>(cells: &[String], parse: impl Fn(&str) -> Option<T>) -> Option<Vec<Option<T>>> {
        cells
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    Some(None)
                } else {
                    parse(cell).map(Some)
                }
            })
            .collect()
    }

    fn typed<T>(parsed: Vec<Option<T>>, wrap: impl Fn(T) -> Value) -> Vec<Value> {
        parsed
            .into_iter()
            .map(|v| v.map_or(Value::Null, &wrap))
            .collect()
    }

    if let Some(ints) = all_parse(cells, |c| c.parse::<i64>().ok()) {
        return typed(ints, Value::Int);
    }
    if let Some(floats) = all_parse(cells, |c| c.parse::<f64>().ok()) {
        return typed(floats, Value::Float);
    }
    if let Some(bools) = all_parse(cells, parse_bool) {
        return typed(bools, Value::Bool);
    }
    if let Some(lists) = all_parse(cells, |c| {
        c.strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .and_then(parse_list)
    }) {
        return typed(lists, Value::List);
    }
    cells
        .iter()
        .map(|cell| {
            if cell.is_empty() {
                Value::Null
            } else {
                Value::Text(unescape_latex(cell))
            }
        })
        .collect()
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" => Some(true),
        "False" => Some(false),
        _ => None,
    }
}

/// Column name and display format from a header cell.
fn parse_header(cell: &str) -> (String, Option<String>) {
    match math_content(cell) {
        Some(label) => match column_for_format(label) {
            Some(name) => (name.to_string(), Some(label.to_string())),
            None => (label.to_string(), None),
        },
        None => (unescape_latex(cell), None),
    }
}

fn is_unit_row(cells: &[String]) -> bool {
    cells
        .iter()
        .all(|c| c.is_empty() || math_content(c).is_some())
        && cells.iter().any(|c| !c.is_empty())
}

/// Parse the first `tabular` environment in `text` into a table.
pub fn read_latex(text: &str) -> Result<Table> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l.trim()));

    lines
        .by_ref()
        .find(|(_, l)| l.starts_with(r"\begin{tabular}"))
        .ok_or_else(|| CosmotexError::Parse {
            line: text.lines().count(),
            message: "no \\begin{tabular} found".to_string(),
        })?;

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    let mut closed = false;
    for (number, line) in lines {
        if line.starts_with(r"\end{tabular}") {
            closed = true;
            break;
        }
        if line.is_empty() || (line.starts_with('\\') && !line.ends_with(r"\\")) {
            continue;
        }
        let body = line.strip_suffix(r"\\").unwrap_or(line).trim_end();
        rows.push((number, split_cells(body)));
    }
    if !closed {
        return Err(CosmotexError::Parse {
            line: text.lines().count(),
            message: "unterminated tabular environment".to_string(),
        });
    }

    let mut rows = rows.into_iter();
    let (header_line, header) = rows.next().ok_or_else(|| CosmotexError::Parse {
        line: text.lines().count(),
        message: "tabular has no header row".to_string(),
    })?;
    let width = header.len();

    let mut columns: Vec<Column> = header
        .iter()
        .map(|cell| {
            let (name, format) = parse_header(cell);
            Column {
                name,
                unit: None,
                format,
                values: Vec::new(),
            }
        })
        .collect();
    let mut cells_by_column: Vec<Vec<String>> = vec![Vec::new(); width];

    let mut rows = rows.peekable();
    if let Some((_, cells)) = rows.peek() {
        if cells.len() == width && is_unit_row(cells) {
            for (column, cell) in columns.iter_mut().zip(cells) {
                column.unit = math_content(cell).map(String::from);
            }
            rows.next();
        }
    }

    for (number, cells) in rows {
        if cells.len() != width {
            return Err(CosmotexError::Parse {
                line: number,
                message: format!(
                    "row has {} cells, header on line {} has {}",
                    cells.len(),
                    header_line,
                    width
                ),
            });
        }
        for (column_cells, cell) in cells_by_column.iter_mut().zip(cells) {
            column_cells.push(cell);
        }
    }

    for (column, cells) in columns.iter_mut().zip(&cells_by_column) {
        column.values = parse_column(cells);
    }
    Table::from_columns(columns)
}

/// Read and parse a LaTeX table file.
pub fn read_latex_file(path: impl AsRef<Path>) -> Result<Table> {
    let text = fs::read_to_string(path)?;
    read_latex(&text)
}
