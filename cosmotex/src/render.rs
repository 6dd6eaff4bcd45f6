//! Template rendering for `list` and `read` using outstanding

use anyhow::{anyhow, Result};
use console::Style;
use cosmotexlib::{Cosmology, Table};
use outstanding::{render_auto, render_with_output, Theme};
use serde::Serialize;

/// Re-export OutputMode for callers
pub use outstanding::OutputMode;

const REALIZATIONS_TEMPLATE: &str = include_str!("../templates/realizations.jinja");
const TABLE_TEMPLATE: &str = include_str!("../templates/table.jinja");

/// Data context for the grid templates (pre-padded lines)
#[derive(Debug, Serialize)]
struct GridContext {
    header: String,
    units: Option<String>,
    rows: Vec<String>,
}

fn create_theme() -> Theme {
    Theme::new()
        .add("header", Style::new().bold())
        .add("unit", Style::new().dim())
}

/// Map an `--output` value to a mode.
pub fn output_mode(value: Option<&str>) -> OutputMode {
    match value {
        Some("json") => OutputMode::Json,
        Some("text") => OutputMode::Text,
        Some("term") => OutputMode::Term,
        _ => OutputMode::Auto,
    }
}

/// Left-align every cell to its column's widest cell.
fn pad_rows(rows: &[Vec<String>]) -> Vec<String> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..width)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

/// Split padded lines into the grid context.
fn grid_context(lines: Vec<String>, has_units: bool) -> GridContext {
    let mut lines = lines.into_iter();
    let header = lines.next().unwrap_or_default();
    let units = if has_units { lines.next() } else { None };
    GridContext {
        header,
        units,
        rows: lines.collect(),
    }
}

/// Render realizations: a grid in text modes, the model list in JSON mode.
pub fn render_realizations(models: &[Cosmology], mode: OutputMode) -> Result<String> {
    let theme = create_theme();
    if matches!(mode, OutputMode::Json) {
        return render_auto(REALIZATIONS_TEMPLATE, &models, &theme, mode)
            .map_err(|e| anyhow!("{e}"));
    }

    let mut rows = vec![vec![
        "Name".to_string(),
        "H0".to_string(),
        "Om0".to_string(),
        "Tcmb0".to_string(),
        "Ob0".to_string(),
    ]];
    for model in models {
        rows.push(vec![
            model.name.clone().unwrap_or_default(),
            model.h0.to_string(),
            model.om0.to_string(),
            model.tcmb0.to_string(),
            model.ob0.map(|v| v.to_string()).unwrap_or_default(),
        ]);
    }

    let context = grid_context(pad_rows(&rows), false);
    render_with_output(REALIZATIONS_TEMPLATE, &context, &theme, mode).map_err(|e| anyhow!("{e}"))
}

/// Render a table read back from LaTeX: a grid in text modes, the table
/// itself in JSON mode.
pub fn render_table(table: &Table, mode: OutputMode) -> Result<String> {
    let theme = create_theme();
    if matches!(mode, OutputMode::Json) {
        return render_auto(TABLE_TEMPLATE, table, &theme, mode).map_err(|e| anyhow!("{e}"));
    }

    let columns = table.columns();
    let mut rows: Vec<Vec<String>> = vec![columns.iter().map(|c| c.name.clone()).collect()];
    let has_units = columns.iter().any(|c| c.unit.is_some());
    if has_units {
        rows.push(
            columns
                .iter()
                .map(|c| c.unit.clone().unwrap_or_default())
                .collect(),
        );
    }
    for i in 0..table.num_rows() {
        rows.push(
            columns
                .iter()
                .map(|c| c.values.get(i).map(ToString::to_string).unwrap_or_default())
                .collect(),
        );
    }

    let context = grid_context(pad_rows(&rows), has_units);
    render_with_output(TABLE_TEMPLATE, &context, &theme, mode).map_err(|e| anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cosmotexlib::{realizations, Column, Value};

    #[test]
    fn test_pad_rows() {
        let rows = vec![
            vec!["a".to_string(), "bb".to_string()],
            vec!["ccc".to_string(), "d".to_string()],
        ];
        assert_eq!(pad_rows(&rows), vec!["a    bb", "ccc  d"]);
    }

    #[test]
    fn test_grid_context_splits_units() {
        let lines = vec!["h".to_string(), "u".to_string(), "r".to_string()];
        let context = grid_context(lines.clone(), true);
        assert_eq!(context.units.as_deref(), Some("u"));
        assert_eq!(context.rows, vec!["r"]);

        let context = grid_context(lines, false);
        assert_eq!(context.units, None);
        assert_eq!(context.rows, vec!["u", "r"]);
    }

    #[test]
    fn test_render_table_text() {
        let table = Table::from_columns(vec![
            Column::new("name", vec!["A".into(), "B".into()]),
            Column::new("H0", vec![Value::Float(67.4), Value::Float(70.1)]),
        ])
        .unwrap();
        let text = render_table(&table, OutputMode::Text).unwrap();
        assert!(text.contains("name  H0"));
        assert!(text.contains("A     67.4"));
        assert!(text.contains("B     70.1"));
    }

    #[test]
    fn test_render_realizations_json() {
        let models = vec![realizations::get("WMAP9").unwrap()];
        let json = render_realizations(&models, OutputMode::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["name"], "WMAP9");
    }

    #[test]
    fn test_output_mode() {
        assert!(matches!(output_mode(Some("json")), OutputMode::Json));
        assert!(matches!(output_mode(Some("text")), OutputMode::Text));
        assert!(matches!(output_mode(None), OutputMode::Auto));
    }
}
