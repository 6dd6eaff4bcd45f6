//! LaTeX and AASTeX table rendering.
//!
//! Rendering is a pure function of a [`Table`] and [`LatexOptions`]: it
//! produces the complete document as a `String` and never touches the
//! filesystem. Writing happens in [`Table::write`](crate::table::Table::write).
//!
//! A LaTeX table is laid out as:
//!
//! ```text
//! \begin{table}[tablealign]
//! preamble
//! \caption{caption}
//! \begin{tabular}{col_align}
//! header_start
//! name & $H_0 [\mathrm{km/s/Mpc}]$ \\
//!  & $\mathrm{km\,s^{-1}\,Mpc^{-1}}$ \\
//! header_end
//! data_start
//! Planck18 & 67.66 \\
//! data_end
//! \end{tabular}
//! tablefoot
//! \end{table}
//! ```
//!
//! Optional lines are omitted when unset; the unit row only appears when a
//! written column has a unit.

use crate::error::CosmotexError;
use crate::table::{Column, Table, Value};
use crate::Result;

use super::options::{LatexOptions, ValueFormat};

/// Escape LaTeX special characters in plain text.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '\n' | '\r' => out.push(' '),
            '&' | '%' | '$' | '#' | '_' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Reverse [`escape_latex`].
pub fn unescape_latex(text: &str) -> String {
    text.replace(r"\textbackslash{}", "\u{0}")
        .replace(r"\textasciitilde{}", "~")
        .replace(r"\textasciicircum{}", "^")
        .replace(r"\&", "&")
        .replace(r"\%", "%")
        .replace(r"\$", "$")
        .replace(r"\#", "#")
        .replace(r"\_", "_")
        .replace(r"\{", "{")
        .replace(r"\}", "}")
        .replace('\u{0}', "\\")
}

/// Header cell: the display format in math mode, or the escaped name.
fn header_cell(column: &Column) -> String {
    match &column.format {
        Some(format) => format!("${format}$"),
        None => escape_latex(&column.name),
    }
}

/// Unit cell in math mode, or empty.
fn unit_cell(unit: Option<&str>) -> String {
    unit.map(|u| format!("${u}$")).unwrap_or_default()
}

fn data_cell(value: &Value, format: Option<&ValueFormat>) -> String {
    match (value, format) {
        (Value::Text(s), _) => escape_latex(s),
        (value, Some(format)) => format.apply(value),
        (value, None) => value.to_string(),
    }
}

/// Table contents resolved against the options, ready for layout.
struct Prepared {
    col_align: String,
    headers: Vec<String>,
    units: Option<Vec<String>>,
    rows: Vec<Vec<String>>,
}

fn prepare(table: &Table, options: &LatexOptions) -> Result<Prepared> {
    options.validate(table)?;
    let columns = options.selected_columns(table);
    if columns.is_empty() {
        return Err(CosmotexError::Conversion(
            "table has no columns to write".to_string(),
        ));
    }

    let headers: Vec<String> = columns.iter().map(|c| header_cell(c)).collect();

    let units: Vec<Option<&str>> = columns.iter().map(|c| options.unit_for(c)).collect();
    let units: Option<Vec<String>> = units
        .iter()
        .any(Option::is_some)
        .then(|| units.iter().map(|u| unit_cell(*u)).collect());

    let rows: Vec<Vec<String>> = (0..table.num_rows())
        .map(|i| {
            columns
                .iter()
                .map(|c| data_cell(&c.values[i], options.formats.get(&c.name)))
                .collect()
        })
        .collect();

    let col_align = options
        .col_align
        .clone()
        .unwrap_or_else(|| "c".repeat(columns.len()));

    Ok(Prepared {
        col_align,
        headers,
        units,
        rows,
    })
}

/// Append an optional raw block followed by a newline.
fn push_raw(out: &mut String, raw: Option<&str>) {
    if let Some(raw) = raw {
        out.push_str(raw);
        out.push('\n');
    }
}

/// AASTeX header cells: `\colhead{a} & \colhead{b}`.
fn colheads(cells: &[String]) -> String {
    cells
        .iter()
        .map(|c| format!("\\colhead{{{c}}}"))
        .collect::<Vec<_>>()
        .join(" & ")
}

fn push_row(out: &mut String, cells: &[String]) {
    out.push_str(&cells.join(" & "));
    out.push_str(" \\\\\n");
}

/// Render a table as a LaTeX `tabular`, optionally wrapped in a float.
pub fn render_latex(table: &Table, options: &LatexOptions) -> Result<String> {
    let prepared = prepare(table, options)?;
    let float_env = !options.tabletype.is_empty();
    let mut out = String::new();

    if float_env {
        out.push_str(&format!("\\begin{{{}}}", options.tabletype));
        if let Some(align) = &options.tablealign {
            out.push_str(&format!("[{align}]"));
        }
        out.push('\n');
    }
    push_raw(&mut out, options.preamble.as_deref());
    if let Some(caption) = &options.caption {
        out.push_str(&format!("\\caption{{{caption}}}\n"));
    }
    out.push_str(&format!("\\begin{{tabular}}{{{}}}\n", prepared.col_align));

    push_raw(&mut out, options.header_start_line());
    push_row(&mut out, &prepared.headers);
    if let Some(units) = &prepared.units {
        push_row(&mut out, units);
    }
    push_raw(&mut out, options.header_end_line());

    push_raw(&mut out, options.data_start.as_deref());
    for row in &prepared.rows {
        push_row(&mut out, row);
    }
    push_raw(&mut out, options.data_end_line());

    out.push_str("\\end{tabular}\n");
    push_raw(&mut out, options.tablefoot.as_deref());
    if float_env {
        out.push_str(&format!("\\end{{{}}}\n", options.tabletype));
    }

    Ok(out)
}

/// Render a table as an AASTeX `deluxetable`.
///
/// Honors `caption`, `col_align`, `preamble`, `tablefoot`, column selection,
/// value formats and unit overrides. The rule-line options and `tabletype`
/// have no meaning for `deluxetable` and are ignored.
pub fn render_aastex(table: &Table, options: &LatexOptions) -> Result<String> {
    let prepared = prepare(table, options)?;
    let mut out = String::new();

    out.push_str(&format!("\\begin{{deluxetable}}{{{}}}\n", prepared.col_align));
    push_raw(&mut out, options.preamble.as_deref());
    if let Some(caption) = &options.caption {
        out.push_str(&format!("\\tablecaption{{{caption}}}\n"));
    }

    out.push_str("\\tablehead{");
    out.push_str(&colheads(&prepared.headers));
    if let Some(units) = &prepared.units {
        out.push_str("\\\\ ");
        out.push_str(&colheads(units));
    }
    out.push_str("}\n");

    out.push_str("\\startdata\n");
    let rows: Vec<String> = prepared.rows.iter().map(|r| r.join(" & ")).collect();
    if !rows.is_empty() {
        out.push_str(&rows.join(" \\\\\n"));
        out.push('\n');
    }
    out.push_str("\\enddata\n");
    push_raw(&mut out, options.tablefoot.as_deref());
    out.push_str("\\end{deluxetable}\n");

    Ok(out)
}
