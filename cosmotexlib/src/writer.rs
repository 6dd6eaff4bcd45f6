//! Write models as LaTeX tables.
//!
//! [`write_latex`] is the main entry point. It:
//! 1. Refuses to replace an existing file unless `overwrite` is set
//! 2. Converts the model with [`ToTable`]
//! 3. Annotates known columns with a LaTeX display format from [`LATEX_FORMATS`]
//! 4. Hands the table to [`Table::write`] with [`Format::Latex`]
//!
//! Errors from the conversion and the writer are returned as-is.

use tracing::debug;

use crate::output::{Destination, Format, LatexOptions};
use crate::table::{Table, ToTable};
use crate::Result;

/// Display formats for known column names.
///
/// Columns not listed here are written with their plain name.
pub static LATEX_FORMATS: &[(&str, &str)] = &[
    ("H0", r"H_0 [\mathrm{km/s/Mpc}]"),
    ("Om0", r"\Omega_{m,0}"),
    ("Ode0", r"\Omega_{\Lambda,0}"),
    ("Ob0", r"\Omega_{b,0}"),
    ("Tcmb0", r"T_{\mathrm{CMB},0} [\mathrm{K}]"),
    ("Neff", r"N_{\mathrm{eff}}"),
    ("m_nu", r"m_{\nu} [\mathrm{eV}]"),
    ("w0", r"w_0"),
    ("wa", r"w_a"),
];

/// Display format for a column name, if it has one.
pub fn latex_format(column: &str) -> Option<&'static str> {
    LATEX_FORMATS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, format)| *format)
}

/// Column name whose display format is `label`.
pub fn column_for_format(label: &str) -> Option<&'static str> {
    LATEX_FORMATS
        .iter()
        .find(|(_, format)| *format == label)
        .map(|(name, _)| *name)
}

/// Set the display format of every column listed in [`LATEX_FORMATS`].
pub fn apply_latex_formats(table: &mut Table) {
    for column in table.columns_mut() {
        if let Some(format) = latex_format(&column.name) {
            column.format = Some(format.to_string());
        }
    }
}

/// Write a model as a LaTeX table.
///
/// # Example
///
/// ```rust
/// use cosmotexlib::{realizations, write_latex, Destination, LatexOptions};
///
/// let planck = realizations::get("Planck18").unwrap();
/// let mut out: Vec<u8> = Vec::new();
/// let options = LatexOptions::new().caption("Planck 2018");
/// write_latex(&planck, Destination::from(&mut out), false, &options).unwrap();
///
/// let latex = String::from_utf8(out).unwrap();
/// assert!(latex.contains(r"\caption{Planck 2018}"));
/// assert!(latex.contains(r"$H_0 [\mathrm{km/s/Mpc}]$"));
/// ```
pub fn write_latex<M>(
    model: &M,
    destination: Destination<'_>,
    overwrite: bool,
    options: &LatexOptions,
) -> Result<()>
where
    M: ToTable + ?Sized,
{
    write_table(model, destination, Format::Latex, overwrite, options)
}

/// Write a model as a table in the given format.
///
/// Same pipeline as [`write_latex`] with a caller-chosen [`Format`].
pub fn write_table<M>(
    model: &M,
    destination: Destination<'_>,
    format: Format,
    overwrite: bool,
    options: &LatexOptions,
) -> Result<()>
where
    M: ToTable + ?Sized,
{
    destination.ensure_writable(overwrite)?;

    let mut table = model.to_table()?;
    apply_latex_formats(&mut table);
    debug!(columns = ?table.colnames(), "applied latex display formats");

    table.write(destination, format, overwrite, options)
}
