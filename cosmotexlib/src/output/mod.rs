//! Output: turn tables into LaTeX markup and write them out.
//!
//! - **latex**: LaTeX `tabular` and AASTeX `deluxetable` rendering
//! - **options**: [`LatexOptions`], the recognized writer options
//! - **reader**: parse a written LaTeX table back into a [`Table`]
//!
//! Writing goes through [`Table::write`], which renders the whole document
//! before opening the destination, so option and rendering errors never
//! leave a half-written file behind.

pub mod latex;
pub mod options;
pub mod reader;

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CosmotexError;
use crate::table::Table;
use crate::Result;

pub use latex::{escape_latex, render_aastex, render_latex, unescape_latex};
pub use options::{LatexOptions, LatexPreset, ValueFormat, OPTION_KEYS};
pub use reader::{read_latex, read_latex_file};

/// Markup flavor produced by [`Table::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// LaTeX `tabular`, optionally inside a float
    #[default]
    Latex,
    /// AASTeX `deluxetable`
    Aastex,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "latex" | "ascii.latex" => Ok(Format::Latex),
            "aastex" | "ascii.aastex" => Ok(Format::Aastex),
            other => Err(format!("unknown format '{other}' (expected latex or aastex)")),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Latex => f.write_str("latex"),
            Format::Aastex => f.write_str("aastex"),
        }
    }
}

/// Where a table is written: a filesystem path or an open stream.
///
/// Only path destinations take part in the overwrite check.
pub enum Destination<'a> {
    Path(PathBuf),
    Stream(&'a mut dyn Write),
}

impl<'a> Destination<'a> {
    /// A path destination.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Destination::Path(path.into())
    }

    /// Fail with [`CosmotexError::AlreadyExists`] if this is a path that
    /// exists and `overwrite` is false.
    pub fn ensure_writable(&self, overwrite: bool) -> Result<()> {
        match self {
            Destination::Path(path) if !overwrite && path.exists() => {
                Err(CosmotexError::AlreadyExists { path: path.clone() })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Destination::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<PathBuf> for Destination<'_> {
    fn from(path: PathBuf) -> Self {
        Destination::Path(path)
    }
}

impl From<&Path> for Destination<'_> {
    fn from(path: &Path) -> Self {
        Destination::Path(path.to_path_buf())
    }
}

impl From<&str> for Destination<'_> {
    fn from(path: &str) -> Self {
        Destination::Path(PathBuf::from(path))
    }
}

impl<'a, W: Write> From<&'a mut W> for Destination<'a> {
    fn from(writer: &'a mut W) -> Self {
        Destination::Stream(writer)
    }
}

impl Table {
    /// Render the table in the given format without writing it.
    pub fn render(&self, format: Format, options: &LatexOptions) -> Result<String> {
        match format {
            Format::Latex => render_latex(self, options),
            Format::Aastex => render_aastex(self, options),
        }
    }

    /// Render and write the table.
    ///
    /// Path destinations are created or truncated; an existing path is an
    /// error unless `overwrite` is set. Streams are written and flushed.
    pub fn write(
        &self,
        destination: Destination<'_>,
        format: Format,
        overwrite: bool,
        options: &LatexOptions,
    ) -> Result<()> {
        destination.ensure_writable(overwrite)?;
        let rendered = self.render(format, options)?;

        debug!(
            destination = ?destination,
            %format,
            columns = self.num_columns(),
            rows = self.num_rows(),
            "writing table"
        );

        match destination {
            Destination::Path(path) => fs::write(&path, rendered)?,
            Destination::Stream(writer) => {
                writer.write_all(rendered.as_bytes())?;
                writer.flush()?;
            }
        }
        Ok(())
    }
}
