//! # cosmotexlib
//!
//! Write cosmological models as LaTeX tables.
//!
//! ## Overview
//!
//! A model is converted into a [`Table`] of named columns, the columns with
//! a known physical meaning are given a LaTeX display label, and the table
//! is rendered as a LaTeX `tabular` (or an AASTeX `deluxetable`):
//!
//! - **H0**: `$H_0 [\mathrm{km/s/Mpc}]$`
//! - **Om0**: `$\Omega_{m,0}$`
//! - **Tcmb0**: `$T_{\mathrm{CMB},0} [\mathrm{K}]$`
//! - ...and the rest of [`LATEX_FORMATS`]
//!
//! ## Features
//!
//! - **Overwrite guard**: existing files are never replaced unless asked
//! - **Typed writer options**: unknown option keys are rejected up front
//! - **Built-in realizations**: Planck and WMAP parameter sets
//! - **Round trip**: written tables can be read back with [`read_latex`]
//!
//! ## Example
//!
//! ```rust
//! use cosmotexlib::{write_latex, Cosmology, Destination, LatexOptions};
//! use tempfile::tempdir;
//!
//! let dir = tempdir().unwrap();
//! let path = dir.path().join("out.tex");
//!
//! let models = vec![
//!     Cosmology::flat_lambda_cdm(67.4, 0.315).with_name("A"),
//!     Cosmology::flat_lambda_cdm(70.1, 0.3).with_name("B"),
//! ];
//! write_latex(&models, Destination::path(&path), false, &LatexOptions::new()).unwrap();
//!
//! // A second write without overwrite is refused
//! let again = write_latex(&models, Destination::path(&path), false, &LatexOptions::new());
//! assert!(again.is_err());
//! ```

pub mod config;
pub mod cosmology;
pub mod error;
pub mod output;
pub mod table;
pub mod writer;

pub use cosmology::{realizations, Cosmology, CosmologyKind};
pub use error::CosmotexError;
pub use output::{
    read_latex, read_latex_file, Destination, Format, LatexOptions, LatexPreset, ValueFormat,
};
pub use table::{Column, Table, ToTable, Value};
pub use writer::{apply_latex_formats, latex_format, write_latex, write_table, LATEX_FORMATS};

/// Result type for cosmotexlib operations
pub type Result<T> = std::result::Result<T, CosmotexError>;
