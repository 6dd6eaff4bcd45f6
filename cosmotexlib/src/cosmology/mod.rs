//! Cosmological models and their conversion into tables.
//!
//! A [`Cosmology`] is a flat parameter record tagged with a [`CosmologyKind`].
//! The kind decides which parameters are meaningful and therefore which
//! columns appear when the model is converted with [`ToTable`]:
//!
//! | Kind            | Extra columns      |
//! |-----------------|--------------------|
//! | `FlatLambdaCDM` | -                  |
//! | `LambdaCDM`     | `Ode0`             |
//! | `FlatwCDM`      | `w0`               |
//! | `wCDM`          | `Ode0`, `w0`       |
//! | `Flatw0waCDM`   | `w0`, `wa`         |
//! | `w0waCDM`       | `Ode0`, `w0`, `wa` |
//!
//! Every kind carries `name`, `H0`, `Om0`, `Tcmb0`, `Neff`, `m_nu` and `Ob0`.

pub mod realizations;

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::config;
use crate::error::CosmotexError;
use crate::table::{Column, Table, ToTable, Value};
use crate::Result;

/// Unit of the Hubble constant column.
pub const H0_UNIT: &str = r"\mathrm{km\,s^{-1}\,Mpc^{-1}}";
/// Unit of the CMB temperature column.
pub const TCMB0_UNIT: &str = r"\mathrm{K}";
/// Unit of the neutrino mass column.
pub const M_NU_UNIT: &str = r"\mathrm{eV}";

/// Family of the cosmological model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CosmologyKind {
    /// Flat universe with a cosmological constant
    #[default]
    FlatLambdaCDM,
    /// Cosmological constant with free curvature
    LambdaCDM,
    /// Flat universe with constant dark energy equation of state
    #[serde(rename = "FlatwCDM")]
    FlatWCdm,
    /// Constant dark energy equation of state with free curvature
    #[serde(rename = "wCDM")]
    WCdm,
    /// Flat universe with `w(a) = w0 + wa (1 - a)`
    #[serde(rename = "Flatw0waCDM")]
    FlatW0WaCdm,
    /// `w(a) = w0 + wa (1 - a)` with free curvature
    #[serde(rename = "w0waCDM")]
    W0WaCdm,
}

impl CosmologyKind {
    /// Canonical name, as used in model files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CosmologyKind::FlatLambdaCDM => "FlatLambdaCDM",
            CosmologyKind::LambdaCDM => "LambdaCDM",
            CosmologyKind::FlatWCdm => "FlatwCDM",
            CosmologyKind::WCdm => "wCDM",
            CosmologyKind::FlatW0WaCdm => "Flatw0waCDM",
            CosmologyKind::W0WaCdm => "w0waCDM",
        }
    }

    /// Flat kinds derive `Ode0` and do not carry it as a parameter.
    pub fn is_flat(&self) -> bool {
        matches!(
            self,
            CosmologyKind::FlatLambdaCDM | CosmologyKind::FlatWCdm | CosmologyKind::FlatW0WaCdm
        )
    }

    /// Whether `w0` is a parameter of this kind.
    pub fn has_w0(&self) -> bool {
        !matches!(
            self,
            CosmologyKind::FlatLambdaCDM | CosmologyKind::LambdaCDM
        )
    }

    /// Whether `wa` is a parameter of this kind.
    pub fn has_wa(&self) -> bool {
        matches!(self, CosmologyKind::FlatW0WaCdm | CosmologyKind::W0WaCdm)
    }
}

impl fmt::Display for CosmologyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_neff() -> f64 {
    3.04
}

fn default_w0() -> f64 {
    -1.0
}

/// Accept `m_nu` either as one mass shared by all species or as three masses.
fn deserialize_m_nu<'de, D>(deserializer: D) -> std::result::Result<[f64; 3], D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NeutrinoMasses {
        Shared(f64),
        PerSpecies([f64; 3]),
    }

    Ok(match NeutrinoMasses::deserialize(deserializer)? {
        NeutrinoMasses::Shared(m) => [m; 3],
        NeutrinoMasses::PerSpecies(masses) => masses,
    })
}

/// A cosmological model.
///
/// Parameter field names follow the conventional symbols when serialized
/// (`H0`, `Om0`, `Tcmb0`, ...). Unknown fields are rejected when decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cosmology {
    /// Optional human-readable name (e.g. "Planck18")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Model family
    #[serde(default)]
    pub kind: CosmologyKind,
    /// Hubble constant at z=0 in km/s/Mpc
    #[serde(rename = "H0")]
    pub h0: f64,
    /// Matter density at z=0 in units of the critical density
    #[serde(rename = "Om0")]
    pub om0: f64,
    /// Dark energy density at z=0; required by non-flat kinds
    #[serde(rename = "Ode0", default, skip_serializing_if = "Option::is_none")]
    pub ode0: Option<f64>,
    /// CMB temperature at z=0 in K
    #[serde(rename = "Tcmb0", default)]
    pub tcmb0: f64,
    /// Effective number of neutrino species
    #[serde(rename = "Neff", default = "default_neff")]
    pub neff: f64,
    /// Neutrino masses in eV
    #[serde(default, deserialize_with = "deserialize_m_nu")]
    pub m_nu: [f64; 3],
    /// Baryon density at z=0
    #[serde(rename = "Ob0", default, skip_serializing_if = "Option::is_none")]
    pub ob0: Option<f64>,
    /// Dark energy equation of state at z=0
    #[serde(default = "default_w0")]
    pub w0: f64,
    /// Dark energy equation of state evolution
    #[serde(default)]
    pub wa: f64,
}

impl Cosmology {
    /// Create a flat ΛCDM model with default secondary parameters.
    pub fn flat_lambda_cdm(h0: f64, om0: f64) -> Self {
        Self {
            name: None,
            kind: CosmologyKind::FlatLambdaCDM,
            h0,
            om0,
            ode0: None,
            tcmb0: 0.0,
            neff: default_neff(),
            m_nu: [0.0; 3],
            ob0: None,
            w0: default_w0(),
            wa: 0.0,
        }
    }

    /// Builder: set the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: set the model family.
    pub fn with_kind(mut self, kind: CosmologyKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: set the dark energy density.
    pub fn with_ode0(mut self, ode0: f64) -> Self {
        self.ode0 = Some(ode0);
        self
    }

    /// Builder: set the CMB temperature.
    pub fn with_tcmb0(mut self, tcmb0: f64) -> Self {
        self.tcmb0 = tcmb0;
        self
    }

    /// Builder: set the effective number of neutrino species.
    pub fn with_neff(mut self, neff: f64) -> Self {
        self.neff = neff;
        self
    }

    /// Builder: set the neutrino masses.
    pub fn with_m_nu(mut self, m_nu: [f64; 3]) -> Self {
        self.m_nu = m_nu;
        self
    }

    /// Builder: set the baryon density.
    pub fn with_ob0(mut self, ob0: f64) -> Self {
        self.ob0 = Some(ob0);
        self
    }

    /// Builder: set `w0`.
    pub fn with_w0(mut self, w0: f64) -> Self {
        self.w0 = w0;
        self
    }

    /// Builder: set `wa`.
    pub fn with_wa(mut self, wa: f64) -> Self {
        self.wa = wa;
        self
    }

    /// Decode a model from JSON.
    pub fn from_json_str(s: &str) -> Result<Self> {
        config::from_json_str(s)
    }

    /// Decode a model from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        config::from_toml_str(s)
    }

    /// Load a `.json` or `.toml` model file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        config::load_file(path.as_ref())
    }
}

/// Build one column from a per-model accessor.
fn column<F>(cosmologies: &[Cosmology], name: &str, value: F) -> Column
where
    F: Fn(&Cosmology) -> Value,
{
    Column::new(name, cosmologies.iter().map(value).collect())
}

impl ToTable for [Cosmology] {
    /// One row per model. All models must share the same kind.
    fn to_table(&self) -> Result<Table> {
        let first = self
            .first()
            .ok_or_else(|| CosmotexError::Conversion("no cosmologies to convert".to_string()))?;
        let kind = first.kind;

        if let Some(other) = self.iter().find(|c| c.kind != kind) {
            return Err(CosmotexError::Conversion(format!(
                "cannot mix {} and {} in one table",
                kind, other.kind
            )));
        }
        if !kind.is_flat() {
            if let Some(missing) = self.iter().find(|c| c.ode0.is_none()) {
                return Err(CosmotexError::Conversion(format!(
                    "{} model '{}' has no Ode0",
                    kind,
                    missing.name.as_deref().unwrap_or("<unnamed>")
                )));
            }
        }

        debug!(rows = self.len(), kind = %kind, "converting cosmologies to table");

        let mut columns = vec![
            column(self, "name", |c| {
                c.name.clone().map_or(Value::Null, Value::Text)
            }),
            column(self, "H0", |c| c.h0.into()).with_unit(H0_UNIT),
            column(self, "Om0", |c| c.om0.into()),
        ];
        if !kind.is_flat() {
            columns.push(column(self, "Ode0", |c| c.ode0.into()));
        }
        columns.push(column(self, "Tcmb0", |c| c.tcmb0.into()).with_unit(TCMB0_UNIT));
        columns.push(column(self, "Neff", |c| c.neff.into()));
        columns.push(column(self, "m_nu", |c| c.m_nu.to_vec().into()).with_unit(M_NU_UNIT));
        columns.push(column(self, "Ob0", |c| c.ob0.into()));
        if kind.has_w0() {
            columns.push(column(self, "w0", |c| c.w0.into()));
        }
        if kind.has_wa() {
            columns.push(column(self, "wa", |c| c.wa.into()));
        }

        Table::from_columns(columns)
    }
}

impl ToTable for Vec<Cosmology> {
    fn to_table(&self) -> Result<Table> {
        self.as_slice().to_table()
    }
}

impl ToTable for Cosmology {
    fn to_table(&self) -> Result<Table> {
        std::slice::from_ref(self).to_table()
    }
}
