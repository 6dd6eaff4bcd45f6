//! Built-in cosmology realizations from published CMB analyses.

use crate::error::CosmotexError;
use crate::Result;

use super::Cosmology;

/// Names accepted by [`get`], in alphabetical order.
pub fn available() -> &'static [&'static str] {
    &["Planck13", "Planck15", "Planck18", "WMAP5", "WMAP7", "WMAP9"]
}

/// Look up a realization by exact name.
pub fn get(name: &str) -> Result<Cosmology> {
    let (h0, om0, tcmb0, neff, m_nu, ob0) = match name {
        "Planck18" => (67.66, 0.30966, 2.7255, 3.046, [0.0, 0.0, 0.06], 0.04897),
        "Planck15" => (67.74, 0.3075, 2.7255, 3.046, [0.0, 0.0, 0.06], 0.0486),
        "Planck13" => (67.77, 0.30712, 2.7255, 3.046, [0.0, 0.0, 0.06], 0.048252),
        "WMAP9" => (69.32, 0.2865, 2.725, 3.04, [0.0; 3], 0.04628),
        "WMAP7" => (70.4, 0.272, 2.725, 3.04, [0.0; 3], 0.0455),
        "WMAP5" => (70.2, 0.277, 2.725, 3.04, [0.0; 3], 0.0459),
        _ => return Err(CosmotexError::UnknownCosmology(name.to_string())),
    };

    Ok(Cosmology::flat_lambda_cdm(h0, om0)
        .with_name(name)
        .with_tcmb0(tcmb0)
        .with_neff(neff)
        .with_m_nu(m_nu)
        .with_ob0(ob0))
}
