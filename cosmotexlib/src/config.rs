//! Decoding of model and option files.
//!
//! Files are JSON or TOML, chosen by extension. Decode failures surface as
//! [`CosmotexError::Config`] carrying the decoder's message.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::CosmotexError;
use crate::Result;

/// Decode a value from a JSON string.
pub fn from_json_str<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_json::from_str(s).map_err(|e| CosmotexError::Config(e.to_string()))
}

/// Decode a value from a TOML string.
pub fn from_toml_str<T: DeserializeOwned>(s: &str) -> Result<T> {
    toml::from_str(s).map_err(|e| CosmotexError::Config(e.to_string()))
}

/// Read and decode a `.json` or `.toml` file.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => from_json_str(&contents),
        Some("toml") => from_toml_str(&contents),
        _ => Err(CosmotexError::Config(format!(
            "unsupported file '{}' (expected .json or .toml)",
            path.display()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_load_file_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("a.json");
        let toml = dir.path().join("a.toml");
        fs::write(&json, r#"{"x": "1"}"#).unwrap();
        fs::write(&toml, "x = \"1\"\n").unwrap();

        let from_json: BTreeMap<String, String> = load_file(&json).unwrap();
        let from_toml: BTreeMap<String, String> = load_file(&toml).unwrap();
        assert_eq!(from_json, from_toml);
    }

    #[test]
    fn test_unsupported_extension_and_bad_input() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = dir.path().join("a.yaml");
        fs::write(&yaml, "x: 1\n").unwrap();
        let err = load_file::<BTreeMap<String, String>>(&yaml).unwrap_err();
        assert!(matches!(err, CosmotexError::Config(msg) if msg.contains("unsupported")));

        assert!(matches!(
            from_json_str::<BTreeMap<String, String>>("{"),
            Err(CosmotexError::Config(_))
        ));
    }
}
