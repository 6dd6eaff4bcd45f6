//! Options for the LaTeX table writers.
//!
//! [`LatexOptions`] is the complete set of keys the writers understand.
//! Options can be built in code, decoded from a JSON/TOML file, or set one
//! key at a time from strings (as the CLI does). Unknown keys are rejected
//! in every case.
//!
//! | Key             | Meaning                                            |
//! |-----------------|----------------------------------------------------|
//! | `caption`       | Table caption                                      |
//! | `col_align`     | Tabular column spec (default: `c` per column)      |
//! | `tabletype`     | Float environment (default `table`, empty = none)  |
//! | `tablealign`    | Float placement, e.g. `h`                          |
//! | `preamble`      | Raw line(s) before the caption                     |
//! | `tablefoot`     | Raw line(s) after the tabular                      |
//! | `header_start`  | Raw line(s) before the header row                  |
//! | `header_end`    | Raw line(s) after the header rows                  |
//! | `data_start`    | Raw line(s) before the first data row              |
//! | `data_end`      | Raw line(s) after the last data row                |
//! | `include_names` | Only write these columns (comma list)              |
//! | `exclude_names` | Do not write these columns (comma list)            |
//! | `formats`       | Value formats, `col:fmt;col:fmt` (`.2f`, `.3e`, `d`, `g`) |
//! | `units`         | Unit overrides, `col:unit;col:unit`                |
//! | `latexdict`     | Layout preset: `AA` or `doublelines`               |

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::CosmotexError;
use crate::table::{format_float, Column, Table, Value};
use crate::Result;

/// Every key accepted by [`LatexOptions::set`].
pub const OPTION_KEYS: &[&str] = &[
    "caption",
    "col_align",
    "tabletype",
    "tablealign",
    "preamble",
    "tablefoot",
    "header_start",
    "header_end",
    "data_start",
    "data_end",
    "include_names",
    "exclude_names",
    "formats",
    "units",
    "latexdict",
];

/// Largest precision accepted by [`ValueFormat`].
pub const MAX_PRECISION: usize = 17;

/// Per-column rendering of numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ValueFormat {
    /// Fixed-point with the given number of decimals (`.2f`)
    Fixed(usize),
    /// Scientific notation with the given number of decimals (`.3e`)
    Exponent(usize),
    /// Rounded to an integer (`d`)
    Integer,
    /// Shortest round-trip representation (`g`)
    General,
}

impl ValueFormat {
    /// Render a value. Non-numeric values use their plain representation.
    pub fn apply(&self, value: &Value) -> String {
        match value {
            Value::Float(v) => self.number(*v),
            Value::Int(v) => match self {
                ValueFormat::Integer | ValueFormat::General => v.to_string(),
                _ => self.number(*v as f64),
            },
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| self.number(*v)).collect();
                format!("[{}]", parts.join(", "))
            }
            other => other.to_string(),
        }
    }

    fn number(&self, v: f64) -> String {
        match *self {
            ValueFormat::Fixed(p) => {
                let p = p.min(MAX_PRECISION);
                format!("{v:.p$}")
            }
            ValueFormat::Exponent(p) => {
                let p = p.min(MAX_PRECISION);
                format!("{v:.p$e}")
            }
            ValueFormat::Integer => format!("{v:.0}"),
            ValueFormat::General => format_float(v),
        }
    }
}

impl FromStr for ValueFormat {
    type Err = String;

    /// Accepts printf (`%.2f`), Python (`{:.2f}`) or bare (`.2f`) spellings.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let spec = s.trim();
        let spec = spec
            .strip_prefix("{:")
            .and_then(|rest| rest.strip_suffix('}'))
            .or_else(|| spec.strip_prefix('%'))
            .unwrap_or(spec);

        match spec {
            "d" | "i" => return Ok(ValueFormat::Integer),
            "g" | "" => return Ok(ValueFormat::General),
            _ => {}
        }

        let invalid = || format!("unsupported value format '{s}'");
        let precision = spec.strip_prefix('.').ok_or_else(invalid)?;
        let split = precision
            .char_indices()
            .last()
            .map(|(i, _)| i)
            .ok_or_else(invalid)?;
        let (digits, kind) = precision.split_at(split);
        let digits: usize = digits.parse().map_err(|_| invalid())?;
        if digits > MAX_PRECISION {
            return Err(format!(
                "precision {digits} in '{s}' exceeds {MAX_PRECISION}"
            ));
        }
        match kind {
            "f" => Ok(ValueFormat::Fixed(digits)),
            "e" => Ok(ValueFormat::Exponent(digits)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for ValueFormat {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueFormat::Fixed(p) => write!(f, ".{p}f"),
            ValueFormat::Exponent(p) => write!(f, ".{p}e"),
            ValueFormat::Integer => f.write_str("d"),
            ValueFormat::General => f.write_str("g"),
        }
    }
}

impl From<ValueFormat> for String {
    fn from(format: ValueFormat) -> Self {
        format.to_string()
    }
}

/// Named layout presets for rule lines around the header and data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LatexPreset {
    /// Astronomy & Astrophysics journal style
    #[serde(rename = "AA")]
    Aa,
    /// Double rules around header and data
    #[serde(rename = "doublelines")]
    DoubleLines,
}

impl LatexPreset {
    /// Line written before the header row.
    pub fn header_start(&self) -> &'static str {
        r"\hline \hline"
    }

    /// Line written after the header rows.
    pub fn header_end(&self) -> &'static str {
        match self {
            LatexPreset::Aa => r"\hline",
            LatexPreset::DoubleLines => r"\hline\hline",
        }
    }

    /// Line written after the last data row.
    pub fn data_end(&self) -> &'static str {
        self.header_end()
    }
}

impl FromStr for LatexPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "AA" => Ok(LatexPreset::Aa),
            "doublelines" => Ok(LatexPreset::DoubleLines),
            other => Err(format!(
                "unknown preset '{other}' (expected AA or doublelines)"
            )),
        }
    }
}

fn default_tabletype() -> String {
    "table".to_string()
}

/// Options forwarded to the table writers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LatexOptions {
    /// Table caption
    pub caption: Option<String>,
    /// Tabular column spec; defaults to one `c` per written column
    pub col_align: Option<String>,
    /// Float environment name; empty disables the environment
    #[serde(default = "default_tabletype")]
    pub tabletype: String,
    /// Float placement specifier
    pub tablealign: Option<String>,
    /// Raw LaTeX before the caption
    pub preamble: Option<String>,
    /// Raw LaTeX after the tabular
    pub tablefoot: Option<String>,
    /// Raw LaTeX before the header row
    pub header_start: Option<String>,
    /// Raw LaTeX after the header rows
    pub header_end: Option<String>,
    /// Raw LaTeX before the first data row
    pub data_start: Option<String>,
    /// Raw LaTeX after the last data row
    pub data_end: Option<String>,
    /// Restrict output to these columns (table order is kept)
    pub include_names: Option<Vec<String>>,
    /// Columns to leave out
    pub exclude_names: Vec<String>,
    /// Per-column value formats
    pub formats: BTreeMap<String, ValueFormat>,
    /// Per-column unit overrides (LaTeX, without math delimiters)
    pub units: BTreeMap<String, String>,
    /// Layout preset; explicit line options take precedence
    pub latexdict: Option<LatexPreset>,
}

impl Default for LatexOptions {
    fn default() -> Self {
        Self {
            caption: None,
            col_align: None,
            tabletype: default_tabletype(),
            tablealign: None,
            preamble: None,
            tablefoot: None,
            header_start: None,
            header_end: None,
            data_start: None,
            data_end: None,
            include_names: None,
            exclude_names: Vec::new(),
            formats: BTreeMap::new(),
            units: BTreeMap::new(),
            latexdict: None,
        }
    }
}

/// Split a comma list, dropping empty entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Split `col:value;col:value` pairs.
fn split_pairs(key: &str, value: &str) -> Result<Vec<(String, String)>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|pair| {
            pair.split_once(':')
                .map(|(col, v)| (col.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| CosmotexError::InvalidOption {
                    key: key.to_string(),
                    message: format!("expected 'column:value', got '{pair}'"),
                })
        })
        .collect()
}

impl LatexOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build options from `(key, value)` string pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::new();
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref())?;
        }
        Ok(options)
    }

    /// Load options from a `.json` or `.toml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        config::load_file(path.as_ref())
    }

    /// Set one option from its string form.
    ///
    /// Fails with [`CosmotexError::UnknownOption`] for keys not listed in
    /// [`OPTION_KEYS`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = |message: String| CosmotexError::InvalidOption {
            key: key.to_string(),
            message,
        };

        match key {
            "caption" => self.caption = Some(value.to_string()),
            "col_align" => self.col_align = Some(value.to_string()),
            "tabletype" => self.tabletype = value.to_string(),
            "tablealign" => self.tablealign = Some(value.to_string()),
            "preamble" => self.preamble = Some(value.to_string()),
            "tablefoot" => self.tablefoot = Some(value.to_string()),
            "header_start" => self.header_start = Some(value.to_string()),
            "header_end" => self.header_end = Some(value.to_string()),
            "data_start" => self.data_start = Some(value.to_string()),
            "data_end" => self.data_end = Some(value.to_string()),
            "include_names" => self.include_names = Some(split_list(value)),
            "exclude_names" => self.exclude_names = split_list(value),
            "formats" => {
                for (column, spec) in split_pairs(key, value)? {
                    let format = spec.parse().map_err(invalid)?;
                    self.formats.insert(column, format);
                }
            }
            "units" => {
                for (column, unit) in split_pairs(key, value)? {
                    self.units.insert(column, unit);
                }
            }
            "latexdict" => self.latexdict = Some(value.parse().map_err(invalid)?),
            _ => {
                return Err(CosmotexError::UnknownOption {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// Builder: set the caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Builder: set the column alignment spec.
    pub fn col_align(mut self, align: impl Into<String>) -> Self {
        self.col_align = Some(align.into());
        self
    }

    /// Builder: set the float environment (empty string disables it).
    pub fn tabletype(mut self, tabletype: impl Into<String>) -> Self {
        self.tabletype = tabletype.into();
        self
    }

    /// Builder: set the float placement.
    pub fn tablealign(mut self, align: impl Into<String>) -> Self {
        self.tablealign = Some(align.into());
        self
    }

    /// Builder: restrict output to these columns.
    pub fn include_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.include_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Builder: leave these columns out.
    pub fn exclude_names<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.exclude_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Builder: set the value format for one column.
    pub fn format(mut self, column: impl Into<String>, format: ValueFormat) -> Self {
        self.formats.insert(column.into(), format);
        self
    }

    /// Builder: override the unit of one column.
    pub fn unit(mut self, column: impl Into<String>, unit: impl Into<String>) -> Self {
        self.units.insert(column.into(), unit.into());
        self
    }

    /// Builder: apply a layout preset.
    pub fn latexdict(mut self, preset: LatexPreset) -> Self {
        self.latexdict = Some(preset);
        self
    }

    /// Effective header-start line (explicit option, then preset).
    pub fn header_start_line(&self) -> Option<&str> {
        self.header_start
            .as_deref()
            .or_else(|| self.latexdict.map(|p| p.header_start()))
    }

    /// Effective header-end line (explicit option, then preset).
    pub fn header_end_line(&self) -> Option<&str> {
        self.header_end
            .as_deref()
            .or_else(|| self.latexdict.map(|p| p.header_end()))
    }

    /// Effective data-end line (explicit option, then preset).
    pub fn data_end_line(&self) -> Option<&str> {
        self.data_end
            .as_deref()
            .or_else(|| self.latexdict.map(|p| p.data_end()))
    }

    /// Check that every column named by an option exists in the table.
    pub fn validate(&self, table: &Table) -> Result<()> {
        let check = |key: &str, name: &str| {
            if table.column(name).is_some() {
                Ok(())
            } else {
                Err(CosmotexError::InvalidOption {
                    key: key.to_string(),
                    message: format!("no column named '{name}'"),
                })
            }
        };

        for name in self.include_names.iter().flatten() {
            check("include_names", name)?;
        }
        for name in &self.exclude_names {
            check("exclude_names", name)?;
        }
        for name in self.formats.keys() {
            check("formats", name)?;
        }
        for name in self.units.keys() {
            check("units", name)?;
        }
        Ok(())
    }

    /// Columns to write, in table order.
    pub fn selected_columns<'a>(&self, table: &'a Table) -> Vec<&'a Column> {
        table
            .columns()
            .iter()
            .filter(|c| {
                self.include_names
                    .as_ref()
                    .map_or(true, |names| names.contains(&c.name))
            })
            .filter(|c| !self.exclude_names.contains(&c.name))
            .collect()
    }

    /// Unit of a column after overrides.
    pub fn unit_for<'a>(&'a self, column: &'a Column) -> Option<&'a str> {
        self.units
            .get(&column.name)
            .map(String::as_str)
            .or(column.unit.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_format_parse() {
        assert_eq!("%.2f".parse::<ValueFormat>(), Ok(ValueFormat::Fixed(2)));
        assert_eq!(".3e".parse::<ValueFormat>(), Ok(ValueFormat::Exponent(3)));
        assert_eq!("{:.1f}".parse::<ValueFormat>(), Ok(ValueFormat::Fixed(1)));
        assert_eq!("d".parse::<ValueFormat>(), Ok(ValueFormat::Integer));
        assert_eq!("%g".parse::<ValueFormat>(), Ok(ValueFormat::General));
        assert!("x".parse::<ValueFormat>().is_err());
        assert!(".f".parse::<ValueFormat>().is_err());
        assert_eq!(".17f".parse::<ValueFormat>(), Ok(ValueFormat::Fixed(17)));
        assert!(".18e".parse::<ValueFormat>().is_err());
        assert!(".70000f".parse::<ValueFormat>().is_err());
    }

    #[test]
    fn test_oversized_precision_is_an_invalid_option() {
        let err = LatexOptions::from_pairs([("formats", "H0:.70000f")]).unwrap_err();
        assert!(matches!(err, CosmotexError::InvalidOption { key, .. } if key == "formats"));
        assert_eq!(ValueFormat::Fixed(70000).apply(&Value::Float(0.5)).len(), 19);
    }

    #[test]
    fn test_value_format_apply() {
        assert_eq!(ValueFormat::Fixed(2).apply(&Value::Float(67.4)), "67.40");
        assert_eq!(ValueFormat::Integer.apply(&Value::Float(67.6)), "68");
        assert_eq!(ValueFormat::Exponent(1).apply(&Value::Float(1500.0)), "1.5e3");
        assert_eq!(
            ValueFormat::Fixed(1).apply(&Value::List(vec![0.0, 0.06])),
            "[0.0, 0.1]"
        );
        assert_eq!(ValueFormat::Fixed(1).apply(&Value::Int(3)), "3.0");
        assert_eq!(ValueFormat::Fixed(1).apply(&Value::from("A")), "A");
    }

    #[test]
    fn test_set_known_keys() {
        let mut options = LatexOptions::new();
        options.set("caption", "Models").unwrap();
        options.set("include_names", "name, H0").unwrap();
        options.set("formats", "H0:.1f;Om0:%.3f").unwrap();
        options.set("units", r"H0:\mathrm{km/s/Mpc}").unwrap();
        options.set("latexdict", "AA").unwrap();

        assert_eq!(options.caption.as_deref(), Some("Models"));
        assert_eq!(
            options.include_names,
            Some(vec!["name".to_string(), "H0".to_string()])
        );
        assert_eq!(options.formats.get("Om0"), Some(&ValueFormat::Fixed(3)));
        assert_eq!(options.units.get("H0").map(String::as_str), Some(r"\mathrm{km/s/Mpc}"));
        assert_eq!(options.header_end_line(), Some(r"\hline"));
    }

    #[test]
    fn test_set_unknown_key_fails() {
        let mut options = LatexOptions::new();
        let err = options.set("captoin", "typo").unwrap_err();
        assert!(matches!(err, CosmotexError::UnknownOption { key } if key == "captoin"));
    }

    #[test]
    fn test_set_invalid_values_fail() {
        let mut options = LatexOptions::new();
        assert!(matches!(
            options.set("latexdict", "fancy"),
            Err(CosmotexError::InvalidOption { .. })
        ));
        assert!(matches!(
            options.set("formats", "H0"),
            Err(CosmotexError::InvalidOption { .. })
        ));
        assert!(matches!(
            options.set("formats", "H0:%q"),
            Err(CosmotexError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_every_listed_key_is_accepted() {
        for key in OPTION_KEYS {
            let value = match *key {
                "formats" => "H0:.2f",
                "units" => "H0:K",
                "latexdict" => "doublelines",
                _ => "x",
            };
            LatexOptions::new().set(key, value).unwrap();
        }
    }

    #[test]
    fn test_explicit_lines_override_preset() {
        let mut options = LatexOptions::new().latexdict(LatexPreset::DoubleLines);
        assert_eq!(options.header_start_line(), Some(r"\hline \hline"));
        assert_eq!(options.data_end_line(), Some(r"\hline\hline"));
        options.set("data_end", r"\bottomrule").unwrap();
        assert_eq!(options.data_end_line(), Some(r"\bottomrule"));
    }

    #[test]
    fn test_decode_from_toml() {
        let options: LatexOptions = config::from_toml_str(
            "caption = \"Models\"\nlatexdict = \"AA\"\n[formats]\nH0 = \"%.1f\"\n",
        )
        .unwrap();
        assert_eq!(options.caption.as_deref(), Some("Models"));
        assert_eq!(options.tabletype, "table");
        assert_eq!(options.latexdict, Some(LatexPreset::Aa));
        assert_eq!(options.formats.get("H0"), Some(&ValueFormat::Fixed(1)));

        let err = config::from_toml_str::<LatexOptions>("captoin = \"x\"\n").unwrap_err();
        assert!(matches!(err, CosmotexError::Config(_)));
    }

    #[test]
    fn test_validate_and_select() {
        let table = Table::from_columns(vec![
            Column::new("name", vec!["A".into()]),
            Column::new("H0", vec![67.4.into()]),
            Column::new("Om0", vec![0.3.into()]),
        ])
        .unwrap();

        let options = LatexOptions::new().exclude_names(["Om0"]);
        options.validate(&table).unwrap();
        let names: Vec<&str> = options
            .selected_columns(&table)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "H0"]);

        let options = LatexOptions::new().include_names(["H0", "name"]);
        let names: Vec<&str> = options
            .selected_columns(&table)
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["name", "H0"]);

        let bad = LatexOptions::new().format("Ob0", ValueFormat::Fixed(2));
        assert!(matches!(
            bad.validate(&table),
            Err(CosmotexError::InvalidOption { .. })
        ));
    }
}
