//! Reform and assumption document parsing
//!
//! Parameter files are JSON with `//` line comments allowed. A reform file
//! carries a single top-level `policy` object; an economic-assumption file
//! carries `consumption`, `behavior`, `growdiff_baseline` and
//! `growdiff_response`. A key from one kind appearing in a file of the other
//! kind is a configuration error.
//!
//! Inside each object, parameters map to per-year value lists:
//!
//! ```json
//! {
//!     "policy": {
//!         "_rt7": {"2020": [0.42]},
//!         "_brk6": {"2020": [[500000, 550000, 275000, 525000, 550000, 275000]]},
//!         "_stded_cpi": {"2020": false}
//!     }
//! }
//! ```
//!
//! Year keys are strings in JSON and are converted to integers here. Rows are
//! consecutive-year values starting at the keyed year; `null` entries defer to
//! the parameter's indexing rule.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::errors::ConfigError;

const REFORM_KEY: &str = "policy";
const ASSUMPTION_KEYS: [&str; 4] = [
    "consumption",
    "behavior",
    "growdiff_baseline",
    "growdiff_response",
];

/// One supplied year-row of a parameter: a scalar or a per-group vector,
/// with `None` standing for the JSON `null` sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRow {
    Scalar(Option<f64>),
    Vector(Vec<Option<f64>>),
}

/// All modifications a reform applies starting at one year.
#[derive(Debug, Clone, Default)]
pub struct YearMods {
    /// Parameter name to its supplied rows for consecutive years.
    pub values: BTreeMap<String, Vec<RawRow>>,
    /// Indexing-flag overrides, keyed by the bare parameter name.
    pub indexing: BTreeMap<String, bool>,
}

impl YearMods {
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.indexing.is_empty()
    }
}

/// A parsed policy reform: start year to the modifications applied there.
#[derive(Debug, Clone, Default)]
pub struct Reform {
    pub years: BTreeMap<u32, YearMods>,
}

impl Reform {
    pub fn is_empty(&self) -> bool {
        self.years.values().all(YearMods::is_empty)
    }
}

/// Parsed economic-assumption file. The engine itself consumes only the
/// growth-difference sections; consumption and behavior are validated and
/// retained for callers that inspect them.
#[derive(Debug, Clone, Default)]
pub struct EconAssumptions {
    pub consumption: BTreeMap<u32, YearMods>,
    pub behavior: BTreeMap<u32, YearMods>,
    pub growdiff_baseline: BTreeMap<u32, YearMods>,
    pub growdiff_response: BTreeMap<u32, YearMods>,
}

/// Remove `//` line comments. Naive truncation at the first `//`, which the
/// parameter-file format does not allow inside string values.
fn strip_comments(text: &str) -> String {
    text.lines()
        .map(|line| match line.find("//") {
            Some(pos) => &line[..pos],
            None => line,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_number(v: &Value) -> Option<Option<f64>> {
    match v {
        Value::Null => Some(None),
        Value::Number(n) => n.as_f64().map(Some),
        Value::Bool(b) => Some(Some(if *b { 1.0 } else { 0.0 })),
        _ => None,
    }
}

fn parse_row(name: &str, v: &Value) -> Result<RawRow, ConfigError> {
    if let Some(s) = parse_number(v) {
        return Ok(RawRow::Scalar(s));
    }
    if let Value::Array(items) = v {
        let mut row = Vec::with_capacity(items.len());
        for item in items {
            let n = parse_number(item)
                .ok_or_else(|| ConfigError::BadValueType(name.to_string()))?;
            row.push(n);
        }
        return Ok(RawRow::Vector(row));
    }
    Err(ConfigError::BadValueType(name.to_string()))
}

fn parse_year_key(key: &str) -> Result<u32, ConfigError> {
    key.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::BadYearKey(key.to_string()))
}

/// Convert one `{param: {year: rows}}` object into `{year: mods}` form.
fn convert_section(section: &Value) -> Result<BTreeMap<u32, YearMods>, ConfigError> {
    let obj = match section {
        Value::Object(map) => map,
        _ => return Ok(BTreeMap::new()),
    };
    let mut out: BTreeMap<u32, YearMods> = BTreeMap::new();
    for (name, per_year) in obj {
        let per_year = match per_year {
            Value::Object(map) => map,
            _ => return Err(ConfigError::BadValueType(name.clone())),
        };
        for (year_key, value) in per_year {
            let year = parse_year_key(year_key)?;
            let mods = out.entry(year).or_default();
            if let Some(base) = name.strip_suffix("_cpi") {
                let flag = match value {
                    Value::Bool(b) => *b,
                    _ => return Err(ConfigError::BadValueType(name.clone())),
                };
                mods.indexing.insert(base.to_string(), flag);
                continue;
            }
            let rows = match value {
                Value::Array(items) => items
                    .iter()
                    .map(|item| parse_row(name, item))
                    .collect::<Result<Vec<_>, _>>()?,
                other => vec![parse_row(name, other)?],
            };
            mods.values.insert(name.clone(), rows);
        }
    }
    Ok(out)
}

fn top_level(text: &str) -> Result<serde_json::Map<String, Value>, ConfigError> {
    let value: Value = serde_json::from_str(&strip_comments(text))?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ConfigError::MissingKey {
            key: REFORM_KEY.to_string(),
            kind: "parameter",
        }),
    }
}

/// Parse a policy-reform file.
pub fn parse_reform(text: &str) -> Result<Reform, ConfigError> {
    let map = top_level(text)?;
    for key in map.keys() {
        if ASSUMPTION_KEYS.contains(&key.as_str()) {
            return Err(ConfigError::MisplacedKey {
                key: key.clone(),
                kind: "reform",
            });
        }
    }
    let section = map.get(REFORM_KEY).ok_or_else(|| ConfigError::MissingKey {
        key: REFORM_KEY.to_string(),
        kind: "reform",
    })?;
    Ok(Reform {
        years: convert_section(section)?,
    })
}

/// Parse an economic-assumption file.
pub fn parse_assumptions(text: &str) -> Result<EconAssumptions, ConfigError> {
    let map = top_level(text)?;
    if map.contains_key(REFORM_KEY) {
        return Err(ConfigError::MisplacedKey {
            key: REFORM_KEY.to_string(),
            kind: "assumption",
        });
    }
    for key in ASSUMPTION_KEYS {
        if !map.contains_key(key) {
            return Err(ConfigError::MissingKey {
                key: key.to_string(),
                kind: "assumption",
            });
        }
    }
    Ok(EconAssumptions {
        consumption: convert_section(&map["consumption"])?,
        behavior: convert_section(&map["behavior"])?,
        growdiff_baseline: convert_section(&map["growdiff_baseline"])?,
        growdiff_response: convert_section(&map["growdiff_response"])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_stripping_and_year_conversion() {
        let text = r#"
        // raise the top rate
        {
            "policy": {
                "_rt7": {"2020": [0.42]} // applies 2020 on
            }
        }
        "#;
        let reform = parse_reform(text).unwrap();
        let mods = &reform.years[&2020];
        assert_eq!(mods.values["_rt7"], vec![RawRow::Scalar(Some(0.42))]);
    }

    #[test]
    fn test_vector_rows_and_nulls() {
        let text = r#"{"policy": {"_brk6": {"2019": [[5e5, 5.5e5, 2.75e5, 5.25e5, 5.5e5, 2.75e5], null]}}}"#;
        let reform = parse_reform(text).unwrap();
        let rows = &reform.years[&2019].values["_brk6"];
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], RawRow::Scalar(None));
        match &rows[0] {
            RawRow::Vector(v) => assert_eq!(v.len(), 6),
            other => panic!("unexpected row {other:?}"),
        }
    }

    #[test]
    fn test_cpi_override_key() {
        let text = r#"{"policy": {"_stded_cpi": {"2017": false}}}"#;
        let reform = parse_reform(text).unwrap();
        assert_eq!(reform.years[&2017].indexing["_stded"], false);
    }

    #[test]
    fn test_assumption_key_in_reform_file_rejected() {
        let text = r#"{"policy": {}, "behavior": {}}"#;
        assert!(matches!(
            parse_reform(text),
            Err(ConfigError::MisplacedKey { .. })
        ));
    }

    #[test]
    fn test_missing_policy_key_rejected() {
        let text = r#"{"reform": {}}"#;
        assert!(matches!(
            parse_reform(text),
            Err(ConfigError::MissingKey { .. })
        ));
    }

    #[test]
    fn test_assumption_file_requires_all_sections() {
        let text = r#"{"consumption": {}, "behavior": {}, "growdiff_baseline": {}}"#;
        assert!(matches!(
            parse_assumptions(text),
            Err(ConfigError::MissingKey { .. })
        ));
        let full = r#"{
            "consumption": {}, "behavior": {},
            "growdiff_baseline": {}, "growdiff_response": {}
        }"#;
        assert!(parse_assumptions(full).is_ok());
    }

    #[test]
    fn test_non_numeric_row_rejected() {
        let text = r#"{"policy": {"_rt7": {"2020": ["lots"]}}}"#;
        assert!(matches!(
            parse_reform(text),
            Err(ConfigError::BadValueType(_))
        ));
        let cpi = r#"{"policy": {"_stded_cpi": {"2017": 1}}}"#;
        assert!(matches!(
            parse_reform(cpi),
            Err(ConfigError::BadValueType(_))
        ));
    }

    #[test]
    fn test_bad_year_key() {
        let text = r#"{"policy": {"_rt7": {"soon": [0.42]}}}"#;
        assert!(matches!(
            parse_reform(text),
            Err(ConfigError::BadYearKey(_))
        ));
    }
}
