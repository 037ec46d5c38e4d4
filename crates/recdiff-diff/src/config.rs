//! File-backed diff configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};
use crate::options::{DiffOptions, IgnoreRule, PropertyPattern};

/// Serializable diff configuration.
///
/// Mirrors [`DiffOptions`] with plain strings so it can live in a TOML or
/// JSON file. Predicates have no file representation; callers needing them
/// build [`DiffOptions`] directly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Treat function values as equal by kind.
    pub allow_function_values: bool,
    /// Property names ignored entirely (exact match).
    pub ignore_properties: Vec<String>,
    /// Regexes over property names ignored entirely.
    pub ignore_property_patterns: Vec<String>,
    /// Property names whose values are passed through unexamined.
    pub ignore_property_values: Vec<String>,
    /// Regexes over property names whose values are passed through.
    pub ignore_property_value_patterns: Vec<String>,
}

impl DiffConfig {
    pub fn from_toml_str(source: &str) -> DiffResult<Self> {
        toml::from_str(source).map_err(|e| DiffError::Config(e.to_string()))
    }

    pub fn from_json_str(source: &str) -> DiffResult<Self> {
        serde_json::from_str(source).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Compile the configuration into runtime options.
    pub fn to_options(&self) -> DiffResult<DiffOptions> {
        Ok(DiffOptions {
            allow_function_values: self.allow_function_values,
            ignore_properties: compile(&self.ignore_properties, &self.ignore_property_patterns)?,
            ignore_property_values: compile(
                &self.ignore_property_values,
                &self.ignore_property_value_patterns,
            )?,
        })
    }
}

fn compile(names: &[String], patterns: &[String]) -> DiffResult<IgnoreRule> {
    let mut compiled: Vec<PropertyPattern> = names.iter().cloned().map(Into::into).collect();
    for pattern in patterns {
        let re = PropertyPattern::regex(pattern).map_err(|source| DiffError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        compiled.push(re);
    }
    Ok(IgnoreRule::patterns(compiled))
}
