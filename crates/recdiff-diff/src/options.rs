//! Runtime diff options and ignore rules.

use std::fmt;
use std::sync::Arc;

use recdiff_types::{Object, Value};
use regex::Regex;

/// Predicate deciding whether a property is ignored. Receives the property
/// name and the two objects being compared.
pub type IgnorePredicate = dyn Fn(&str, &Object, &Object) -> bool + Send + Sync;

/// Matches a property name exactly or by regex.
#[derive(Clone, Debug)]
pub enum PropertyPattern {
    Exact(String),
    Regex(Regex),
}

impl PropertyPattern {
    pub fn regex(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(PropertyPattern::Regex)
    }

    pub fn matches(&self, name: &str) -> bool {
        match self {
            PropertyPattern::Exact(exact) => exact == name,
            PropertyPattern::Regex(re) => re.is_match(name),
        }
    }
}

impl From<&str> for PropertyPattern {
    fn from(name: &str) -> Self {
        PropertyPattern::Exact(name.to_string())
    }
}

impl From<String> for PropertyPattern {
    fn from(name: String) -> Self {
        PropertyPattern::Exact(name)
    }
}

impl From<Regex> for PropertyPattern {
    fn from(re: Regex) -> Self {
        PropertyPattern::Regex(re)
    }
}

/// Which properties a rule ignores: a pattern list, or a predicate.
#[derive(Clone)]
pub enum IgnoreRule {
    Patterns(Vec<PropertyPattern>),
    Predicate(Arc<IgnorePredicate>),
}

impl IgnoreRule {
    /// A rule that ignores nothing.
    pub fn none() -> Self {
        IgnoreRule::Patterns(Vec::new())
    }

    /// Ignore the given names (exact match).
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IgnoreRule::Patterns(
            names
                .into_iter()
                .map(|n| PropertyPattern::Exact(n.into()))
                .collect(),
        )
    }

    pub fn patterns(patterns: Vec<PropertyPattern>) -> Self {
        IgnoreRule::Patterns(patterns)
    }

    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&str, &Object, &Object) -> bool + Send + Sync + 'static,
    {
        IgnoreRule::Predicate(Arc::new(predicate))
    }

    pub fn matches(&self, name: &str, a: &Object, b: &Object) -> bool {
        match self {
            IgnoreRule::Patterns(patterns) => patterns.iter().any(|p| p.matches(name)),
            IgnoreRule::Predicate(predicate) => predicate(name, a, b),
        }
    }

    /// Whether the rule can never match.
    pub fn is_empty(&self) -> bool {
        matches!(self, IgnoreRule::Patterns(p) if p.is_empty())
    }
}

impl Default for IgnoreRule {
    fn default() -> Self {
        Self::none()
    }
}

impl fmt::Debug for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreRule::Patterns(patterns) => f.debug_tuple("Patterns").field(patterns).finish(),
            IgnoreRule::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// Options controlling a diff.
#[derive(Clone, Debug, Default)]
pub struct DiffOptions {
    /// Treat any two function values as equal instead of rejecting them.
    /// The comparison is by kind only: two different functions match.
    pub allow_function_values: bool,
    /// Properties left out of the comparison entirely.
    pub ignore_properties: IgnoreRule,
    /// Properties whose values are passed through unexamined. When present on
    /// both sides they are left out of the comparison.
    pub ignore_property_values: IgnoreRule,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_function_values(mut self, allow: bool) -> Self {
        self.allow_function_values = allow;
        self
    }

    pub fn with_ignored_properties(mut self, rule: IgnoreRule) -> Self {
        self.ignore_properties = rule;
        self
    }

    pub fn with_ignored_property_values(mut self, rule: IgnoreRule) -> Self {
        self.ignore_property_values = rule;
        self
    }

    /// Both sides are functions and function values are allowed.
    pub(crate) fn functions_match(&self, a: &Value, b: &Value) -> bool {
        self.allow_function_values && a.is_function() && b.is_function()
    }

    /// `value` is a function and function values are allowed.
    pub(crate) fn permits_function(&self, value: &Value) -> bool {
        self.allow_function_values && value.is_function()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recdiff_types::FunctionRef;

    #[test]
    fn patterns_match_exact_and_regex() {
        let rule = IgnoreRule::patterns(vec![
            "id".into(),
            PropertyPattern::regex("^_").unwrap(),
        ]);
        let empty = Object::new();
        assert!(rule.matches("id", &empty, &empty));
        assert!(rule.matches("_private", &empty, &empty));
        assert!(!rule.matches("identity", &empty, &empty));
        assert!(!rule.is_empty());
        assert!(IgnoreRule::none().is_empty());
    }

    #[test]
    fn predicate_sees_both_objects() {
        let rule = IgnoreRule::predicate(|name, a, b| a.contains_key(name) && !b.contains_key(name));
        let a: Object = [("x", 1)].into_iter().collect();
        let b = Object::new();
        assert!(rule.matches("x", &a, &b));
        assert!(!rule.matches("x", &b, &a));
        assert!(!rule.is_empty());
    }

    #[test]
    fn function_matching_is_by_kind() {
        let f = Value::Function(FunctionRef::new("f", |_| Value::Null));
        let g = Value::Function(FunctionRef::new("g", |_| Value::Null));

        let strict = DiffOptions::new();
        assert!(!strict.functions_match(&f, &g));
        assert!(!strict.permits_function(&f));

        let lax = DiffOptions::new().with_function_values(true);
        assert!(lax.functions_match(&f, &g));
        assert!(!lax.functions_match(&f, &Value::Null));
        assert!(lax.permits_function(&g));
    }

    #[test]
    fn invalid_regex_is_rejected() {
        assert!(PropertyPattern::regex("(").is_err());
    }
}
