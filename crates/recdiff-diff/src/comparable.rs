//! Ignore-rule filtering ahead of an object comparison.

use std::collections::{BTreeMap, BTreeSet};

use recdiff_types::{Object, Value};

use crate::options::DiffOptions;

/// Filtered shallow views of two objects, plus the names that were dropped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComparableObjects<'a> {
    /// Own enumerable properties of `a` that take part in the comparison.
    pub comparable_a: BTreeMap<&'a str, &'a Value>,
    /// Own enumerable properties of `b` that take part in the comparison.
    pub comparable_b: BTreeMap<&'a str, &'a Value>,
    /// Names of `a` excluded by either ignore rule.
    pub ignore: BTreeSet<&'a str>,
}

/// Apply the ignore rules of `options` to `a` and `b`.
///
/// A name matching `ignore_properties` is dropped from both sides. A name
/// matching `ignore_property_values` is dropped from both sides only when
/// `b` also has it; otherwise it stays in `a` so the value can be passed
/// through. A name of `b` is only dropped by the name rule when `a` did not
/// keep it.
pub fn get_comparable_objects<'a>(
    a: &'a Object,
    b: &'a Object,
    options: &DiffOptions,
) -> ComparableObjects<'a> {
    let mut ignore = BTreeSet::new();
    let mut keep = BTreeSet::new();

    let mut comparable_a = BTreeMap::new();
    for (name, value) in a.entries() {
        if options.ignore_properties.matches(name, a, b)
            || (b.contains_key(name) && options.ignore_property_values.matches(name, a, b))
        {
            ignore.insert(name);
            continue;
        }
        keep.insert(name);
        comparable_a.insert(name, value);
    }

    let mut comparable_b = BTreeMap::new();
    for (name, value) in b.entries() {
        if ignore.contains(name)
            || (!keep.contains(name) && options.ignore_properties.matches(name, a, b))
        {
            continue;
        }
        comparable_b.insert(name, value);
    }

    ComparableObjects {
        comparable_a,
        comparable_b,
        ignore,
    }
}
