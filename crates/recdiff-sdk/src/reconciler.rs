//! The [`Reconciler`]: diff options and a patcher in one value.

use recdiff_diff::{DiffConfig, DiffOptions};
use recdiff_patch::{FactoryRegistry, Patcher};
use recdiff_types::{Record, Value};
use tracing::debug;

use crate::error::SdkResult;

/// Diff options and a patcher bundled together.
///
/// `reconcile` is the usual entry point: it computes the records that turn a
/// target into a source and applies them to the target in place.
#[derive(Clone, Debug, Default)]
pub struct Reconciler {
    options: DiffOptions,
    patcher: Patcher,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    /// A reconciler with the given options and an empty factory registry.
    pub fn with_options(options: DiffOptions) -> Self {
        Self {
            options,
            patcher: Patcher::default(),
        }
    }

    /// Build a reconciler from a file-level configuration.
    pub fn from_config(config: &DiffConfig) -> SdkResult<Self> {
        Ok(Self::with_options(config.to_options()?))
    }

    pub fn with_registry(mut self, registry: FactoryRegistry) -> Self {
        self.patcher = Patcher::with_registry(registry);
        self
    }

    /// Register a factory for construct records.
    pub fn with_factory<F>(mut self, tag: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        self.patcher.registry_mut().register(tag, factory);
        self
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut DiffOptions {
        &mut self.options
    }

    pub fn patcher(&self) -> &Patcher {
        &self.patcher
    }

    // ---- Operations ----

    /// Records that make `b` look like `a`.
    pub fn diff(&self, a: &Value, b: &Value) -> SdkResult<Vec<Record>> {
        Ok(recdiff_diff::diff(a, b, &self.options)?)
    }

    /// Apply `records` to `target` in place.
    pub fn patch<'t>(&self, target: &'t mut Value, records: Vec<Record>) -> SdkResult<&'t mut Value> {
        Ok(self.patcher.patch(target, records)?)
    }

    /// Make `target` structurally equal to `source`, returning the records
    /// that were applied.
    pub fn reconcile(&self, target: &mut Value, source: &Value) -> SdkResult<Vec<Record>> {
        let records = self.diff(source, target)?;
        debug!(records = records.len(), "reconciling target");
        if !records.is_empty() {
            self.patcher.patch(target, records.clone())?;
        }
        Ok(records)
    }

    /// Whether diffing `a` against `b` yields no records.
    pub fn is_equivalent(&self, a: &Value, b: &Value) -> SdkResult<bool> {
        Ok(self.diff(a, b)?.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;
    use recdiff_diff::{DiffError, IgnoreRule};
    use recdiff_patch::PatchError;
    use recdiff_types::{create_construct_record, CustomDiff, Object, Opaque, SpliceRecord};
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn reconcile_converges() {
        let reconciler = Reconciler::new();
        let source = v(json!({
            "name": "svc",
            "ports": [80, 443],
            "env": {"LOG": "debug", "MODE": "prod"},
            "replicas": 3
        }));
        let mut target = v(json!({
            "name": "svc",
            "ports": [80, 8080, 9090],
            "env": {"LOG": "info"},
            "legacy": true
        }));

        let records = reconciler.reconcile(&mut target, &source).unwrap();
        assert!(!records.is_empty());
        assert_eq!(target, source);
        assert!(reconciler.is_equivalent(&source, &target).unwrap());
    }

    #[test]
    fn reconcile_of_equal_values_applies_nothing() {
        let source = v(json!([{"a": [1, 2]}, "x"]));
        let mut target = source.clone();
        assert!(Reconciler::new().reconcile(&mut target, &source).unwrap().is_empty());
    }

    #[test]
    fn splice_minimality() {
        let records = Reconciler::new()
            .diff(&v(json!([1, 2, 3, 4])), &v(json!([1, 9, 9, 4])))
            .unwrap();
        assert_eq!(
            records,
            vec![Record::Splice(SpliceRecord {
                start: 1,
                delete_count: 2,
                add: vec![Value::from(2).into(), Value::from(3).into()],
            })]
        );
    }

    #[test]
    fn ignore_symmetry() {
        let reconciler =
            Reconciler::with_options(DiffOptions::new().with_ignored_properties(IgnoreRule::names(["x"])));
        let records = reconciler
            .diff(&v(json!({"x": 1, "y": 2})), &v(json!({"x": 9, "y": 2})))
            .unwrap();
        assert!(records.is_empty());

        let mut target = v(json!({"x": 9, "y": 0}));
        reconciler.reconcile(&mut target, &v(json!({"x": 1, "y": 2}))).unwrap();
        assert_eq!(target, v(json!({"x": 9, "y": 2})));
    }

    #[test]
    fn frozen_target_is_rejected() {
        let mut frozen = Object::new();
        frozen.freeze();
        let mut target = Value::Object(frozen);
        let err = Reconciler::new()
            .patch(&mut target, vec![Record::delete("a")])
            .unwrap_err();
        assert!(matches!(err, SdkError::Patch(PatchError::ImmutableTarget)));
    }

    #[test]
    fn diff_errors_are_wrapped() {
        let err = Reconciler::new().diff(&Value::Null, &v(json!({}))).unwrap_err();
        assert!(matches!(err, SdkError::Diff(DiffError::InvalidInput { a: "null", .. })));
    }

    #[test]
    fn from_config_compiles_patterns() {
        let config = DiffConfig::from_toml_str("ignore_property_patterns = [\"^_\"]").unwrap();
        let reconciler = Reconciler::from_config(&config).unwrap();
        assert!(reconciler
            .is_equivalent(&v(json!({"_rev": 2, "a": 1})), &v(json!({"_rev": 1, "a": 1})))
            .unwrap());

        let bad = DiffConfig {
            ignore_property_patterns: vec!["(".into()],
            ..Default::default()
        };
        assert!(matches!(
            Reconciler::from_config(&bad),
            Err(SdkError::Diff(DiffError::InvalidPattern { .. }))
        ));
    }

    #[test]
    fn custom_differ_drives_construction() {
        let reconciler = Reconciler::new().with_factory("Stamp", |args: &[Value]| {
            Value::Opaque(Opaque::new("Stamp", args.first().and_then(Value::as_f64).unwrap_or(0.0)))
        });

        let mut source = Object::new();
        source.insert(
            "at",
            CustomDiff::new(|current, _, _| {
                if current.is_undefined() || current.as_f64().is_some() {
                    Some(create_construct_record("Stamp", vec![Value::from(42.0)], None).into())
                } else {
                    None
                }
            }),
        );
        let source = Value::Object(source);
        let mut target = v(json!({"at": 1}));

        let records = reconciler.reconcile(&mut target, &source).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), Some("at"));

        match target.as_object().and_then(|o| o.get("at")) {
            Some(Value::Opaque(stamp)) => assert_eq!(stamp.downcast_ref::<f64>(), Some(&42.0)),
            other => panic!("expected stamp, got {other:?}"),
        }
    }

    #[test]
    fn reconciler_is_shareable_across_threads() {
        let reconciler = std::sync::Arc::new(Reconciler::new());
        let handles: Vec<_> = (0..4i32)
            .map(|i| {
                let reconciler = reconciler.clone();
                std::thread::spawn(move || {
                    let source = v(json!({"n": i, "list": [i, i + 1]}));
                    let mut target = v(json!({"n": -1}));
                    reconciler.reconcile(&mut target, &source).unwrap();
                    target == source
                })
            })
            .collect();
        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
