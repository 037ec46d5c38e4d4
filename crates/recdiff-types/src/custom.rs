//! Values that carry their own comparison logic.

use std::fmt;
use std::sync::Arc;

use crate::record::{PropertyKey, Record};
use crate::value::Value;

type Differ = dyn Fn(&Value, PropertyKey<'_>, &Value) -> Option<Record> + Send + Sync;

/// A value that delegates its comparison to caller-supplied code.
///
/// The differ receives the value on the other side, the key or index the
/// wrapper sits at, and the other side's parent container. It returns the
/// record to emit, or `None` when nothing changed.
#[derive(Clone)]
pub struct CustomDiff {
    differ: Arc<Differ>,
}

impl CustomDiff {
    pub fn new<F>(differ: F) -> Self
    where
        F: Fn(&Value, PropertyKey<'_>, &Value) -> Option<Record> + Send + Sync + 'static,
    {
        Self {
            differ: Arc::new(differ),
        }
    }

    /// Run the differ. A record produced for a named key is stamped with
    /// that name; records produced for an index are returned untouched.
    pub fn diff(&self, value: &Value, key: PropertyKey<'_>, parent: &Value) -> Option<Record> {
        let mut record = (self.differ)(value, key, parent)?;
        if let PropertyKey::Name(name) = key {
            record.set_name(name);
        }
        Some(record)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Arc::as_ptr(&self.differ), Arc::as_ptr(&other.differ))
    }
}

impl fmt::Debug for CustomDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomDiff(..)")
    }
}
