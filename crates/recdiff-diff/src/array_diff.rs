//! Array diff: index-by-index comparison coalesced into splice records.
//!
//! Differences at consecutive indices become one splice. Every splice is
//! expressed against the original `b`: starts are never shifted by earlier
//! splices in the same list, and delete counts never reach past `b`'s end.

use recdiff_types::{Array, Record, SpliceValue, ValueKind};

use crate::compare::{compare_nested, nested_splice_value, same_container};
use crate::error::{DiffError, DiffResult};
use crate::options::DiffOptions;

pub(crate) fn diff_array(a: &Array, b: &Array, options: &DiffOptions) -> DiffResult<Vec<Record>> {
    let length_b = b.len();

    if a.is_empty() {
        return Ok(if length_b > 0 {
            vec![Record::splice(0, length_b, Vec::new())]
        } else {
            Vec::new()
        });
    }

    let mut splices = SpliceBuilder::new(length_b);

    for (index, value_a) in a.iter().enumerate() {
        let value_b = b.get(index);
        if let Some(value_b) = value_b {
            if value_a.identical(value_b) || options.functions_match(value_a, value_b) {
                continue;
            }
        }

        match value_a.kind() {
            ValueKind::Sequence | ValueKind::Mapping => {
                let nested = compare_nested(value_a, value_b, options)?;
                // An empty nested diff is only a no-op when `b` already holds
                // a container of the same kind at this index.
                if !nested.is_empty() || !value_b.is_some_and(|b| same_container(value_a, b)) {
                    splices.stage(index, Some(nested_splice_value(value_a, nested)));
                }
            }
            ValueKind::Primitive => {
                splices.stage(index, Some(SpliceValue::Value(value_a.clone())));
            }
            ValueKind::Function if options.permits_function(value_a) => {
                splices.stage(index, Some(SpliceValue::Value(value_a.clone())));
            }
            found => return Err(DiffError::UnsupportedElement { index, found }),
        }
    }

    for index in a.len()..length_b {
        splices.stage(index, None);
    }

    Ok(splices.finish())
}

/// Accumulates staged differences and flushes a splice whenever the run of
/// consecutive indices breaks.
struct SpliceBuilder {
    length_b: usize,
    records: Vec<Record>,
    start: usize,
    delete_count: usize,
    add: Vec<SpliceValue>,
    last: Option<usize>,
}

impl SpliceBuilder {
    fn new(length_b: usize) -> Self {
        Self {
            length_b,
            records: Vec::new(),
            start: 0,
            delete_count: 0,
            add: Vec::new(),
            last: None,
        }
    }

    /// Record a difference at `index`; `None` is a pure deletion.
    fn stage(&mut self, index: usize, value: Option<SpliceValue>) {
        let breaks_run = match self.last {
            Some(last) => index > last + 1,
            None => index > 0,
        };
        if breaks_run {
            self.flush();
            self.start = index;
            self.delete_count = 0;
        }
        if let Some(value) = value {
            self.add.push(value);
        }
        self.delete_count += 1;
        self.last = Some(index);
    }

    fn flush(&mut self) {
        if self.delete_count == 0 && self.add.is_empty() {
            return;
        }
        let delete_count = if self.start + self.delete_count > self.length_b {
            self.length_b.saturating_sub(self.start)
        } else {
            self.delete_count
        };
        self.records.push(Record::splice(
            self.start,
            delete_count,
            std::mem::take(&mut self.add),
        ));
    }

    fn finish(mut self) -> Vec<Record> {
        self.flush();
        self.records
    }
}
