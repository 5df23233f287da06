//! Constructor-optimization dependency tracking.
//!
//! Whether a `new C(...)` site can use the fused constructor depends on a
//! per-class property of the whole unit. The desugaring of one method
//! therefore depends on classes other than its own; this tracker records
//! those dependencies and, at the start of the next run, names every
//! cached method whose assumption no longer holds.
//!
//! Known limitation, kept as designed: `is_interface` answers are global
//! knowledge too but are not tracked here. A class changing kind between
//! runs without any method-body change leaves stale call sites cached.
//! Extending the tracker with class-kind dependencies would close that
//! hole.

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};

use slink_ir::{LinkedClass, LinkingUnit};

/// Method-name sentinel for exported-constructor trees.
pub const CONSTRUCTOR_EXPORT_SENTINEL: &str = "ConstructorExportDef";

/// Method-name sentinel for exported-member trees.
pub const EXPORTED_MEMBER_SENTINEL: &str = "ExportedMember";

/// Identity of a desugared method, as recorded against the classes it
/// asked about.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodRef {
    pub class_name: String,
    pub method_name: String,
    pub is_static: bool,
}

impl MethodRef {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>, is_static: bool) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            is_static,
        }
    }

    /// Check if this reference names an export slot rather than a method
    /// cache.
    #[must_use]
    pub fn is_export_sentinel(&self) -> bool {
        self.method_name == CONSTRUCTOR_EXPORT_SENTINEL
            || self.method_name == EXPORTED_MEMBER_SENTINEL
    }
}

/// Check if the emitter will emit a fused constructor for this class.
#[must_use]
pub fn candidate_for_js_constructor_opt(cls: &LinkedClass) -> bool {
    cls.kind.is_class()
        && cls.has_instances
        && cls
            .member_methods
            .iter()
            .filter(|m| m.is_constructor())
            .count()
            == 1
}

/// Tracks which methods consulted the ctor-opt status of which classes,
/// and diffs the status set across runs.
#[derive(Default)]
pub struct CtorOptTracker {
    last: FxHashSet<String>,
    current: FxHashSet<String>,
    /// target class -> methods desugared under its current status.
    /// `RefCell` because recording happens through the shared borrow the
    /// desugarer holds during emission.
    dependees: RefCell<FxHashMap<String, FxHashSet<MethodRef>>>,
}

impl CtorOptTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a run: compute the current ctor-opt set and return, for
    /// every class whose membership changed since the last run, the
    /// recorded dependees to invalidate. Changed entries are dropped from
    /// the table; unchanged entries are kept.
    pub fn begin_run(&mut self, unit: &LinkingUnit) -> (Vec<MethodRef>, Vec<String>) {
        self.current = unit
            .classes
            .iter()
            .filter(|c| candidate_for_js_constructor_opt(c))
            .map(|c| c.encoded_name.clone())
            .collect();

        let changed: Vec<String> = self
            .last
            .symmetric_difference(&self.current)
            .cloned()
            .collect();
        let changed_set: FxHashSet<&str> = changed.iter().map(String::as_str).collect();

        let mut invalidations = Vec::new();
        self.dependees.get_mut().retain(|class_name, callers| {
            if changed_set.contains(class_name.as_str()) {
                invalidations.extend(callers.drain());
                false
            } else {
                true
            }
        });

        tracing::trace!(
            ctor_opt_classes = self.current.len(),
            changed = changed.len(),
            invalidated_methods = invalidations.len(),
            "ctor-opt run started"
        );
        (invalidations, changed)
    }

    /// End a run: the current set becomes the baseline for the next diff.
    pub fn end_run(&mut self) {
        self.last = self.current.clone();
    }

    /// Answer whether `target_class` gets the fused constructor, and
    /// record that `caller` depends on the answer.
    pub fn uses_js_constructor_opt(&self, target_class: &str, caller: &MethodRef) -> bool {
        self.dependees
            .borrow_mut()
            .entry(target_class.to_string())
            .or_default()
            .insert(caller.clone());
        self.current.contains(target_class)
    }

    /// Non-recording query, for decisions local to the target class
    /// itself (its own constructor shape).
    #[must_use]
    pub fn is_ctor_opt(&self, class_name: &str) -> bool {
        self.current.contains(class_name)
    }
}

#[cfg(test)]
#[path = "tests/ctor_opt.rs"]
mod tests;
