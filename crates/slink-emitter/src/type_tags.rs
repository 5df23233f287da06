//! Subtype testing via integer tag intervals.
//!
//! Every class in the unit receives an `i32` type tag. Tags are assigned
//! by a preorder walk of the inheritance DAG, so the descendants of any
//! class occupy few contiguous tag ranges and a subtype test compiles to
//! a handful of integer comparisons, or to one indexed load into a
//! materialized array when the ranges fragment too much.

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::error::EmitError;
use crate::javascript::JsNode;
use crate::names;
use slink_common::OutputMode;
use slink_ir::definitions;
use slink_ir::{LinkedClass, LinkingUnit};

/// Interval list of a class: disjoint, sorted, maximally merged.
pub type Intervals = SmallVec<[(i32, i32); 4]>;

/// Comparison count above which a subtype test materializes an array.
const MAX_COMPARISONS: usize = 5;

/// Array type-tag encoding: bit 31 marks an array, bits 23..=30 carry the
/// array depth, bits 0..=22 carry the base-class tag.
const ARRAY_DEPTH_SHIFT: i32 = 23;
const ARRAY_DEPTH_MASK: i32 = 255;
const ARRAY_BASE_MASK: i32 = (1 << ARRAY_DEPTH_SHIFT) - 1;

/// Tags and intervals of one linking unit.
pub struct TypeTags {
    tags: FxHashMap<String, i32>,
    intervals: FxHashMap<String, Intervals>,
    needs_array: FxHashSet<String>,
}

impl TypeTags {
    /// Assign tags with the reserved table of the IR definitions.
    pub fn assign(unit: &LinkingUnit) -> Result<Self, EmitError> {
        Self::assign_with(
            unit,
            &definitions::RESERVED_TYPE_TAGS,
            definitions::first_free_type_tag(),
        )
    }

    /// Assign tags with an explicit reserved table and baseline. The
    /// baseline must lie above every reserved tag.
    pub fn assign_with(
        unit: &LinkingUnit,
        reserved: &FxHashMap<&'static str, i32>,
        first_free_tag: i32,
    ) -> Result<Self, EmitError> {
        let tags = Self::assign_tags(unit, reserved, first_free_tag)?;
        let (intervals, needs_array) = Self::compute_intervals(unit, &tags);
        Ok(Self {
            tags,
            intervals,
            needs_array,
        })
    }

    fn assign_tags(
        unit: &LinkingUnit,
        reserved: &FxHashMap<&'static str, i32>,
        first_free_tag: i32,
    ) -> Result<FxHashMap<String, i32>, EmitError> {
        let present: FxHashSet<&str> = unit
            .classes
            .iter()
            .map(|c| c.encoded_name.as_str())
            .collect();

        let mut children: FxHashMap<&str, Vec<&LinkedClass>> = FxHashMap::default();
        let mut stack: Vec<&LinkedClass> = Vec::new();
        for cls in &unit.classes {
            match cls.super_class.as_deref() {
                Some(sup) if present.contains(sup) => {
                    children.entry(sup).or_default().push(cls);
                }
                // Roots and orphans (super not linked) start the walk, in
                // unit order.
                _ => stack.push(cls),
            }
        }
        // The walk pops from the front; keep the seed order stable.
        stack.reverse();

        let mut tags: FxHashMap<String, i32> = FxHashMap::default();
        let mut next_tag = first_free_tag;
        while let Some(cls) = stack.pop() {
            let tag = match reserved.get(cls.encoded_name.as_str()) {
                Some(&tag) => tag,
                None => {
                    let tag = next_tag;
                    next_tag += 1;
                    tag
                }
            };
            tags.insert(cls.encoded_name.clone(), tag);
            if let Some(subs) = children.get(cls.encoded_name.as_str()) {
                // Preorder, left to right: push in reverse so the first
                // child pops first.
                for sub in subs.iter().rev() {
                    stack.push(sub);
                }
            }
        }

        for cls in &unit.classes {
            if !tags.contains_key(&cls.encoded_name) {
                return Err(EmitError::TagAssignment(cls.encoded_name.clone()));
            }
        }
        Ok(tags)
    }

    fn compute_intervals(
        unit: &LinkingUnit,
        tags: &FxHashMap<String, i32>,
    ) -> (FxHashMap<String, Intervals>, FxHashSet<String>) {
        let mut subtype_tags: FxHashMap<&str, Vec<i32>> = FxHashMap::default();
        for cls in &unit.classes {
            subtype_tags.entry(&cls.encoded_name).or_default();
        }
        for cls in &unit.classes {
            let tag = tags[&cls.encoded_name];
            for ancestor in &cls.ancestors {
                if let Some(list) = subtype_tags.get_mut(ancestor.as_str()) {
                    list.push(tag);
                }
            }
        }

        let mut intervals = FxHashMap::default();
        let mut needs_array = FxHashSet::default();
        for (name, mut list) in subtype_tags {
            list.sort_unstable();
            list.dedup();
            let merged = merge_intervals(&list);
            if ncomparisons(&merged) > MAX_COMPARISONS {
                needs_array.insert(name.to_string());
            }
            intervals.insert(name.to_string(), merged);
        }
        (intervals, needs_array)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn tag(&self, class_name: &str) -> Option<i32> {
        self.tags.get(class_name).copied()
    }

    pub fn intervals(&self, class_name: &str) -> &[(i32, i32)] {
        self.intervals
            .get(class_name)
            .map_or(&[], |list| list.as_slice())
    }

    pub fn needs_subtype_array(&self, class_name: &str) -> bool {
        self.needs_array.contains(class_name)
    }

    // =========================================================================
    // Test generation
    // =========================================================================

    /// A JS expression equivalent to `tag ∈ subtypeSet(class_name)`.
    /// `tag_expr` is evaluated as many times as there are comparisons;
    /// callers bind it to a variable first when that matters.
    pub fn interval_test(&self, mode: OutputMode, class_name: &str, tag_expr: JsNode) -> JsNode {
        if self.needs_subtype_array(class_name) {
            return JsNode::truthy(JsNode::elem(
                names::env_field(mode, "Is", class_name),
                tag_expr,
            ));
        }
        let comparisons = self
            .intervals(class_name)
            .iter()
            .map(|&(lo, hi)| {
                if lo == hi {
                    JsNode::binary(tag_expr.clone(), "===", JsNode::Int(lo))
                } else {
                    JsNode::binary(
                        JsNode::binary(tag_expr.clone(), ">=", JsNode::Int(lo)),
                        "&&",
                        JsNode::binary(tag_expr.clone(), "<=", JsNode::Int(hi)),
                    )
                }
            })
            .collect();
        JsNode::or_all(comparisons)
    }

    /// The materialization statement for the subtype array of a class,
    /// when it needs one: `Is.C = expandSubtypeArray([lo, hi, ...]);`.
    pub fn subtype_array_init(&self, mode: OutputMode, class_name: &str) -> Option<JsNode> {
        if !self.needs_subtype_array(class_name) {
            return None;
        }
        let mut pairs = Vec::new();
        for &(lo, hi) in self.intervals(class_name) {
            pairs.push(JsNode::Int(lo));
            pairs.push(JsNode::Int(hi));
        }
        Some(JsNode::assign_stat(
            names::env_field(mode, "Is", class_name),
            JsNode::call(
                names::env_helper(mode, "expandSubtypeArray"),
                vec![JsNode::ArrayLit(pairs)],
            ),
        ))
    }

    /// Interval test on the base-class bits of an array type tag.
    pub fn array_base_test(&self, mode: OutputMode, class_name: &str, tag_expr: JsNode) -> JsNode {
        self.interval_test(
            mode,
            class_name,
            JsNode::binary(tag_expr, "&", JsNode::Int(ARRAY_BASE_MASK)),
        )
    }

    /// Test that an array type tag has the given depth.
    pub fn array_depth_test(tag_expr: JsNode, depth_expr: JsNode) -> JsNode {
        JsNode::binary(
            JsNode::binary(
                JsNode::binary(tag_expr, ">>", JsNode::Int(ARRAY_DEPTH_SHIFT)),
                "&",
                JsNode::Int(ARRAY_DEPTH_MASK),
            ),
            "===",
            depth_expr,
        )
    }
}

fn merge_intervals(sorted_tags: &[i32]) -> Intervals {
    let mut merged = Intervals::new();
    for &tag in sorted_tags {
        match merged.last_mut() {
            Some((_, hi)) if *hi + 1 == tag => *hi = tag,
            _ => merged.push((tag, tag)),
        }
    }
    merged
}

fn ncomparisons(intervals: &[(i32, i32)]) -> usize {
    intervals
        .iter()
        .map(|&(lo, hi)| if lo == hi { 1 } else { 2 })
        .sum()
}

#[cfg(test)]
#[path = "tests/type_tags.rs"]
mod tests;
