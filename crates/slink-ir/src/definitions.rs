//! Closed constant tables of the IR namespace.
//!
//! These sets and tags are fixed by the IR definition and treated as
//! constants by the emitter: the encoded names of the root and hijacked
//! classes, the reserved low range of type tags, and the supertype sets
//! whose instance tests must accept primitive-representation values.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};

/// Encoded name of `java.lang.Object`, the root of the hierarchy.
pub const OBJECT_CLASS: &str = "O";

/// Encoded name of `java.lang.String`, hijacked by primitive JS strings.
pub const BOXED_STRING_CLASS: &str = "T";

/// Encoded name of `scala.Nothing`; it has no instances.
pub const NOTHING_CLASS: &str = "sr_Nothing$";

/// Encoded name of `scala.Null`; its only value is `null`.
pub const NULL_CLASS: &str = "sr_Null$";

/// Encoded name of the undefined-behavior error class referenced by
/// emitted `Fatal` checks.
pub const UNDEFINED_BEHAVIOR_ERROR_CLASS: &str = "sjsr_UndefinedBehaviorError";

/// Hijacked boxed classes: classes whose instances are represented by a
/// primitive JavaScript value. The order is significant, it fixes the
/// reserved tag assignment.
pub const HIJACKED_BOXED_CLASSES: &[&str] = &[
    "sr_BoxedUnit",
    "jl_Boolean",
    "jl_Byte",
    "jl_Short",
    "jl_Integer",
    "jl_Float",
    "jl_Double",
    BOXED_STRING_CLASS,
];

/// Reserved type tags: `Object` gets 1, hijacked boxed classes get
/// 2..=9 in `HIJACKED_BOXED_CLASSES` order. Tag 0 is never assigned so
/// `!!typeTag` is a valid existence test in emitted code.
pub static RESERVED_TYPE_TAGS: Lazy<FxHashMap<&'static str, i32>> = Lazy::new(|| {
    let mut tags = FxHashMap::default();
    tags.insert(OBJECT_CLASS, 1);
    for (i, &name) in HIJACKED_BOXED_CLASSES.iter().enumerate() {
        tags.insert(name, 2 + i as i32);
    }
    tags
});

/// First tag available to non-reserved classes.
#[must_use]
pub fn first_free_type_tag() -> i32 {
    RESERVED_TYPE_TAGS.values().copied().max().unwrap_or(0) + 1
}

/// Ancestors of the hijacked number classes. Their instance tests must
/// accept primitive `number` values.
pub static ANCESTORS_OF_HIJACKED_NUMBER_CLASSES: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ["jl_Number", "jl_Comparable"].into_iter().collect());

/// Ancestors of `jl_Boolean`. Their instance tests must accept primitive
/// `boolean` values.
pub static ANCESTORS_OF_HIJACKED_BOOLEAN_CLASSES: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ["jl_Comparable"].into_iter().collect());

/// Ancestors of `java.lang.String`. Their instance tests must accept
/// primitive `string` values.
pub static ANCESTORS_OF_HIJACKED_STRING_CLASSES: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ["jl_CharSequence", "jl_Comparable"].into_iter().collect());

/// Supertypes of array classes. Their instance tests must accept array
/// values, which carry class data but no interval-testable type tag of
/// their own.
pub static PSEUDO_ARRAY_ANCESTORS: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ["jl_Cloneable", "Ljava_io_Serializable"].into_iter().collect());

/// Classes whose type data refers to their instance-test function: the
/// union of all ancestors-of-hijacked sets plus `Object` and `String`.
pub static CLASSES_WHOSE_DATA_REFER_TO_THEIR_INSTANCE_TESTS: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| {
        let mut set: FxHashSet<&'static str> = FxHashSet::default();
        set.extend(ANCESTORS_OF_HIJACKED_NUMBER_CLASSES.iter().copied());
        set.extend(ANCESTORS_OF_HIJACKED_BOOLEAN_CLASSES.iter().copied());
        set.extend(ANCESTORS_OF_HIJACKED_STRING_CLASSES.iter().copied());
        set.insert(OBJECT_CLASS);
        set.insert(BOXED_STRING_CLASS);
        set
    });

/// Check if a method name denotes a constructor.
#[must_use]
pub fn is_constructor_name(name: &str) -> bool {
    name.starts_with("init___")
}
