//! Cache reuse and invalidation across consecutive runs.

use slink_common::{OutputMode, Semantics};
use slink_emitter::builder::JsFileBuilder;
use slink_emitter::{CacheStats, Emitter};
use slink_ir::trees::{MethodDef, PropertyName, Tree};
use slink_ir::{ClassKind, LinkedClass, LinkingUnit};

fn object_class() -> LinkedClass {
    let mut cls = LinkedClass::new("O", ClassKind::Class);
    cls.has_runtime_type_info = false;
    cls.version = Some("O-v1".to_string());
    cls
}

fn versioned_class(name: &str, version: &str) -> LinkedClass {
    let mut cls = LinkedClass::new(name, ClassKind::Class);
    cls.super_class = Some("O".to_string());
    cls.ancestors = vec![name.to_string(), "O".to_string()];
    cls.has_runtime_type_info = false;
    cls.version = Some(version.to_string());
    cls
}

fn method(name: &str, body: Tree, version: &str) -> MethodDef {
    MethodDef::new(PropertyName::Ident(name.to_string()), vec![], body).with_version(version)
}

/// X with a single constructor (a ctor-opt candidate), and Y whose
/// method instantiates X.
fn ctor_opt_unit(x_is_candidate: bool) -> LinkingUnit {
    let mut x = versioned_class("X", "x-v1");
    if x_is_candidate {
        x.member_methods
            .push(method("init___", Tree::Skip, "x-init-v1"));
    }
    let mut y = versioned_class("Y", "y-v1");
    y.member_methods.push(method(
        "m__V",
        Tree::new_instance("X", "init___", vec![]),
        "y-m-v1",
    ));
    LinkingUnit::new(vec![object_class(), x, y])
}

fn emit(emitter: &mut Emitter, unit: &LinkingUnit) -> (CacheStats, String) {
    let mut builder = JsFileBuilder::new();
    let stats = emitter
        .emit(unit, &mut builder)
        .expect("emission should succeed");
    (stats, builder.complete())
}

// Property 4 (cache soundness): identical consecutive runs emit
// identical trees with zero invalidations.
#[test]
fn test_identical_runs_reuse_everything() {
    let mut unit_class = versioned_class("Foo", "foo-v1");
    unit_class
        .member_methods
        .push(method("m__I", Tree::ret(Tree::int(1)), "m-v1"));
    unit_class
        .static_methods
        .push(method("s__I", Tree::ret(Tree::int(2)), "s-v1"));
    let unit = LinkingUnit::new(vec![object_class(), unit_class]);

    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    let (first_stats, first_output) = emit(&mut emitter, &unit);
    assert_eq!(first_stats.classes_invalidated, 2);
    assert_eq!(first_stats.methods_invalidated, 2);

    let (second_stats, second_output) = emit(&mut emitter, &unit);
    assert_eq!(second_output, first_output);
    assert_eq!(second_stats.classes_invalidated, 0);
    assert_eq!(second_stats.methods_invalidated, 0);
    assert_eq!(second_stats.classes_reused, 2);
    assert_eq!(second_stats.methods_reused, 2);
}

// A version change on one class rebuilds that class only.
#[test]
fn test_version_change_invalidates_one_class() {
    let unit1 = LinkingUnit::new(vec![
        object_class(),
        versioned_class("A", "a-v1"),
        versioned_class("B", "b-v1"),
    ]);
    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    emit(&mut emitter, &unit1);

    let unit2 = LinkingUnit::new(vec![
        object_class(),
        versioned_class("A", "a-v2"),
        versioned_class("B", "b-v1"),
    ]);
    let (stats, _) = emit(&mut emitter, &unit2);
    assert_eq!(stats.classes_invalidated, 1);
    assert_eq!(stats.classes_reused, 2);
}

// S9: a method without a version is rebuilt every run.
#[test]
fn test_none_method_version_always_rebuilds() {
    let mut cls = versioned_class("Foo", "foo-v1");
    cls.member_methods.push(MethodDef::new(
        PropertyName::Ident("m__I".to_string()),
        vec![],
        Tree::ret(Tree::int(1)),
    ));
    let unit = LinkingUnit::new(vec![object_class(), cls]);

    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    let (first, _) = emit(&mut emitter, &unit);
    assert_eq!(first.methods_invalidated, 1);
    let (second, _) = emit(&mut emitter, &unit);
    assert_eq!(second.methods_invalidated, 1);
    assert_eq!(second.methods_reused, 0);
    // The class-level caches still reuse.
    assert_eq!(second.classes_reused, 2);
}

// S4 / property 5: a ctor-opt membership flip rebuilds the dependent
// method even though every version is unchanged.
#[test]
fn test_ctor_opt_flip_rebuilds_dependent_method() {
    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);

    let (_, first_output) = emit(&mut emitter, &ctor_opt_unit(true));
    assert!(
        first_output.contains("new ScalaJS.c.X()"),
        "run 1 uses the fused constructor: {first_output}"
    );

    // Run 2: X keeps its version but loses its init method, so it leaves
    // the ctor-opt set. Note X's own version must change for its method
    // list to change; Y's stays identical.
    let mut unit2 = ctor_opt_unit(false);
    for cls in &mut unit2.classes {
        if cls.encoded_name == "X" {
            cls.version = Some("x-v2".to_string());
        }
    }
    let (stats, second_output) = emit(&mut emitter, &unit2);

    assert!(
        second_output.contains("new ScalaJS.c.X().init___()"),
        "run 2 falls back to the explicit init call: {second_output}"
    );
    // Y.m was rebuilt despite its unchanged version...
    assert_eq!(stats.methods_invalidated, 1);
    // ...while Y's class cache was reused.
    assert!(stats.classes_reused >= 2, "stats: {stats:?}");
}

// Without the flip, the dependent method is reused.
#[test]
fn test_stable_ctor_opt_set_reuses_dependent_method() {
    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    emit(&mut emitter, &ctor_opt_unit(true));
    let (stats, _) = emit(&mut emitter, &ctor_opt_unit(true));
    assert_eq!(stats.methods_invalidated, 0);
    // Y.m is the only method cache: X's init is fused into its
    // constructor and never emitted as a member.
    assert_eq!(stats.methods_reused, 1);
}

// Caches of classes that disappear from the unit are dropped, and
// reappearing classes rebuild from scratch.
#[test]
fn test_unused_caches_are_dropped_across_runs() {
    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    let full = LinkingUnit::new(vec![
        object_class(),
        versioned_class("A", "a-v1"),
        versioned_class("B", "b-v1"),
    ]);
    emit(&mut emitter, &full);

    let shrunk = LinkingUnit::new(vec![object_class(), versioned_class("A", "a-v1")]);
    let (stats, _) = emit(&mut emitter, &shrunk);
    assert_eq!(stats.classes_reused, 2);

    // B returns: its cache is gone, so it is rebuilt, not reused.
    let (stats, _) = emit(&mut emitter, &full);
    assert_eq!(stats.classes_invalidated, 1);
    assert_eq!(stats.classes_reused, 2);
}

// Two emitters share no state.
#[test]
fn test_emitters_are_isolated() {
    let unit = ctor_opt_unit(true);
    let mut first = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    emit(&mut first, &unit);

    let mut second = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript51Global);
    let (stats, _) = emit(&mut second, &unit);
    assert_eq!(stats.classes_reused, 0);
    assert!(stats.classes_invalidated > 0);
}
