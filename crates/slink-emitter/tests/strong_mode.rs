//! Strong-mode assembly: splicing class pieces into the core library at
//! its marker lines.

use slink_common::{OutputMode, Semantics};
use slink_emitter::builder::JsFileBuilder;
use slink_emitter::Emitter;
use slink_ir::trees::{MethodDef, PropertyName, Tree};
use slink_ir::{ClassExport, ClassKind, LinkedClass, LinkingUnit};

/// A tiny core library carrying only the markers, so splice positions
/// are easy to assert on.
const MARKER_ONLY_CORE_LIB: &str = "\
//CORE-PRE
///INSERT DECLARE TYPE DATA HERE///
//AFTER-DECLARE-TYPE-DATA
///INSERT DECLARE MODULES HERE///
//AFTER-DECLARE-MODULES
///INSERT IS AND AS FUNCTIONS HERE///
//AFTER-IS-AND-AS
///INSERT CLASSES HERE///
//AFTER-CLASSES
///INSERT CREATE TYPE DATA HERE///
//AFTER-CREATE-TYPE-DATA
///INSERT EXPORTS HERE///
//AFTER-EXPORTS
///THE END///
//CORE-TAIL";

fn object_class() -> LinkedClass {
    LinkedClass::new("O", ClassKind::Class)
}

fn test_unit() -> LinkingUnit {
    let mut foo = LinkedClass::new("Foo", ClassKind::Class);
    foo.super_class = Some("O".to_string());
    foo.ancestors = vec!["Foo".to_string(), "O".to_string()];
    foo.member_methods.push(MethodDef::new(
        PropertyName::Ident("m__I".to_string()),
        vec![],
        Tree::ret(Tree::int(1)),
    ));

    let mut module = LinkedClass::new("Mod$", ClassKind::ModuleClass);
    module.super_class = Some("O".to_string());
    module.ancestors = vec!["Mod$".to_string(), "O".to_string()];
    module.class_exports.push(ClassExport::Module {
        name: "Mod".to_string(),
    });

    let mut intf = LinkedClass::new("Intf", ClassKind::Interface);
    intf.has_instances = false;
    intf.member_methods.push(MethodDef::new(
        PropertyName::Ident("d__I".to_string()),
        vec![],
        Tree::ret(Tree::int(2)),
    ));

    LinkingUnit::new(vec![object_class(), foo, module, intf])
}

fn emit_strong(unit: &LinkingUnit) -> String {
    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript6StrongMode);
    emitter.set_core_js_lib(MARKER_ONLY_CORE_LIB);
    let mut builder = JsFileBuilder::new();
    emitter
        .emit(unit, &mut builder)
        .expect("strong emission should succeed");
    builder.complete()
}

fn position(output: &str, needle: &str) -> usize {
    output
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} not found in output:\n{output}"))
}

// S6: pieces land between the right markers, in phase order.
#[test]
fn test_splice_order() {
    let output = emit_strong(&test_unit());

    let declare_d = position(&output, "let $d_Foo = null;");
    let declare_n = position(&output, "let $n_Mod$ = (void 0);");
    let is_fn = position(&output, "function $is_Foo(obj) {");
    let class_decl = position(&output, "class $c_Foo extends $c_O {");
    let create_d = position(&output, "$d_Foo = new $TypeData().initClass(");
    let export = position(&output, "$export([\"Mod\"], $m_Mod$);");

    assert!(position(&output, "//CORE-PRE") < declare_d);
    assert!(declare_d < position(&output, "//AFTER-DECLARE-TYPE-DATA"));
    assert!(position(&output, "//AFTER-DECLARE-TYPE-DATA") < declare_n);
    assert!(declare_n < position(&output, "//AFTER-DECLARE-MODULES"));
    assert!(position(&output, "//AFTER-DECLARE-MODULES") < is_fn);
    assert!(is_fn < position(&output, "//AFTER-IS-AND-AS"));
    assert!(position(&output, "//AFTER-IS-AND-AS") < class_decl);
    assert!(class_decl < position(&output, "//AFTER-CLASSES"));
    assert!(position(&output, "//AFTER-CLASSES") < create_d);
    assert!(create_d < position(&output, "//AFTER-CREATE-TYPE-DATA"));
    assert!(position(&output, "//AFTER-CREATE-TYPE-DATA") < export);
    assert!(export < position(&output, "//AFTER-EXPORTS"));
}

// The end marker is consumed; the tail after it survives.
#[test]
fn test_the_end_marker_consumed_tail_kept() {
    let output = emit_strong(&test_unit());
    assert!(!output.contains("///THE END///"));
    assert!(output.contains("//CORE-TAIL"));
    assert!(!output.contains("///INSERT"));
}

// Strong mode uses flat $-prefixed names throughout.
#[test]
fn test_strong_names() {
    let output = emit_strong(&test_unit());
    assert!(output.contains("class $c_Foo extends $c_O {"));
    assert!(output.contains("m__I() {"));
    assert!(output.contains("$c_Foo.prototype.$typeTag = "));
    assert!(output.contains("function $m_Mod$() {"));
    assert!(output.contains("function $f_d__I($thiz) {"));
    assert!(!output.contains("ScalaJS."));
}

// Set-type-data is a strong-mode-only piece, an indexed assignment into
// the ClassData table.
#[test]
fn test_set_type_data_indexed_assignment() {
    let output = emit_strong(&test_unit());
    let create = position(&output, "$d_Foo = new $TypeData().initClass(");
    let set = position(&output, "] = $d_Foo;");
    assert!(output.contains("$ClassData["));
    assert!(create < set);
    assert!(set < position(&output, "//AFTER-CREATE-TYPE-DATA"));
}

// Module accessors read and write the declared `$n_` field.
#[test]
fn test_module_accessor_uses_declared_field() {
    let output = emit_strong(&test_unit());
    assert!(output.contains("if (($n_Mod$ === (void 0))) {"));
    assert!(output.contains("$n_Mod$ = null;"));
    assert!(output.contains("return $n_Mod$;"));
}

// Determinism holds for strong mode as well.
#[test]
fn test_strong_mode_deterministic() {
    let unit = test_unit();
    assert_eq!(emit_strong(&unit), emit_strong(&unit));
}

/// Like `test_unit`, with stable versions on every class and method so a
/// second identical run can reuse the caches.
fn versioned_test_unit() -> LinkingUnit {
    let mut object = object_class();
    object.version = Some("O-v1".to_string());

    let mut foo = LinkedClass::new("Foo", ClassKind::Class);
    foo.super_class = Some("O".to_string());
    foo.ancestors = vec!["Foo".to_string(), "O".to_string()];
    foo.version = Some("foo-v1".to_string());
    foo.member_methods.push(
        MethodDef::new(
            PropertyName::Ident("m__I".to_string()),
            vec![],
            Tree::ret(Tree::int(1)),
        )
        .with_version("m-v1"),
    );
    foo.static_methods.push(
        MethodDef::new(
            PropertyName::Ident("st__I".to_string()),
            vec![],
            Tree::ret(Tree::int(2)),
        )
        .with_version("st-v1"),
    );
    LinkingUnit::new(vec![object, foo])
}

// Property 4 holds for the strong-mode driver too: although every splice
// phase walks every class, each method is counted (and desugared) once
// per run, and an identical second run reuses everything.
#[test]
fn test_strong_mode_reuses_caches_across_runs() {
    let unit = versioned_test_unit();
    let mut emitter = Emitter::new(Semantics::defaults(), OutputMode::ECMAScript6StrongMode);
    emitter.set_core_js_lib(MARKER_ONLY_CORE_LIB);

    let mut first_builder = JsFileBuilder::new();
    let first = emitter
        .emit(&unit, &mut first_builder)
        .expect("strong emission should succeed");
    assert_eq!(first.methods_invalidated, 2, "one per method, not per phase");
    assert_eq!(first.methods_reused, 0, "a cold run reuses nothing");
    assert_eq!(first.classes_invalidated, 2);
    assert_eq!(first.classes_reused, 0);

    let mut second_builder = JsFileBuilder::new();
    let second = emitter
        .emit(&unit, &mut second_builder)
        .expect("strong emission should succeed");
    assert_eq!(second.methods_invalidated, 0);
    assert_eq!(second.methods_reused, 2, "one per method, not per phase");
    assert_eq!(second.classes_invalidated, 0);
    assert_eq!(second.classes_reused, 2);
    assert_eq!(second_builder.complete(), first_builder.complete());
}
