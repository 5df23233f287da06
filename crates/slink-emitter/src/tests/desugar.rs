use super::*;
use crate::javascript::JsPrinter;
use slink_ir::trees::{MethodDef, PropertyName};

fn unit_with(classes: Vec<LinkedClass>) -> LinkingUnit {
    LinkingUnit::new(classes)
}

fn caller() -> MethodRef {
    MethodRef::new("Caller", "m__V", false)
}

fn print_expr(node: JsNode) -> String {
    JsPrinter::emit_to_string(&JsNode::expr_stmt(node))
}

#[test]
fn test_literals_and_operators() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::binary("+", Tree::var_ref("a"), Tree::int(1));
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "(a + 1);\n"
    );

    let sel = Tree::select(Tree::This, "x$1");
    assert_eq!(
        print_expr(desugarer.desugar_tree(&sel, false)),
        "this.x$1;\n"
    );
}

#[test]
fn test_statement_forms() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let block = Tree::Block(vec![
        Tree::VarDef {
            name: "x".to_string(),
            rhs: Box::new(Tree::int(1)),
        },
        Tree::ret(Tree::var_ref("x")),
    ]);
    let output = JsPrinter::emit_to_string(&desugarer.desugar_tree(&block, true));
    assert_eq!(output, "var x = 1;\nreturn x;\n");
}

#[test]
fn test_if_expression_becomes_conditional() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::If {
        cond: Box::new(Tree::var_ref("c")),
        thenp: Box::new(Tree::int(1)),
        elsep: Box::new(Tree::int(2)),
    };
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "(c ? 1 : 2);\n"
    );
}

#[test]
fn test_virtual_apply() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::apply(Tree::var_ref("x"), "foo__I", vec![Tree::int(1)]);
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "x.foo__I(1);\n"
    );
}

#[test]
fn test_static_call_routes_to_class_namespace() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![LinkedClass::new("Lfoo_Bar", slink_ir::ClassKind::Class)]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::apply_static("Lfoo_Bar", "m__I", vec![]);
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "ScalaJS.s.Lfoo_Bar__m__I();\n"
    );
}

#[test]
fn test_static_call_routes_to_interface_default() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![LinkedClass::new(
        "Lfoo_Intf",
        slink_ir::ClassKind::Interface,
    )]);

    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());
    let tree = Tree::apply_static("Lfoo_Intf", "m__I", vec![Tree::This]);
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "ScalaJS.f.Lfoo_Intf__m__I(this);\n"
    );

    let strong_env = GlobalEnv::new(OutputMode::ECMAScript6StrongMode, &unit, &tracker);
    let desugarer = Desugarer::new(&strong_env, caller());
    let tree = Tree::apply_static("Lfoo_Intf", "m__I", vec![Tree::This]);
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "$f_m__I(this);\n"
    );
}

#[test]
fn test_new_without_ctor_opt() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::new_instance("Lfoo_Bar", "init___I", vec![Tree::int(5)]);
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "new ScalaJS.c.Lfoo_Bar().init___I(5);\n"
    );
}

#[test]
fn test_new_with_ctor_opt_and_dependency_recording() {
    let mut tracker = CtorOptTracker::new();
    let mut target = LinkedClass::new("Lfoo_Bar", slink_ir::ClassKind::Class);
    target.member_methods.push(MethodDef::new(
        PropertyName::Ident("init___I".to_string()),
        vec!["x".to_string()],
        Tree::Skip,
    ));
    let unit = unit_with(vec![target]);
    tracker.begin_run(&unit);

    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());
    let tree = Tree::new_instance("Lfoo_Bar", "init___I", vec![Tree::int(5)]);
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "new ScalaJS.c.Lfoo_Bar(5);\n"
    );

    // The dependency was recorded: a later membership flip names the
    // caller.
    tracker.end_run();
    let mut gone = LinkedClass::new("Lfoo_Bar", slink_ir::ClassKind::Class);
    gone.has_instances = false;
    let (invalidations, _) = tracker.begin_run(&unit_with(vec![gone]));
    assert_eq!(invalidations, vec![caller()]);
}

#[test]
fn test_load_module() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::LoadModule("Lfoo_Mod$".to_string());
    assert_eq!(
        print_expr(desugarer.desugar_tree(&tree, false)),
        "ScalaJS.m.Lfoo_Mod$();\n"
    );
}

#[test]
fn test_explicit_this_parameter() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller()).with_explicit_this("$thiz");

    let func = desugarer.desugar_to_function(
        &["x".to_string()],
        &Tree::ret(Tree::select(Tree::This, "f$1")),
        false,
    );
    let output = JsPrinter::emit_to_string(&JsNode::expr_stmt(func));
    assert!(output.starts_with("(function($thiz, x) {\n"));
    assert!(output.contains("return $thiz.f$1;\n"));
}

#[test]
fn test_constructor_function_returns_this() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript51Global, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let func = desugarer.desugar_to_function(
        &[],
        &Tree::assign(Tree::select(Tree::This, "x$1"), Tree::int(0)),
        true,
    );
    let output = JsPrinter::emit_to_string(&JsNode::expr_stmt(func));
    assert!(output.contains("this.x$1 = 0;\n"));
    assert!(output.contains("return this;\n"));
}

#[test]
fn test_strong_mode_var_defs_use_let() {
    let tracker = CtorOptTracker::new();
    let unit = unit_with(vec![]);
    let env = GlobalEnv::new(OutputMode::ECMAScript6StrongMode, &unit, &tracker);
    let desugarer = Desugarer::new(&env, caller());

    let tree = Tree::VarDef {
        name: "x".to_string(),
        rhs: Box::new(Tree::int(1)),
    };
    assert_eq!(
        JsPrinter::emit_to_string(&desugarer.desugar_tree(&tree, true)),
        "let x = 1;\n"
    );
}
