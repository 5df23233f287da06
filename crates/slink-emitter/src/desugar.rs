//! Desugaring of IR trees into JavaScript trees.
//!
//! Desugaring is a pure function of the IR, the output mode, and the
//! emitter's global knowledge (`is_interface`, ctor-opt membership). The
//! ctor-opt query records a dependency of the method being desugared on
//! the target class, so a later membership flip can invalidate exactly
//! the affected cached trees.

use rustc_hash::FxHashMap;

use crate::ctor_opt::{CtorOptTracker, MethodRef};
use crate::javascript::JsNode;
use crate::names;
use slink_common::OutputMode;
use slink_ir::trees::{Literal, Tree};
use slink_ir::{ClassKind, LinkedClass, LinkingUnit};

/// The emitter's public queries, borrowed by desugaring for the scope of
/// one run.
pub struct GlobalEnv<'a> {
    pub mode: OutputMode,
    classes: FxHashMap<&'a str, &'a LinkedClass>,
    tracker: &'a CtorOptTracker,
}

impl<'a> GlobalEnv<'a> {
    pub fn new(mode: OutputMode, unit: &'a LinkingUnit, tracker: &'a CtorOptTracker) -> Self {
        let classes = unit
            .classes
            .iter()
            .map(|c| (c.encoded_name.as_str(), c))
            .collect();
        Self {
            mode,
            classes,
            tracker,
        }
    }

    pub fn linked_class_by_name(&self, class_name: &str) -> Option<&'a LinkedClass> {
        self.classes.get(class_name).copied()
    }

    /// Whole-program kind query. Not dependency-tracked; see the
    /// limitation note on `CtorOptTracker`.
    pub fn is_interface(&self, class_name: &str) -> bool {
        self.linked_class_by_name(class_name)
            .is_some_and(|c| c.kind == ClassKind::Interface)
    }

    /// Ctor-opt query; records `caller` as depending on the answer.
    pub fn uses_js_constructor_opt(&self, target_class: &str, caller: &MethodRef) -> bool {
        self.tracker.uses_js_constructor_opt(target_class, caller)
    }

    /// Non-recording ctor-opt membership check, for decisions local to
    /// the class being emitted.
    pub fn is_ctor_opt(&self, class_name: &str) -> bool {
        self.tracker.is_ctor_opt(class_name)
    }
}

/// Map an IR literal to its JS rendition.
pub fn literal_to_js(literal: &Literal) -> JsNode {
    match literal {
        Literal::Undefined => JsNode::Undefined,
        Literal::Null => JsNode::Null,
        Literal::Bool(value) => JsNode::Bool(*value),
        Literal::Int(value) => JsNode::Int(*value),
        Literal::Double(value) => JsNode::Num(*value),
        Literal::Str(value) => JsNode::str(value.clone()),
    }
}

/// Desugars the trees of one method.
pub struct Desugarer<'a, 'e> {
    env: &'e GlobalEnv<'a>,
    caller: MethodRef,
    this_ident: Option<String>,
}

impl<'a, 'e> Desugarer<'a, 'e> {
    pub fn new(env: &'e GlobalEnv<'a>, caller: MethodRef) -> Self {
        Self {
            env,
            caller,
            this_ident: None,
        }
    }

    /// Receive `this` through a named first parameter instead of the
    /// JavaScript receiver. Used for interface default methods.
    #[must_use]
    pub fn with_explicit_this(mut self, ident: impl Into<String>) -> Self {
        self.this_ident = Some(ident.into());
        self
    }

    /// Desugar a method into a JS function expression. With an explicit
    /// `this` identifier, the receiver becomes the first parameter. With
    /// `returns_this`, a trailing `return this` is appended (constructor
    /// methods chain).
    #[tracing::instrument(level = "trace", skip(self, params, body), fields(caller = %self.caller.method_name))]
    pub fn desugar_to_function(
        &self,
        params: &[String],
        body: &Tree,
        returns_this: bool,
    ) -> JsNode {
        let mut all_params = Vec::with_capacity(params.len() + 1);
        if let Some(this_ident) = &self.this_ident {
            all_params.push(this_ident.clone());
        }
        all_params.extend(params.iter().cloned());

        let mut stats = match self.transform_stat(body) {
            JsNode::Block(items) | JsNode::Sequence(items) => items,
            JsNode::Skip => Vec::new(),
            single => vec![single],
        };
        if returns_this {
            stats.push(JsNode::ret(Some(self.this_expr())));
        }
        JsNode::func(None, all_params, stats)
    }

    /// Desugar one tree, in statement or expression position.
    pub fn desugar_tree(&self, tree: &Tree, is_stat: bool) -> JsNode {
        if is_stat {
            self.transform_stat(tree)
        } else {
            self.transform_expr(tree)
        }
    }

    fn this_expr(&self) -> JsNode {
        match &self.this_ident {
            Some(ident) => JsNode::id(ident.clone()),
            None => JsNode::This,
        }
    }

    fn var_decl(&self, name: &str, init: Option<JsNode>) -> JsNode {
        if self.env.mode.is_strong() {
            JsNode::let_decl(name, init)
        } else {
            JsNode::var_decl(name, init)
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn transform_stat(&self, tree: &Tree) -> JsNode {
        match tree {
            Tree::Skip => JsNode::Skip,
            Tree::Block(items) => {
                JsNode::Sequence(items.iter().map(|t| self.transform_stat(t)).collect())
            }
            Tree::VarDef { name, rhs } => self.var_decl(name, Some(self.transform_expr(rhs))),
            Tree::Assign { lhs, rhs } => {
                JsNode::assign_stat(self.transform_expr(lhs), self.transform_expr(rhs))
            }
            Tree::If { cond, thenp, elsep } => {
                let elsep = match elsep.as_ref() {
                    Tree::Skip => None,
                    other => Some(self.transform_stat(other)),
                };
                JsNode::if_stat(self.transform_expr(cond), self.transform_stat(thenp), elsep)
            }
            Tree::Return(value) => JsNode::ret(Some(self.transform_expr(value))),
            Tree::Throw(value) => JsNode::throw(self.transform_expr(value)),
            other => JsNode::expr_stmt(self.transform_expr(other)),
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn transform_expr(&self, tree: &Tree) -> JsNode {
        match tree {
            Tree::Skip => JsNode::Undefined,
            Tree::This => self.this_expr(),
            Tree::VarRef(name) => JsNode::id(name.clone()),
            Tree::Literal(literal) => literal_to_js(literal),
            Tree::Select { qualifier, item } => {
                JsNode::prop(self.transform_expr(qualifier), item.clone())
            }
            Tree::Assign { lhs, rhs } => {
                JsNode::assign(self.transform_expr(lhs), self.transform_expr(rhs))
            }
            Tree::BinaryOp { op, lhs, rhs } => {
                JsNode::binary(self.transform_expr(lhs), op, self.transform_expr(rhs))
            }
            Tree::UnaryOp { op, lhs } => JsNode::prefix(op, self.transform_expr(lhs)),
            Tree::If { cond, thenp, elsep } => JsNode::conditional(
                self.transform_expr(cond),
                self.transform_expr(thenp),
                self.transform_expr(elsep),
            ),
            Tree::Block(items) => {
                // Expression blocks fold into a comma sequence.
                let mut exprs: Vec<JsNode> =
                    items.iter().map(|t| self.transform_expr(t)).collect();
                match exprs.len() {
                    0 => JsNode::Undefined,
                    1 => exprs.remove(0),
                    _ => {
                        let first = exprs.remove(0);
                        exprs
                            .into_iter()
                            .fold(first, |acc, e| JsNode::binary(acc, ",", e))
                    }
                }
            }
            Tree::Apply {
                receiver,
                method,
                args,
            } => JsNode::call(
                JsNode::prop(self.transform_expr(receiver), method.clone()),
                self.transform_args(args),
            ),
            Tree::ApplyStatic {
                class_name,
                method,
                args,
            } => JsNode::call(
                self.static_call_target(class_name, method),
                self.transform_args(args),
            ),
            Tree::New {
                class_name,
                ctor,
                args,
            } => self.transform_new(class_name, ctor, args),
            Tree::LoadModule(module) => {
                JsNode::call(names::env_field(self.env.mode, "m", module), vec![])
            }
            // Statement-only trees have no value; they surface as
            // `(void 0)` if the IR ever places them in expression
            // position.
            Tree::VarDef { .. } | Tree::Return(_) | Tree::Throw(_) => JsNode::Undefined,
        }
    }

    fn transform_args(&self, args: &[Tree]) -> Vec<JsNode> {
        args.iter().map(|a| self.transform_expr(a)).collect()
    }

    /// Route a statically resolved call. Interface targets dispatch
    /// through the default-method function (receiver as first argument);
    /// class targets dispatch through the static-method namespace, which
    /// class-syntax modes render as a static member when the target has a
    /// class definition to carry it.
    fn static_call_target(&self, class_name: &str, method: &str) -> JsNode {
        let mode = self.env.mode;
        if self.env.is_interface(class_name) {
            names::default_method(mode, class_name, method)
        } else if mode.uses_classes()
            && self
                .env
                .linked_class_by_name(class_name)
                .is_some_and(|c| crate::class_emitter::ClassEmitter::needs_constructor(c))
        {
            JsNode::prop(names::class_var(mode, class_name), method)
        } else {
            names::env_field(mode, "s", &names::static_method_name(class_name, method))
        }
    }

    fn transform_new(&self, class_name: &str, ctor: &str, args: &[Tree]) -> JsNode {
        let mode = self.env.mode;
        let args = self.transform_args(args);
        if self.env.uses_js_constructor_opt(class_name, &self.caller) {
            JsNode::new_call(names::class_var(mode, class_name), args)
        } else {
            JsNode::call(
                JsNode::prop(
                    JsNode::new_call(names::class_var(mode, class_name), vec![]),
                    ctor,
                ),
                args,
            )
        }
    }
}

#[cfg(test)]
#[path = "tests/desugar.rs"]
mod tests;
