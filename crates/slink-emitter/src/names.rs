//! Emitted-name construction.
//!
//! Non-strong modes attach everything to the global `ScalaJS` object
//! (`ScalaJS.c.Foo`, `ScalaJS.is.Foo`, ...). Strong mode uses flat
//! `$`-prefixed bindings (`$c_Foo`, `$is_Foo`, ...), except the subtype
//! array table, which stays an object (`$Is.Foo`) because strong mode
//! cannot grow the global scope at run time.

use crate::javascript::JsNode;
use slink_common::OutputMode;

/// Reference to a per-class field of the runtime environment:
/// `ScalaJS.<field>.<name>` or `$<field>_<name>`.
pub fn env_field(mode: OutputMode, field: &str, name: &str) -> JsNode {
    if mode.is_strong() {
        if field == "Is" {
            JsNode::prop(JsNode::id("$Is"), name)
        } else {
            JsNode::id(format!("${field}_{name}"))
        }
    } else {
        JsNode::prop(JsNode::prop(JsNode::id("ScalaJS"), field), name)
    }
}

/// The flat identifier text of a strong-mode env field, for declaration
/// sites (`class $c_Foo`, `let $d_Foo`).
pub fn strong_field_ident(field: &str, name: &str) -> String {
    format!("${field}_{name}")
}

/// Reference to a runtime helper: `ScalaJS.<name>` or `$<name>`.
pub fn env_helper(mode: OutputMode, name: &str) -> JsNode {
    if mode.is_strong() {
        JsNode::id(format!("${name}"))
    } else {
        JsNode::prop(JsNode::id("ScalaJS"), name)
    }
}

/// The constructor variable of a class.
pub fn class_var(mode: OutputMode, name: &str) -> JsNode {
    env_field(mode, "c", name)
}

/// The `ClassData` table indexed by type tag.
pub fn class_data_table(mode: OutputMode) -> JsNode {
    if mode.is_strong() {
        JsNode::id("$ClassData")
    } else {
        JsNode::prop(JsNode::id("ScalaJS"), "ClassData")
    }
}

/// The `TypeData` constructor.
pub fn type_data_ctor(mode: OutputMode) -> JsNode {
    if mode.is_strong() {
        JsNode::id("$TypeData")
    } else {
        JsNode::prop(JsNode::id("ScalaJS"), "TypeData")
    }
}

/// Field name under `s` for a static method.
pub fn static_method_name(class_name: &str, method: &str) -> String {
    format!("{class_name}__{method}")
}

/// Reference to an interface default-method function.
///
/// Strong mode names these by method only (`$f_m`); other modes qualify
/// with the interface name (`ScalaJS.f.Intf__m`).
pub fn default_method(mode: OutputMode, class_name: &str, method: &str) -> JsNode {
    if mode.is_strong() {
        JsNode::id(format!("$f_{method}"))
    } else {
        env_field(mode, "f", &format!("{class_name}__{method}"))
    }
}
