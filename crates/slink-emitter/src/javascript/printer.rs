//! Renders `JsNode` trees to JavaScript text.
//!
//! Printing is a pure function of the tree: identical trees produce
//! identical text. Nested expressions are parenthesized unconditionally,
//! trading a few redundant parentheses for never having to reason about
//! precedence.

use super::trees::{JsNode, JsPropName};

pub struct JsPrinter {
    out: String,
    indent: usize,
}

impl JsPrinter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
        }
    }

    /// Render a single tree in statement position.
    pub fn emit_to_string(node: &JsNode) -> String {
        let mut printer = Self::new();
        printer.emit(node);
        printer.out
    }

    pub fn get_output(&self) -> &str {
        &self.out
    }

    pub fn into_output(self) -> String {
        self.out
    }

    pub fn set_indent_level(&mut self, level: usize) {
        self.indent = level;
    }

    // =========================================================================
    // Output helpers
    // =========================================================================

    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn write_line(&mut self) {
        self.out.push('\n');
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Emit a tree in statement position.
    pub fn emit(&mut self, node: &JsNode) {
        match node {
            JsNode::Skip => {}
            JsNode::DocComment(text) => {
                self.write_indent();
                self.write("/** ");
                self.write(text);
                self.write(" */");
                self.write_line();
            }
            JsNode::Raw(text) => {
                self.write(text);
                self.write_line();
            }
            JsNode::Sequence(items) => {
                for item in items {
                    self.emit(item);
                }
            }
            JsNode::Block(items) => {
                self.write_indent();
                self.emit_braced(items);
                self.write_line();
            }
            JsNode::VarDecl {
                keyword,
                name,
                init,
            } => {
                self.write_indent();
                self.write(keyword);
                self.write(" ");
                self.write(name);
                if let Some(init) = init {
                    self.write(" = ");
                    self.emit_expr(init);
                }
                self.write(";");
                self.write_line();
            }
            JsNode::If { cond, thenp, elsep } => {
                self.write_indent();
                self.emit_if_chain(cond, thenp, elsep.as_deref());
                self.write_line();
            }
            JsNode::Return(value) => {
                self.write_indent();
                match value {
                    Some(value) => {
                        self.write("return ");
                        self.emit_expr(value);
                        self.write(";");
                    }
                    None => self.write("return;"),
                }
                self.write_line();
            }
            JsNode::Throw(value) => {
                self.write_indent();
                self.write("throw ");
                self.emit_expr(value);
                self.write(";");
                self.write_line();
            }
            JsNode::ExprStmt(expr) => {
                self.write_indent();
                // Top-level assignments read without wrapping parens.
                if let JsNode::Binary {
                    op: "=",
                    left,
                    right,
                } = expr.as_ref()
                {
                    self.emit_expr(left);
                    self.write(" = ");
                    self.emit_expr(right);
                } else {
                    self.emit_expr(expr);
                }
                self.write(";");
                self.write_line();
            }
            JsNode::Function {
                name: Some(name),
                params,
                body,
            } => {
                self.write_indent();
                self.write("function ");
                self.write(name);
                self.emit_param_list(params);
                self.write(" ");
                self.emit_braced(body);
                self.write_line();
            }
            JsNode::Class {
                name: Some(name),
                extends,
                members,
            } => {
                self.write_indent();
                self.write("class ");
                self.write(name);
                if let Some(extends) = extends {
                    self.write(" extends ");
                    self.emit_expr(extends);
                }
                self.write(" ");
                self.emit_class_body(members);
                self.write_line();
            }
            JsNode::MethodDef { .. } | JsNode::Getter { .. } | JsNode::Setter { .. } => {
                self.write_indent();
                self.emit_class_member(node);
                self.write_line();
            }
            // A bare expression in statement position.
            other => {
                self.write_indent();
                self.emit_expr(other);
                self.write(";");
                self.write_line();
            }
        }
    }

    fn emit_if_chain(&mut self, cond: &JsNode, thenp: &JsNode, elsep: Option<&JsNode>) {
        self.write("if (");
        self.emit_expr(cond);
        self.write(") ");
        self.emit_as_block(thenp);
        if let Some(elsep) = elsep {
            self.write(" else ");
            if let JsNode::If {
                cond: c,
                thenp: t,
                elsep: e,
            } = elsep
            {
                self.emit_if_chain(c, t, e.as_deref());
            } else {
                self.emit_as_block(elsep);
            }
        }
    }

    /// Emit a statement as a braced block, wrapping a single statement.
    fn emit_as_block(&mut self, node: &JsNode) {
        match node {
            JsNode::Block(items) | JsNode::Sequence(items) => self.emit_braced(items),
            other => self.emit_braced(std::slice::from_ref(other)),
        }
    }

    fn emit_braced(&mut self, items: &[JsNode]) {
        self.write("{");
        self.write_line();
        self.indent += 1;
        for item in items {
            self.emit(item);
        }
        self.indent -= 1;
        self.write_indent();
        self.write("}");
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn emit_expr(&mut self, node: &JsNode) {
        match node {
            JsNode::Ident(name) => self.write(name),
            JsNode::This => self.write("this"),
            JsNode::Str(value) => self.emit_string_literal(value),
            JsNode::Int(value) => {
                let text = value.to_string();
                if *value < 0 {
                    self.write("(");
                    self.write(&text);
                    self.write(")");
                } else {
                    self.write(&text);
                }
            }
            JsNode::Num(value) => {
                let text = format!("{value}");
                if *value < 0.0 {
                    self.write("(");
                    self.write(&text);
                    self.write(")");
                } else {
                    self.write(&text);
                }
            }
            JsNode::Bool(value) => self.write(if *value { "true" } else { "false" }),
            JsNode::Null => self.write("null"),
            JsNode::Undefined => self.write("(void 0)"),
            JsNode::Binary { op, left, right } => {
                self.write("(");
                self.emit_expr(left);
                self.write(" ");
                self.write(op);
                self.write(" ");
                self.emit_expr(right);
                self.write(")");
            }
            JsNode::Prefix { op, operand } => {
                self.write("(");
                self.write(op);
                self.emit_expr(operand);
                self.write(")");
            }
            JsNode::Conditional { cond, thenp, elsep } => {
                self.write("(");
                self.emit_expr(cond);
                self.write(" ? ");
                self.emit_expr(thenp);
                self.write(" : ");
                self.emit_expr(elsep);
                self.write(")");
            }
            JsNode::Prop { object, property } => {
                self.emit_expr(object);
                self.write(".");
                self.write(property);
            }
            JsNode::Elem { object, index } => {
                self.emit_expr(object);
                self.write("[");
                self.emit_expr(index);
                self.write("]");
            }
            JsNode::Call { callee, args } => {
                self.emit_expr(callee);
                self.emit_arg_list(args);
            }
            JsNode::New { callee, args } => {
                self.write("new ");
                self.emit_expr(callee);
                self.emit_arg_list(args);
            }
            JsNode::Function { name, params, body } => {
                self.write("(function");
                if let Some(name) = name {
                    self.write(" ");
                    self.write(name);
                }
                self.emit_param_list(params);
                self.write(" ");
                self.emit_braced(body);
                self.write(")");
            }
            JsNode::Arrow { params, body } => {
                self.write("(");
                self.emit_param_list(params);
                self.write(" => ");
                self.emit_braced(body);
                self.write(")");
            }
            JsNode::Class {
                name,
                extends,
                members,
            } => {
                self.write("class");
                if let Some(name) = name {
                    self.write(" ");
                    self.write(name);
                }
                if let Some(extends) = extends {
                    self.write(" extends ");
                    self.emit_expr(extends);
                }
                self.write(" ");
                self.emit_class_body(members);
            }
            JsNode::ObjectLit(fields) => {
                if fields.is_empty() {
                    self.write("{}");
                    return;
                }
                self.write("{");
                self.write_line();
                self.indent += 1;
                for (i, (name, value)) in fields.iter().enumerate() {
                    self.write_indent();
                    self.emit_prop_name(name);
                    self.write(": ");
                    self.emit_expr(value);
                    if i + 1 < fields.len() {
                        self.write(",");
                    }
                    self.write_line();
                }
                self.indent -= 1;
                self.write_indent();
                self.write("}");
            }
            JsNode::ArrayLit(items) => {
                self.write("[");
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.emit_expr(item);
                }
                self.write("]");
            }
            // Statement nodes have no expression rendering; emit nothing
            // visible rather than invalid text.
            _ => self.write("(void 0)"),
        }
    }

    fn emit_string_literal(&mut self, value: &str) {
        // JSON escaping is valid JS string escaping.
        match serde_json::to_string(value) {
            Ok(escaped) => self.write(&escaped),
            Err(_) => self.write("\"\""),
        }
    }

    fn emit_param_list(&mut self, params: &[String]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(param);
        }
        self.write(")");
    }

    fn emit_arg_list(&mut self, args: &[JsNode]) {
        self.write("(");
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.emit_expr(arg);
        }
        self.write(")");
    }

    // =========================================================================
    // Class members
    // =========================================================================

    fn emit_class_body(&mut self, members: &[JsNode]) {
        self.write("{");
        self.write_line();
        self.indent += 1;
        for member in members {
            if matches!(member, JsNode::Skip) {
                continue;
            }
            self.write_indent();
            self.emit_class_member(member);
            self.write_line();
        }
        self.indent -= 1;
        self.write_indent();
        self.write("}");
    }

    fn emit_class_member(&mut self, member: &JsNode) {
        match member {
            JsNode::MethodDef {
                is_static,
                name,
                params,
                body,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.emit_prop_name(name);
                self.emit_param_list(params);
                self.write(" ");
                self.emit_braced(body);
            }
            JsNode::Getter {
                is_static,
                name,
                body,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.write("get ");
                self.emit_prop_name(name);
                self.write("() ");
                self.emit_braced(body);
            }
            JsNode::Setter {
                is_static,
                name,
                param,
                body,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.write("set ");
                self.emit_prop_name(name);
                self.write("(");
                self.write(param);
                self.write(") ");
                self.emit_braced(body);
            }
            other => self.emit_expr(other),
        }
    }

    fn emit_prop_name(&mut self, name: &JsPropName) {
        match name {
            JsPropName::Ident(text) => self.write(text),
            JsPropName::Str(text) => self.emit_string_literal(text),
        }
    }
}

impl Default for JsPrinter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/printer.rs"]
mod tests;
