//! JavaScript tree vocabulary.
//!
//! The emitter desugars IR into these nodes and hands them to the output
//! builder. The vocabulary is deliberately small: it covers what the
//! emitter produces, not the whole language.

/// Name of an object or class member.
///
/// String-literal names appear for exported members, whose
/// JavaScript-visible name is arbitrary text.
#[derive(Clone, Debug, PartialEq)]
pub enum JsPropName {
    Ident(String),
    Str(String),
}

impl JsPropName {
    /// The raw name text, without literal quoting.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Ident(s) | Self::Str(s) => s,
        }
    }
}

/// An emitted JavaScript tree.
#[derive(Clone, Debug, PartialEq)]
pub enum JsNode {
    /// `/** text */` on its own line.
    DocComment(String),
    /// Emits nothing.
    Skip,
    /// A pre-rendered line, emitted verbatim. Used for core-library
    /// splicing, where the text is not re-parsed.
    Raw(String),
    /// `{ ... }` in statement position.
    Block(Vec<JsNode>),
    /// Statement run without braces.
    Sequence(Vec<JsNode>),
    VarDecl {
        keyword: &'static str,
        name: String,
        init: Option<Box<JsNode>>,
    },
    Ident(String),
    This,
    Str(String),
    Int(i32),
    Num(f64),
    Bool(bool),
    Null,
    Undefined,
    Binary {
        op: &'static str,
        left: Box<JsNode>,
        right: Box<JsNode>,
    },
    Prefix {
        op: &'static str,
        operand: Box<JsNode>,
    },
    Conditional {
        cond: Box<JsNode>,
        thenp: Box<JsNode>,
        elsep: Box<JsNode>,
    },
    Prop {
        object: Box<JsNode>,
        property: String,
    },
    Elem {
        object: Box<JsNode>,
        index: Box<JsNode>,
    },
    Call {
        callee: Box<JsNode>,
        args: Vec<JsNode>,
    },
    New {
        callee: Box<JsNode>,
        args: Vec<JsNode>,
    },
    Function {
        name: Option<String>,
        params: Vec<String>,
        body: Vec<JsNode>,
    },
    Arrow {
        params: Vec<String>,
        body: Vec<JsNode>,
    },
    Class {
        name: Option<String>,
        extends: Option<Box<JsNode>>,
        members: Vec<JsNode>,
    },
    MethodDef {
        is_static: bool,
        name: JsPropName,
        params: Vec<String>,
        body: Vec<JsNode>,
    },
    Getter {
        is_static: bool,
        name: JsPropName,
        body: Vec<JsNode>,
    },
    Setter {
        is_static: bool,
        name: JsPropName,
        param: String,
        body: Vec<JsNode>,
    },
    If {
        cond: Box<JsNode>,
        thenp: Box<JsNode>,
        elsep: Option<Box<JsNode>>,
    },
    Return(Option<Box<JsNode>>),
    Throw(Box<JsNode>),
    ExprStmt(Box<JsNode>),
    ObjectLit(Vec<(JsPropName, JsNode)>),
    ArrayLit(Vec<JsNode>),
}

impl JsNode {
    pub fn id(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Str(value.into())
    }

    pub fn undef() -> Self {
        Self::Undefined
    }

    pub fn prop(object: JsNode, property: impl Into<String>) -> Self {
        Self::Prop {
            object: Box::new(object),
            property: property.into(),
        }
    }

    pub fn elem(object: JsNode, index: JsNode) -> Self {
        Self::Elem {
            object: Box::new(object),
            index: Box::new(index),
        }
    }

    pub fn call(callee: JsNode, args: Vec<JsNode>) -> Self {
        Self::Call {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn new_call(callee: JsNode, args: Vec<JsNode>) -> Self {
        Self::New {
            callee: Box::new(callee),
            args,
        }
    }

    pub fn binary(left: JsNode, op: &'static str, right: JsNode) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn prefix(op: &'static str, operand: JsNode) -> Self {
        Self::Prefix {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn not(operand: JsNode) -> Self {
        Self::prefix("!", operand)
    }

    /// `(!!x)`, the boolean coercion used on tag reads.
    pub fn truthy(operand: JsNode) -> Self {
        Self::prefix("!!", operand)
    }

    pub fn typeof_(operand: JsNode) -> Self {
        Self::prefix("typeof ", operand)
    }

    pub fn conditional(cond: JsNode, thenp: JsNode, elsep: JsNode) -> Self {
        Self::Conditional {
            cond: Box::new(cond),
            thenp: Box::new(thenp),
            elsep: Box::new(elsep),
        }
    }

    /// An assignment expression; wrap in `assign_stat` for statement
    /// position.
    pub fn assign(lhs: JsNode, rhs: JsNode) -> Self {
        Self::binary(lhs, "=", rhs)
    }

    pub fn assign_stat(lhs: JsNode, rhs: JsNode) -> Self {
        Self::ExprStmt(Box::new(Self::assign(lhs, rhs)))
    }

    pub fn expr_stmt(expr: JsNode) -> Self {
        Self::ExprStmt(Box::new(expr))
    }

    pub fn var_decl(name: impl Into<String>, init: Option<JsNode>) -> Self {
        Self::VarDecl {
            keyword: "var",
            name: name.into(),
            init: init.map(Box::new),
        }
    }

    pub fn let_decl(name: impl Into<String>, init: Option<JsNode>) -> Self {
        Self::VarDecl {
            keyword: "let",
            name: name.into(),
            init: init.map(Box::new),
        }
    }

    pub fn ret(value: Option<JsNode>) -> Self {
        Self::Return(value.map(Box::new))
    }

    pub fn throw(value: JsNode) -> Self {
        Self::Throw(Box::new(value))
    }

    pub fn func(name: Option<&str>, params: Vec<String>, body: Vec<JsNode>) -> Self {
        Self::Function {
            name: name.map(str::to_string),
            params,
            body,
        }
    }

    pub fn if_stat(cond: JsNode, thenp: JsNode, elsep: Option<JsNode>) -> Self {
        Self::If {
            cond: Box::new(cond),
            thenp: Box::new(thenp),
            elsep: elsep.map(Box::new),
        }
    }

    pub fn doc_comment(text: impl Into<String>) -> Self {
        Self::DocComment(text.into())
    }

    /// Fold expressions into a `||` disjunction. Empty input folds to
    /// `false`.
    pub fn or_all(mut exprs: Vec<JsNode>) -> Self {
        if exprs.is_empty() {
            return Self::Bool(false);
        }
        let first = exprs.remove(0);
        exprs
            .into_iter()
            .fold(first, |acc, e| Self::binary(acc, "||", e))
    }
}

#[cfg(test)]
#[path = "tests/trees.rs"]
mod tests;
