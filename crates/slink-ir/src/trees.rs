//! IR expression trees.
//!
//! Method bodies in a linked class are written in this vocabulary. The
//! emitter consumes these trees read-only and desugars them to JavaScript
//! trees; it never constructs them.

/// A literal IR value.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Undefined,
    Null,
    Bool(bool),
    Int(i32),
    Double(f64),
    Str(String),
}

/// Name of a member, as written in the IR.
///
/// Exported members carry string-literal names (their JavaScript-visible
/// name); internal members carry mangled identifiers.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyName {
    Ident(String),
    StringLit(String),
}

impl PropertyName {
    /// The raw name text, without literal quoting.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Ident(s) | Self::StringLit(s) => s,
        }
    }
}

/// An IR expression or statement.
///
/// Statement/expression position is decided by the consumer; `If` for
/// example renders as a statement or a conditional expression depending
/// on where it appears.
#[derive(Clone, Debug, PartialEq)]
pub enum Tree {
    Skip,
    Block(Vec<Tree>),
    VarDef {
        name: String,
        rhs: Box<Tree>,
    },
    Assign {
        lhs: Box<Tree>,
        rhs: Box<Tree>,
    },
    If {
        cond: Box<Tree>,
        thenp: Box<Tree>,
        elsep: Box<Tree>,
    },
    Return(Box<Tree>),
    Throw(Box<Tree>),
    This,
    VarRef(String),
    Select {
        qualifier: Box<Tree>,
        item: String,
    },
    Literal(Literal),
    BinaryOp {
        op: &'static str,
        lhs: Box<Tree>,
        rhs: Box<Tree>,
    },
    UnaryOp {
        op: &'static str,
        lhs: Box<Tree>,
    },
    /// Virtual dispatch on the receiver.
    Apply {
        receiver: Box<Tree>,
        method: String,
        args: Vec<Tree>,
    },
    /// Statically routed call. If the target class is an interface, the
    /// receiver travels as the first element of `args` and the call goes
    /// through the default-method function; otherwise it goes through the
    /// static-method namespace.
    ApplyStatic {
        class_name: String,
        method: String,
        args: Vec<Tree>,
    },
    /// Instantiation: `new C().init(args)`, or the ctor-optimized
    /// `new C(args)` when the target class qualifies.
    New {
        class_name: String,
        ctor: String,
        args: Vec<Tree>,
    },
    /// Load (and lazily initialize) a module singleton.
    LoadModule(String),
}

impl Tree {
    pub fn var_ref(name: impl Into<String>) -> Self {
        Self::VarRef(name.into())
    }

    pub fn select(qualifier: Tree, item: impl Into<String>) -> Self {
        Self::Select {
            qualifier: Box::new(qualifier),
            item: item.into(),
        }
    }

    pub fn assign(lhs: Tree, rhs: Tree) -> Self {
        Self::Assign {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn ret(value: Tree) -> Self {
        Self::Return(Box::new(value))
    }

    pub fn int(value: i32) -> Self {
        Self::Literal(Literal::Int(value))
    }

    pub fn str(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Str(value.into()))
    }

    pub fn binary(op: &'static str, lhs: Tree, rhs: Tree) -> Self {
        Self::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn apply(receiver: Tree, method: impl Into<String>, args: Vec<Tree>) -> Self {
        Self::Apply {
            receiver: Box::new(receiver),
            method: method.into(),
            args,
        }
    }

    pub fn apply_static(
        class_name: impl Into<String>,
        method: impl Into<String>,
        args: Vec<Tree>,
    ) -> Self {
        Self::ApplyStatic {
            class_name: class_name.into(),
            method: method.into(),
            args,
        }
    }

    pub fn new_instance(
        class_name: impl Into<String>,
        ctor: impl Into<String>,
        args: Vec<Tree>,
    ) -> Self {
        Self::New {
            class_name: class_name.into(),
            ctor: ctor.into(),
            args,
        }
    }
}

/// A method of a linked class.
#[derive(Clone, Debug, PartialEq)]
pub struct MethodDef {
    pub name: PropertyName,
    pub params: Vec<String>,
    pub body: Tree,
    /// Opaque content identity; `None` forces re-desugaring every run.
    pub version: Option<String>,
}

impl MethodDef {
    pub fn new(name: PropertyName, params: Vec<String>, body: Tree) -> Self {
        Self {
            name,
            params,
            body,
            version: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Check if this method is a constructor (by its IR name).
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        crate::definitions::is_constructor_name(self.name.text())
    }
}

/// An exported property with optional getter and setter bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyDef {
    pub name: PropertyName,
    pub getter: Option<Tree>,
    /// Setter parameter name and body.
    pub setter: Option<(String, Tree)>,
    pub version: Option<String>,
}
