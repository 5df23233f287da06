//! Linked classes and linking units.
//!
//! A `LinkingUnit` is the fully linked program handed to the emitter: a
//! flat list of `LinkedClass` values carrying their methods, fields, and
//! export directives, plus the metadata the emitter keys its caches on
//! (`ancestors`, `version`).

use crate::trees::{Literal, MethodDef, PropertyDef, Tree};

/// Kind of a linked class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    ModuleClass,
    JSClass,
    JSModuleClass,
    Interface,
    RawJSType,
    HijackedClass,
}

impl ClassKind {
    /// Scala classes with a plain object layout.
    #[must_use]
    pub const fn is_class(self) -> bool {
        matches!(self, Self::Class | Self::ModuleClass)
    }

    /// Classes defined in Scala.js source, whether Scala or JS semantics.
    /// These are the classes the emitter generates a constructor for.
    #[must_use]
    pub const fn is_any_scalajs_defined_class(self) -> bool {
        matches!(
            self,
            Self::Class | Self::ModuleClass | Self::JSClass | Self::JSModuleClass
        )
    }

    /// Classes with JavaScript semantics.
    #[must_use]
    pub const fn is_js_class(self) -> bool {
        matches!(self, Self::JSClass | Self::JSModuleClass)
    }

    /// Classes exposing a lazily initialized module singleton.
    #[must_use]
    pub const fn has_module_accessor(self) -> bool {
        matches!(self, Self::ModuleClass | Self::JSModuleClass)
    }
}

/// A field of a linked class, with its zero value.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub zero: Literal,
}

/// A member exported to JavaScript under a string-literal name.
#[derive(Clone, Debug, PartialEq)]
pub enum ExportedMember {
    Method(MethodDef),
    Property(PropertyDef),
}

/// A top-level export directive of a class.
#[derive(Clone, Debug, PartialEq)]
pub enum ClassExport {
    /// Export the constructor under a dotted JavaScript name.
    Constructor {
        name: String,
        params: Vec<String>,
        body: Tree,
        version: Option<String>,
    },
    /// Export the module accessor under a dotted JavaScript name.
    Module { name: String },
}

/// A fully linked class, the per-class input of the emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkedClass {
    /// ASCII mangled identifier, unique in the unit.
    pub encoded_name: String,
    /// Human-readable name for diagnostics and runtime type data.
    pub original_name: Option<String>,
    pub kind: ClassKind,
    pub super_class: Option<String>,
    /// Transitive supertypes including self. Order is significant: the
    /// list is a cache key compared element-wise.
    pub ancestors: Vec<String>,
    /// JavaScript-level name, for raw JS types.
    pub js_name: Option<String>,
    pub fields: Vec<FieldDef>,
    pub static_methods: Vec<MethodDef>,
    pub member_methods: Vec<MethodDef>,
    pub exported_members: Vec<ExportedMember>,
    pub class_exports: Vec<ClassExport>,
    pub has_instances: bool,
    pub has_instance_tests: bool,
    pub has_runtime_type_info: bool,
    /// Opaque content identity. Equal versions signal identical content;
    /// `None` forces invalidation.
    pub version: Option<String>,
}

impl LinkedClass {
    /// A minimal class with the given name and kind, every list empty and
    /// every predicate flag set. Tests and builders fill in the rest.
    pub fn new(encoded_name: impl Into<String>, kind: ClassKind) -> Self {
        let encoded_name = encoded_name.into();
        Self {
            ancestors: vec![encoded_name.clone()],
            encoded_name,
            original_name: None,
            kind,
            super_class: None,
            js_name: None,
            fields: Vec::new(),
            static_methods: Vec::new(),
            member_methods: Vec::new(),
            exported_members: Vec::new(),
            class_exports: Vec::new(),
            has_instances: true,
            has_instance_tests: true,
            has_runtime_type_info: true,
            version: None,
        }
    }

    /// Display name: the original name when present, the encoded name
    /// otherwise.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.original_name.as_deref().unwrap_or(&self.encoded_name)
    }

    /// Check if the emitter must generate instance-test functions.
    ///
    /// Exported constructors need `as_C` for their receiver checks even
    /// when no linked code tests the type.
    #[must_use]
    pub fn needs_instance_tests(&self) -> bool {
        self.has_instance_tests || !self.class_exports.is_empty()
    }
}

/// The fully linked program.
#[derive(Clone, Debug, Default)]
pub struct LinkingUnit {
    pub classes: Vec<LinkedClass>,
}

impl LinkingUnit {
    pub fn new(classes: Vec<LinkedClass>) -> Self {
        Self { classes }
    }

    /// Look up a class by encoded name.
    #[must_use]
    pub fn class_by_name(&self, encoded_name: &str) -> Option<&LinkedClass> {
        self.classes.iter().find(|c| c.encoded_name == encoded_name)
    }
}
