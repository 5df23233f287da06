//! Linked IR data model for the slink emitter.
//!
//! This crate defines the read-only input of the emitter:
//! - `definitions`: the closed constant tables of the IR namespace
//!   (reserved type tags, hijacked boxed classes and their ancestors)
//! - `trees`: the IR expression vocabulary method bodies are written in
//! - `linked_class`: `LinkedClass` / `LinkingUnit`, the unit of linking
//!
//! The emitter never mutates any of these types.

pub mod definitions;

pub mod trees;
pub use trees::{Literal, MethodDef, PropertyDef, PropertyName, Tree};

pub mod linked_class;
pub use linked_class::{ClassExport, ClassKind, ExportedMember, FieldDef, LinkedClass, LinkingUnit};
