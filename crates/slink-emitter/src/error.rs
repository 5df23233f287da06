//! Fatal emitter errors.
//!
//! The emitter aborts the current run on the first error and produces no
//! partial output promises: caches keep whatever state they reached, and
//! the next run invalidates stale entries naturally through version
//! mismatches.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitError {
    /// A JS class must carry its constructor as an exported member named
    /// `"constructor"`.
    #[error("JS class {0} has no exported member named \"constructor\"")]
    MissingJSConstructor(String),

    /// Every Scala.js-defined class except `java.lang.Object` has a
    /// superclass.
    #[error("class {0} has no superclass")]
    MissingSuperClass(String),

    /// An exported property must have a getter or a setter.
    #[error("exported member {1} of class {0} is neither a method nor a property")]
    IllegalExportedMember(String, String),

    /// The tag assignment walk must reach every class in the unit.
    #[error("type tag assignment did not cover class {0}")]
    TagAssignment(String),

    /// Strong-mode assembly needs the core library's splice markers.
    #[error("core library is missing the splice marker {0:?}")]
    MissingSpliceMarker(&'static str),
}
