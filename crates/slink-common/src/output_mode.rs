//! Output dialect selection for the emitter.
//!
//! The emitter can target four JavaScript dialects that differ in how
//! classes are declared, how the output is wrapped, and how emitted trees
//! are assembled into the final text.

use serde::{Deserialize, Serialize};

/// Target JavaScript dialect.
///
/// This determines the shape of emitted constructors, method definitions,
/// and the prelude/postlude wrapping of the whole output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum OutputMode {
    /// ECMAScript 5.1, definitions attached to a global `ScalaJS` object.
    ///
    /// This is the historical default: public operations that omit the
    /// output mode resolve to this variant.
    #[default]
    ECMAScript51Global = 0,

    /// ECMAScript 5.1 wrapped in an IIFE so nothing leaks into the global
    /// scope except the explicit exports.
    ECMAScript51Isolated = 1,

    /// ECMAScript 6 with `class` declarations, wrapped in an IIFE.
    ECMAScript6 = 2,

    /// ECMAScript 6 "strong mode": class pieces are spliced into a
    /// pre-rendered core library at fixed marker lines.
    ECMAScript6StrongMode = 3,
}

impl OutputMode {
    /// Check if this mode emits `class` syntax instead of
    /// function/prototype chains.
    #[must_use]
    pub const fn uses_classes(self) -> bool {
        matches!(self, Self::ECMAScript6 | Self::ECMAScript6StrongMode)
    }

    /// Check if this is the strong-mode dialect (marker-spliced assembly,
    /// flat `$`-prefixed names).
    #[must_use]
    pub const fn is_strong(self) -> bool {
        matches!(self, Self::ECMAScript6StrongMode)
    }

    /// Check if definitions land on the global `ScalaJS` object without a
    /// wrapping function.
    #[must_use]
    pub const fn is_global(self) -> bool {
        matches!(self, Self::ECMAScript51Global)
    }

    /// Check if the output is wrapped in `(function(){ ... }).call(this);`.
    ///
    /// Strong mode has its own, richer wrapper and is not covered here.
    #[must_use]
    pub const fn wraps_in_iife(self) -> bool {
        matches!(self, Self::ECMAScript51Isolated | Self::ECMAScript6)
    }
}
