//! Compliance configuration for emitted code.
//!
//! Some IR operations have a checked and an unchecked rendition. The
//! `Semantics` carried by the emitter decides, per concern, which one is
//! emitted. The choice changes the emitted JavaScript, never the emitter
//! itself.

use serde::{Deserialize, Serialize};

/// How strictly a runtime condition is checked in emitted code.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckedBehavior {
    /// No check is emitted; violating the condition is undefined behavior.
    Unchecked,

    /// The condition is detected and handled with a lenient result
    /// (e.g. a re-entrant module initializer observes `null`).
    Compliant,

    /// The condition is detected and the emitted code throws an
    /// `UndefinedBehaviorError`.
    #[default]
    Fatal,
}

impl CheckedBehavior {
    /// Check if any detection code is emitted at all.
    #[must_use]
    pub const fn is_checked(self) -> bool {
        !matches!(self, Self::Unchecked)
    }
}

/// Emitter-observable semantics of the linked program.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semantics {
    /// Behavior of `asInstanceOf` casts (`as_C` / `asArrayOf_C`
    /// functions). `Unchecked` makes them return their argument as-is.
    pub as_instance_ofs: CheckedBehavior,

    /// Behavior of module initializers when re-entered before the first
    /// initialization completed.
    pub module_init: CheckedBehavior,
}

impl Semantics {
    /// Fully checked semantics, the default for development builds.
    #[must_use]
    pub const fn defaults() -> Self {
        Self {
            as_instance_ofs: CheckedBehavior::Fatal,
            module_init: CheckedBehavior::Fatal,
        }
    }

    /// Fully unchecked semantics, the usual choice for optimized builds.
    #[must_use]
    pub const fn optimized() -> Self {
        Self {
            as_instance_ofs: CheckedBehavior::Unchecked,
            module_init: CheckedBehavior::Unchecked,
        }
    }

    /// Override the module initializer behavior.
    #[must_use]
    pub const fn with_module_init(mut self, behavior: CheckedBehavior) -> Self {
        self.module_init = behavior;
        self
    }

    /// Override the cast behavior.
    #[must_use]
    pub const fn with_as_instance_ofs(mut self, behavior: CheckedBehavior) -> Self {
        self.as_instance_ofs = behavior;
        self
    }
}
