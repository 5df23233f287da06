//! Common types and utilities for the slink linker.
//!
//! This crate provides foundational types used across all slink crates:
//! - Output dialects (`OutputMode`)
//! - Compliance configuration (`Semantics`, `CheckedBehavior`)
//!
//! By placing these here we establish a clear dependency hierarchy:
//!
//! ```text
//! common (base layer)
//!   ↓
//! ir → emitter
//! ```
//!
//! No crate should depend on a crate that appears later in this chain.

pub mod output_mode;
pub use output_mode::OutputMode;

pub mod semantics;
pub use semantics::{CheckedBehavior, Semantics};
