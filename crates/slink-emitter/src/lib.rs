//! Incremental JavaScript emitter for the slink linker.
//!
//! Given a fully linked program (`slink_ir::LinkingUnit`), the emitter
//! produces a single JavaScript output in one of four target dialects
//! (`slink_common::OutputMode`). Desugared trees are cached across runs
//! at two levels (per class and per method) and invalidated when IR
//! versions change or when cross-class knowledge consulted during
//! desugaring changes.
//!
//! The crate is layered leaves-first:
//! - `javascript`: the emitted JS tree vocabulary and its printer
//! - `builder`: the append-only output seam
//! - `type_tags`: subtype testing via integer tag intervals
//! - `caches` / `ctor_opt`: the incremental machinery
//! - `desugar` / `class_emitter`: IR-to-JS transformation
//! - `emitter`: the driver tying a run together

pub mod javascript;

pub mod builder;
pub use builder::{JsFileBuilder, JsTreeBuilder};

pub mod corelib;

pub mod error;
pub use error::EmitError;

pub mod names;

pub mod type_tags;
pub use type_tags::TypeTags;

pub mod caches;
pub use caches::CacheStats;

pub mod ctor_opt;
pub use ctor_opt::CtorOptTracker;

pub mod desugar;
pub use desugar::GlobalEnv;

pub mod class_emitter;

pub mod emitter;
pub use emitter::Emitter;
