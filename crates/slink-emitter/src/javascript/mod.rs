//! Emitted JavaScript: tree vocabulary and printer.

pub mod trees;
pub use trees::{JsNode, JsPropName};

pub mod printer;
pub use printer::JsPrinter;
