//! Output builders.
//!
//! The emitter writes through `JsTreeBuilder`, an append-only seam: trees
//! and pre-rendered lines go in, in calling order, and the builder owns
//! rendering. The real linker plugs a source-map-aware builder in here;
//! `JsFileBuilder` is the in-memory implementation used by `emit_all` and
//! the tests.

use crate::javascript::{JsNode, JsPrinter};

/// Append-only sink for emitted trees and raw lines.
pub trait JsTreeBuilder {
    fn add_tree(&mut self, tree: &JsNode);
    fn add_line(&mut self, line: &str);
}

/// In-memory text builder.
pub struct JsFileBuilder {
    out: String,
}

impl JsFileBuilder {
    pub fn new() -> Self {
        Self { out: String::new() }
    }

    /// Finish and return the accumulated text.
    #[must_use]
    pub fn complete(self) -> String {
        self.out
    }

    #[must_use]
    pub fn contents(&self) -> &str {
        &self.out
    }
}

impl JsTreeBuilder for JsFileBuilder {
    fn add_tree(&mut self, tree: &JsNode) {
        let mut printer = JsPrinter::new();
        printer.emit(tree);
        self.out.push_str(printer.get_output());
    }

    fn add_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }
}

impl Default for JsFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Split `text` on `\n` and append each line to the builder. A trailing
/// newline does not produce an extra empty line.
pub fn add_lines(builder: &mut dyn JsTreeBuilder, text: &str) {
    let bytes = text.as_bytes();
    let mut start = 0;
    for pos in memchr::memchr_iter(b'\n', bytes) {
        builder.add_line(&text[start..pos]);
        start = pos + 1;
    }
    if start < text.len() {
        builder.add_line(&text[start..]);
    }
}
