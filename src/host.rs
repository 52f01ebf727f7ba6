//! Host capability traits. The engine is generic only over these: a
//! parser factory, a per-buffer parser that can report identifier
//! occurrences in a range, and a style registry that turns an `Rgb` into
//! an opaque key a [`crate::span::SpanStore`] insert can reference.
//! Everything else the engine needs (spans, timers) is either the
//! [`crate::span::SpanStore`] trait or kept as plain internal state —
//! see `engine`'s module docs.

use crate::color::Rgb;
use crate::error::SemhlError;
use crate::span::Position;

/// One `(identifier)` occurrence returned by a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierNode {
    pub start: Position,
    pub end: Position,
    pub text: String,
}

/// A per-buffer parser handle.
///
/// Folds separate parse/query-iteration steps into one method, since
/// the core never needs anything from the tree except "identifiers
/// within this row range" — a host backed by real tree-sitter bindings
/// implements `identifiers_in` by running its cached `(identifier) @id`
/// query over the freshly parsed tree.
pub trait ParserHandle {
    fn lang(&self) -> &str;

    /// Re-parse the buffer. Called once on attach and again on every
    /// flush before querying identifiers.
    fn parse(&mut self) -> Result<(), SemhlError>;

    /// Identifiers in `[row_start, row_end_exclusive)`, or the whole
    /// buffer when `None` (the initial-processing case). An `Err` models
    /// a query-iteration failure: the caller drops this pass and retries
    /// on the next flush/tree-change.
    fn identifiers_in(
        &self,
        row_start: Option<u32>,
        row_end_exclusive: Option<u32>,
    ) -> Result<Vec<IdentifierNode>, SemhlError>;
}

/// Acquires a [`ParserHandle`] for a buffer.
pub trait ParserFactory {
    fn get_parser(&self, lang: Option<&str>) -> Result<Box<dyn ParserHandle>, SemhlError>;
}

/// Registers a named foreground style for an `Rgb` and returns its key.
/// Implementations should memoize so the same `Rgb` always yields the
/// same key.
pub trait StyleRegistry {
    fn ensure_style(&mut self, rgb: Rgb) -> String;
}

/// A `StyleRegistry` that names styles `sfg_<rrggbb>` and performs no
/// other bookkeeping — sufficient for hosts whose style namespace is
/// already content-addressed by color.
#[derive(Debug, Default)]
pub struct HexStyleRegistry;

impl StyleRegistry for HexStyleRegistry {
    fn ensure_style(&mut self, rgb: Rgb) -> String {
        format!("sfg_{:02x}{:02x}{:02x}", rgb.r, rgb.g, rgb.b)
    }
}
