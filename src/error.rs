use std::sync::Arc;

/// Errors produced by the non-callback-boundary surface of the engine:
/// cache I/O, hex parsing, and query compilation.
///
/// Per the error handling design, nothing inside the event-loop callbacks
/// (`Engine::on_bytes`, `Engine::on_changedtree`, ...) ever returns one of
/// these — failures there are logged and swallowed. This type exists for
/// the lower-level, directly-callable operations (`cache::load_cache`,
/// `Rgb::from_hex`, a host's `IdentifierQuery::compile`) where a caller
/// legitimately wants to distinguish failure modes.
#[derive(Debug, thiserror::Error)]
pub enum SemhlError {
    #[error("invalid hex color: {0}")]
    InvalidHex(Arc<str>),

    #[error("failed to read {path}: {source}")]
    CacheRead {
        path: Arc<str>,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    CacheWrite {
        path: Arc<str>,
        source: std::io::Error,
    },

    #[error("failed to parse cache file: {0}")]
    CacheParse(#[from] serde_json::Error),

    #[error("no user cache directory available on this platform")]
    NoCacheDir,

    #[error("query compile error for language `{lang}`: {message}")]
    QueryCompile { lang: Arc<str>, message: Arc<str> },

    #[error("parser acquisition error: {0}")]
    ParserAcquire(Arc<str>),
}
