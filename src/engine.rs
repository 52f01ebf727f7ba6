//! Incremental engine: owns per-buffer state, reacts to byte-change and
//! tree-change notifications from the host, batches and merges pending
//! edit ranges, and keeps the span store in sync with the
//! identifier→color map.
//!
//! The engine has no owned event loop — it is single-threaded and
//! cooperative; all state is owned by the host's main event loop. Timers
//! are modeled as plain `Instant` deadlines kept in per-buffer state;
//! the host drives them by calling [`Engine::advance`] from its own loop
//! (or a test calling it with a fake clock), rather than the engine
//! spawning anything itself. See `DESIGN.md` for the reasoning behind
//! this choice.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::{Background, Config};
use crate::generator::ColorGenerator;
use crate::host::{ParserFactory, ParserHandle, StyleRegistry};
use crate::span::{BufferId, Position, SpanStore};

/// Debounce before a pending byte-change range is flushed.
pub const BYTE_CHANGE_DELAY: Duration = Duration::from_millis(50);

type Tick = u64;

/// A half-open `[start, end)` row/col range: a pending edit range, or a
/// tree-change range reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditRange {
    pub start: Position,
    pub end: Position,
}

impl EditRange {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

struct BufferState {
    parser: Box<dyn ParserHandle>,
    pending_ranges: Vec<EditRange>,
    pending_timers: HashMap<Tick, Instant>,
}

pub struct Engine<S: SpanStore, R: StyleRegistry> {
    config: Config,
    generator: ColorGenerator,
    span_store: S,
    style_registry: R,
    buffers: HashMap<BufferId, BufferState>,
}

impl<S: SpanStore, R: StyleRegistry> Engine<S, R> {
    /// Construct the engine and immediately populate the generator's
    /// in-memory map from its on-disk cache, if the recorded fingerprint
    /// matches — this is what makes the identifier→color map persist
    /// across process restarts per the data model's lifecycle.
    pub fn new(config: Config, mut generator: ColorGenerator, span_store: S, style_registry: R) -> Self {
        generator.load_from_disk();
        Self { config, generator, span_store, style_registry, buffers: HashMap::new() }
    }

    pub fn is_attached(&self, buffer: BufferId) -> bool {
        self.buffers.contains_key(&buffer)
    }

    pub fn span_store(&self) -> &S {
        &self.span_store
    }

    /// Attach to a buffer: skip if disabled, acquire a parser, run the
    /// initial full-buffer coloring pass. Returns `false` without
    /// registering any state if the buffer is disabled or the parser
    /// can't be acquired/parsed — the buffer is left untouched in that
    /// case.
    pub fn attach(
        &mut self,
        buffer: BufferId,
        file_size: u64,
        factory: &dyn ParserFactory,
        lang: Option<&str>,
        now: Instant,
    ) -> bool {
        if self.config.is_disabled(file_size) {
            return false;
        }

        let mut parser = match factory.get_parser(lang) {
            Ok(parser) => parser,
            Err(err) => {
                log::warn!("semhl: parser acquisition failed for buffer {buffer}: {err}");
                return false;
            }
        };

        if let Err(err) = parser.parse() {
            log::warn!("semhl: initial parse failed for buffer {buffer}: {err}");
            return false;
        }

        self.span_store.clear_all_spans(buffer);
        self.buffers.insert(
            buffer,
            BufferState { parser, pending_ranges: Vec::new(), pending_timers: HashMap::new() },
        );

        self.highlight_whole_buffer(buffer, now);
        true
    }

    /// Detach: stop pending timers, forget pending ranges, drop the
    /// parser, clear spans.
    pub fn detach(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
        self.span_store.clear_all_spans(buffer);
    }

    /// Record a byte-level edit and (re)start its debounce timer. Unused
    /// positional parameters are kept to mirror the host callback's full
    /// signature even though only the new end position feeds the
    /// pending-range list.
    #[allow(clippy::too_many_arguments)]
    pub fn on_bytes(
        &mut self,
        buffer: BufferId,
        tick: u64,
        srow: u32,
        scol: u32,
        _start_byte: u64,
        _old_erow: u32,
        _old_ecol: u32,
        _old_ebytes: u64,
        new_erow: u32,
        new_ecol: u32,
        _new_ebytes: u64,
        now: Instant,
    ) {
        let Some(state) = self.buffers.get_mut(&buffer) else { return };

        let end = Position::new(srow + new_erow, new_ecol);
        state.pending_ranges.push(EditRange::new(Position::new(srow, scol), end));

        state.pending_timers.insert(tick, now + BYTE_CHANGE_DELAY);
    }

    /// A host-driven tree-change notification: cancels all pending
    /// timers and applies highlighting against the already-reparsed tree
    /// directly.
    pub fn on_changedtree(&mut self, buffer: BufferId, ranges: &[EditRange], now: Instant) {
        if !self.buffers.contains_key(&buffer) {
            return;
        }
        if let Some(state) = self.buffers.get_mut(&buffer) {
            state.pending_timers.clear();
        }

        for range in ranges {
            self.span_store.delete_spans_in(buffer, range.start, range.end);
            self.apply_range(buffer, *range, self.config.mint_on_edit, now);
        }
    }

    /// Drive pending timers and the cache-save debounce. Call this from
    /// the host's event loop (or a test, with a fake clock) — the engine
    /// itself never spawns anything.
    pub fn advance(&mut self, now: Instant) {
        let due_buffers: Vec<BufferId> = self
            .buffers
            .iter()
            .filter(|(_, state)| state.pending_timers.values().any(|deadline| *deadline <= now))
            .map(|(id, _)| *id)
            .collect();

        for buffer in due_buffers {
            if let Some(state) = self.buffers.get_mut(&buffer) {
                state.pending_timers.retain(|_, deadline| *deadline > now);
            }
            self.flush(buffer, now);
        }

        if let Err(err) = self.generator.flush_if_due(now) {
            log::debug!("semhl: cache save failed: {err}");
        }
    }

    /// Flush: pop and batch-merge pending ranges, re-parse, and apply
    /// highlighting to each merged range.
    fn flush(&mut self, buffer: BufferId, now: Instant) {
        let Some(state) = self.buffers.get_mut(&buffer) else { return };
        if state.pending_ranges.is_empty() {
            return;
        }
        let pending = std::mem::take(&mut state.pending_ranges);
        let merged = merge_ranges(pending);

        let Some(state) = self.buffers.get_mut(&buffer) else { return };
        if let Err(err) = state.parser.parse() {
            log::warn!("semhl: re-parse failed for buffer {buffer}: {err}");
            return;
        }

        for range in merged {
            self.span_store.delete_spans_in(buffer, range.start, range.end);
            self.apply_range(buffer, range, self.config.mint_on_edit, now);
        }
    }

    /// Background-change rebuild: invalidate generator state and do a
    /// full, `create_new=true` pass over every attached buffer.
    pub fn background_changed(&mut self, background: Background, now: Instant) {
        if let Err(err) = self.generator.clear_background_cache(&self.config, background) {
            log::debug!("semhl: cache invalidation failed: {err}");
        }

        let buffers: Vec<BufferId> = self.buffers.keys().copied().collect();
        for buffer in buffers {
            self.span_store.clear_all_spans(buffer);
            let Some(state) = self.buffers.get_mut(&buffer) else { continue };
            if let Err(err) = state.parser.parse() {
                log::warn!("semhl: re-parse failed for buffer {buffer} during background rebuild: {err}");
                continue;
            }
            self.highlight_whole_buffer(buffer, now);
        }
    }

    fn highlight_whole_buffer(&mut self, buffer: BufferId, now: Instant) {
        let Some(state) = self.buffers.get(&buffer) else { return };
        let identifiers = match state.parser.identifiers_in(None, None) {
            Ok(identifiers) => identifiers,
            Err(err) => {
                log::warn!("semhl: identifier query failed for buffer {buffer}: {err}");
                return;
            }
        };
        for node in identifiers {
            self.highlight_node(buffer, &node.text, node.start, node.end, true, now);
        }
    }

    /// Query identifiers in `range`'s rows and highlight each. A query
    /// failure is logged and drops only this range's pass; spans
    /// inserted by earlier ranges in the same flush remain.
    fn apply_range(&mut self, buffer: BufferId, range: EditRange, create_new: bool, now: Instant) {
        let Some(state) = self.buffers.get(&buffer) else { return };
        let row_start = range.start.row;
        let row_end_exclusive = range.end.row + 1;
        let identifiers = match state.parser.identifiers_in(Some(row_start), Some(row_end_exclusive)) {
            Ok(identifiers) => identifiers,
            Err(err) => {
                log::warn!("semhl: identifier query failed for buffer {buffer}: {err}");
                return;
            }
        };
        for node in identifiers {
            self.highlight_node(buffer, &node.text, node.start, node.end, create_new, now);
        }
    }

    /// Highlight-node policy: resolve or, if allowed, mint a color for
    /// one identifier occurrence and register its span.
    fn highlight_node(&mut self, buffer: BufferId, id_text: &str, start: Position, end: Position, create_new: bool, now: Instant) {
        self.span_store.delete_spans_in(buffer, start, end);

        let rgb = match self.generator.get_cached_color(id_text) {
            Some(rgb) => rgb,
            None if create_new => {
                let rgb = self.generator.color_generate();
                self.generator.cache_color(id_text, rgb, now);
                rgb
            }
            None => return,
        };

        let key = self.style_registry.ensure_style(rgb);
        self.span_store.add_span(buffer, start, end, &key);
    }
}

/// Batch-merge pending ranges: sort by `(srow, scol)`, then merge
/// left-to-right whenever the next range overlaps or is adjacent to the
/// current one within one row.
fn merge_ranges(mut ranges: Vec<EditRange>) -> Vec<EditRange> {
    ranges.sort_by_key(|r| (r.start.row, r.start.col));

    let mut merged = Vec::new();
    let mut iter = ranges.into_iter();
    let Some(mut current) = iter.next() else { return merged };

    for next in iter {
        let adjacent = next.start.row <= current.end.row + 1
            && next.end.row >= current.start.row.saturating_sub(1);
        if adjacent {
            if (next.end.row, next.end.col) > (current.end.row, current.end.col) {
                current.end = next.end;
            }
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);
    merged
}
