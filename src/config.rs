//! The consumer-facing configuration struct.

use std::collections::HashSet;

use crate::color::Rgb;
use crate::fingerprint::BackgroundKind;

/// Default `max_file_size` in bytes.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 102_400;
/// Default minimum ΔE a generated color must clear.
pub const DEFAULT_MIN_DELTA_E: f64 = 5.0;
/// Default ΔE the generator aims for.
pub const DEFAULT_TARGET_DELTA_E: f64 = 15.0;

/// The editor's background: its light/dark classification plus the
/// resolved RGB used as the ΔE reference point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Background {
    pub kind: BackgroundKind,
    pub rgb: Rgb,
}

impl Background {
    pub fn dark(rgb: Rgb) -> Self {
        Self { kind: BackgroundKind::Dark, rgb }
    }

    pub fn light(rgb: Rgb) -> Self {
        Self { kind: BackgroundKind::Light, rgb }
    }

    /// The default when the host reports no resolvable background: pure
    /// black for dark, pure white for light.
    pub fn default_for(kind: BackgroundKind) -> Self {
        match kind {
            BackgroundKind::Dark => Self::dark(Rgb::new(0, 0, 0)),
            BackgroundKind::Light => Self::light(Rgb::new(255, 255, 255)),
        }
    }
}

/// Engine configuration.
pub struct Config {
    /// Filetypes the engine auto-attaches to. Empty means no auto-attach.
    pub filetypes: HashSet<String>,
    /// Buffers backed by a file larger than this are skipped, unless
    /// `disable` is set.
    pub max_file_size: u64,
    /// Custom skip predicate; when present, replaces the size check.
    pub disable: Option<Box<dyn Fn(u64) -> bool + Send + Sync>>,
    pub min_delta_e: f64,
    pub target_delta_e: f64,
    /// Absolute lightness bounds. `None` derives the range from the
    /// background.
    pub l_min: Option<f64>,
    pub l_max: Option<f64>,
    /// Whether newly-seen identifiers get minted a color on the
    /// incremental (`on_bytes`/`on_changedtree`) path, rather than only on
    /// initial load / background rebuild. Fixed to `false` by default;
    /// exposed as a switch for hosts that want eager minting.
    pub mint_on_edit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            filetypes: HashSet::new(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            disable: None,
            min_delta_e: DEFAULT_MIN_DELTA_E,
            target_delta_e: DEFAULT_TARGET_DELTA_E,
            l_min: None,
            l_max: None,
            mint_on_edit: false,
        }
    }
}

impl Config {
    /// Resolve `min_delta_e`, clamping nonsensical configuration rather
    /// than erroring: a value at or below zero accepts any color.
    pub fn effective_min_delta_e(&self) -> f64 {
        self.min_delta_e.max(0.0)
    }

    /// Resolve the `[L_min, L_max]` band, deriving it from the background
    /// when unset and clamping explicit values into `[0, 100]`.
    pub fn effective_l_range(&self, background_kind: BackgroundKind) -> (f64, f64) {
        let (default_min, default_max) = match background_kind {
            BackgroundKind::Dark => (50.0, 100.0),
            BackgroundKind::Light => (0.0, 50.0),
        };
        let l_min = self.l_min.unwrap_or(default_min).clamp(0.0, 100.0);
        let l_max = self.l_max.unwrap_or(default_max).clamp(0.0, 100.0);
        match l_min <= l_max {
            true => (l_min, l_max),
            false => (l_max, l_min),
        }
    }

    /// Whether a buffer should be skipped, given the on-disk size of the
    /// file backing it.
    pub fn is_disabled(&self, file_size: u64) -> bool {
        match &self.disable {
            Some(predicate) => predicate(file_size),
            None => file_size > self.max_file_size,
        }
    }
}
