//! Color generator: resolves or mints an `Rgb` for each identifier,
//! backed by an in-memory map and (via [`crate::cache`]) a persistent
//! one, subject to a minimum ΔE from the editor background.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use rand::RngCore;

use crate::cache::{self, CacheFile};
use crate::color::Rgb;
use crate::config::{Background, Config};
use crate::error::SemhlError;
use crate::fingerprint::Fingerprint;
use crate::lab::{clamp_lab, delta_e76, fallback_lab, generate_lab_at_distance, Lab};

const MAX_ATTEMPTS: u32 = 10;
/// Debounce before a dirty in-memory map is flushed to disk.
pub const SAVE_DEBOUNCE: Duration = Duration::from_secs(5);

pub struct ColorGenerator {
    min_delta_e: f64,
    target_delta_e: f64,
    l_min: f64,
    l_max: f64,
    background_lab: Lab,
    fingerprint: Fingerprint,
    map: HashMap<String, Rgb>,
    fallback_index: usize,
    rng: Box<dyn RngCore + Send>,
    cache_path: Option<PathBuf>,
    dirty_since: Option<Instant>,
}

impl ColorGenerator {
    /// Build a generator for the given background and settings, with no
    /// colors yet loaded. Use [`ColorGenerator::load_from_disk`] to
    /// populate the map from a matching cache file.
    pub fn new(
        config: &Config,
        background: Background,
        rng: Box<dyn RngCore + Send>,
        cache_path: Option<PathBuf>,
    ) -> Self {
        let (l_min, l_max) = config.effective_l_range(background.kind);
        let fingerprint = Fingerprint::compute(
            background.kind,
            config.effective_min_delta_e(),
            config.target_delta_e,
            l_min,
            l_max,
        );
        Self {
            min_delta_e: config.effective_min_delta_e(),
            target_delta_e: config.target_delta_e,
            l_min,
            l_max,
            background_lab: Lab::from_rgb(background.rgb),
            fingerprint,
            map: HashMap::new(),
            fallback_index: 0,
            rng,
            cache_path,
            dirty_since: None,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    /// Populate the in-memory map from the on-disk cache, if its recorded
    /// fingerprint matches.
    pub fn load_from_disk(&mut self) {
        let Some(path) = self.cache_path.as_deref() else { return };
        let cache = cache::load_cache_for(path, &self.fingerprint);
        self.map = cache.colors.into_iter().collect();
    }

    /// Pure map lookup, no generation.
    pub fn get_cached_color(&self, id: &str) -> Option<Rgb> {
        self.map.get(id).copied()
    }

    /// Pure map insert, marking the map dirty so a later
    /// [`ColorGenerator::flush_if_due`] persists it.
    pub fn cache_color(&mut self, id: &str, rgb: Rgb, now: Instant) {
        self.map.insert(id.to_string(), rgb);
        self.dirty_since.get_or_insert(now);
    }

    /// Whether the debounced save is due at `now`.
    pub fn is_save_due(&self, now: Instant) -> bool {
        matches!(self.dirty_since, Some(since) if now.duration_since(since) >= SAVE_DEBOUNCE)
    }

    /// Flush the in-memory map to disk if the debounce has elapsed.
    /// No-op (and not an error) if there's nothing dirty, or no cache
    /// path is configured.
    pub fn flush_if_due(&mut self, now: Instant) -> Result<(), SemhlError> {
        if !self.is_save_due(now) {
            return Ok(());
        }
        let Some(path) = self.cache_path.clone() else {
            self.dirty_since = None;
            return Ok(());
        };
        let cache = CacheFile {
            settings_hash: Some(self.fingerprint.as_str().to_string()),
            colors: self.map.iter().map(|(k, v)| (k.clone(), *v)).collect(),
        };
        cache::save_cache(&path, &cache)?;
        self.dirty_since = None;
        Ok(())
    }

    /// Up to `MAX_ATTEMPTS` randomized generations at `target_delta_e`,
    /// falling back to the fixed fallback palette (stepped and, if
    /// needed, nudged further away) when every attempt fails to clear
    /// `min_delta_e`.
    pub fn color_generate(&mut self) -> Rgb {
        for _ in 0..MAX_ATTEMPTS {
            let candidate = generate_lab_at_distance(
                &mut *self.rng,
                self.background_lab,
                self.target_delta_e,
                self.l_min,
                self.l_max,
            );
            if delta_e76(candidate, self.background_lab) >= self.min_delta_e {
                return candidate.to_rgb();
            }
        }

        self.fallback_index += 1;
        let mut fallback = clamp_lab(fallback_lab(self.fallback_index), self.l_min, self.l_max);
        let de = delta_e76(fallback, self.background_lab);
        if de < self.min_delta_e {
            let shift_target = self.min_delta_e - de + 5.0;
            fallback = clamp_lab(
                generate_lab_at_distance(&mut *self.rng, fallback, shift_target, self.l_min, self.l_max),
                self.l_min,
                self.l_max,
            );
        }
        fallback.to_rgb()
    }

    /// Drops the background-LAB cache, drops the in-memory map, deletes
    /// the on-disk cache file, and recomputes the fingerprint for the
    /// new background.
    pub fn clear_background_cache(&mut self, config: &Config, background: Background) -> Result<(), SemhlError> {
        let (l_min, l_max) = config.effective_l_range(background.kind);
        self.l_min = l_min;
        self.l_max = l_max;
        self.background_lab = Lab::from_rgb(background.rgb);
        self.fingerprint = Fingerprint::compute(
            background.kind,
            config.effective_min_delta_e(),
            config.target_delta_e,
            l_min,
            l_max,
        );
        self.map.clear();
        self.fallback_index = 0;
        self.dirty_since = None;
        if let Some(path) = self.cache_path.as_deref() {
            cache::clear_cache_file(path)?;
        }
        Ok(())
    }

    /// Whether two colors are closer than `threshold` in LAB space.
    pub fn is_color_collision(a: Rgb, b: Rgb, threshold: f64) -> bool {
        delta_e76(Lab::from_rgb(a), Lab::from_rgb(b)) < threshold
    }
}
