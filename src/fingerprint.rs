//! Settings fingerprint: a pure function of the background kind and the
//! generator's numeric settings, used as the cache file's epoch. A
//! mismatch between a loaded cache's recorded fingerprint and the
//! current one discards the cache.

use std::fmt;

/// Whether the host editor's background is light or dark. Determines the
/// default lightness band when `L_min`/`L_max` aren't set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundKind {
    Light,
    Dark,
}

impl fmt::Display for BackgroundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
        }
    }
}

/// A string that identifies the settings a cache was produced under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub String);

impl Fingerprint {
    pub fn compute(
        background_kind: BackgroundKind,
        min_delta_e: f64,
        target_delta_e: f64,
        l_min: f64,
        l_max: f64,
    ) -> Self {
        Self(format!(
            "bg={background_kind},de={min_delta_e}/{target_delta_e},L={l_min}/{l_max}"
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
