//! Persistent identifier→color cache: a single JSON file under the
//! host's user cache directory, loaded/saved as a whole, invalidated by
//! a settings fingerprint, written atomically via a sibling temp file +
//! rename.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::error::SemhlError;
use crate::fingerprint::Fingerprint;

/// On-disk shape: `{ settings_hash, colors: { id -> "#RRGGBB" } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheFile {
    pub settings_hash: Option<String>,
    pub colors: BTreeMap<String, Rgb>,
}

/// The `<user_cache>/semhl/color_cache.json` path, or `None` if the host
/// platform exposes no cache directory.
pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("semhl").join("color_cache.json"))
}

/// Load the cache file. Absent, unreadable, or unparseable contents all
/// resolve to an empty value — this never fails loudly.
pub fn load_cache(path: &Path) -> CacheFile {
    match fs::read_to_string(path) {
        Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
            log::debug!("semhl: cache file {} failed to parse: {err}", path.display());
            CacheFile::default()
        }),
        Err(err) => {
            log::debug!("semhl: cache file {} unreadable: {err}", path.display());
            CacheFile::default()
        }
    }
}

/// Load the cache only if its recorded fingerprint matches `fingerprint`;
/// otherwise behave as if the file were absent.
pub fn load_cache_for(path: &Path, fingerprint: &Fingerprint) -> CacheFile {
    let cache = load_cache(path);
    match cache.settings_hash.as_deref() == Some(fingerprint.as_str()) {
        true => cache,
        false => CacheFile::default(),
    }
}

/// Atomically persist the cache: write to a sibling temp file, `sync`,
/// then rename over the target. Creates parent directories as needed. Any
/// I/O error is returned to the caller, who is expected to log and
/// otherwise ignore it.
pub fn save_cache(path: &Path, cache: &CacheFile) -> Result<(), SemhlError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|source| SemhlError::CacheWrite {
        path: Arc::from(dir.to_string_lossy().as_ref()),
        source,
    })?;

    let json = serde_json::to_string_pretty(cache)?;

    let mut temp_file = tempfile::NamedTempFile::new_in(dir).map_err(|source| SemhlError::CacheWrite {
        path: Arc::from(dir.to_string_lossy().as_ref()),
        source,
    })?;
    {
        use std::io::Write;
        temp_file.write_all(json.as_bytes()).map_err(|source| SemhlError::CacheWrite {
            path: Arc::from(path.to_string_lossy().as_ref()),
            source,
        })?;
        temp_file.flush().map_err(|source| SemhlError::CacheWrite {
            path: Arc::from(path.to_string_lossy().as_ref()),
            source,
        })?;
    }
    temp_file.as_file().sync_all().map_err(|source| SemhlError::CacheWrite {
        path: Arc::from(path.to_string_lossy().as_ref()),
        source,
    })?;
    temp_file.persist(path).map_err(|err| SemhlError::CacheWrite {
        path: Arc::from(path.to_string_lossy().as_ref()),
        source: err.error,
    })?;

    Ok(())
}

/// Delete the cache file if present; absence is not an error.
pub fn clear_cache_file(path: &Path) -> Result<(), SemhlError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(SemhlError::CacheWrite {
            path: Arc::from(path.to_string_lossy().as_ref()),
            source,
        }),
    }
}
