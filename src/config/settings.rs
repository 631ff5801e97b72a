//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//!
//! Matching-stage thresholds are deliberately NOT configurable — they are
//! part of the scoring contract, tuned together, and live as constants next
//! to the code they gate. Only deployment-level knobs belong here.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// CacheConfig
// ---------------------------------------------------------------------------

/// Settings for the similarity memoization cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache capacity in scored pairs; exceeding it triggers eviction.
    pub max_entries: usize,
    /// How many of the oldest entries one eviction removes.
    pub evict_batch: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 3000,
            evict_batch: 500,
        }
    }
}

// ---------------------------------------------------------------------------
// AlignConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use viet_align::config::AlignConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AlignConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Accuracy level the booster must reach for its output to replace the
    /// matched text (also its internal retry target).
    pub target_score: f64,
    /// Minimum tone-stripped word overlap with the donor sentence before
    /// the booster runs at all.
    pub min_boost_overlap: f64,
    /// Similarity cache settings.
    pub cache: CacheConfig,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            target_score: 0.80,
            min_boost_overlap: 0.25,
            cache: CacheConfig::default(),
        }
    }
}

impl AlignConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AlignConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AlignConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AlignConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AlignConfig::load_from(&path).expect("load");

        assert_eq!(original.target_score, loaded.target_score);
        assert_eq!(original.min_boost_overlap, loaded.min_boost_overlap);
        assert_eq!(original.cache, loaded.cache);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AlignConfig::load_from(&path).expect("should not error");
        let default = AlignConfig::default();

        assert_eq!(config.target_score, default.target_score);
        assert_eq!(config.cache, default.cache);
    }

    #[test]
    fn default_values() {
        let cfg = AlignConfig::default();

        assert_eq!(cfg.target_score, 0.80);
        assert_eq!(cfg.min_boost_overlap, 0.25);
        assert_eq!(cfg.cache.max_entries, 3000);
        assert_eq!(cfg.cache.evict_batch, 500);
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AlignConfig::default();
        cfg.target_score = 0.9;
        cfg.min_boost_overlap = 0.5;
        cfg.cache.max_entries = 128;
        cfg.cache.evict_batch = 16;

        cfg.save_to(&path).expect("save");
        let loaded = AlignConfig::load_from(&path).expect("load");

        assert_eq!(loaded.target_score, 0.9);
        assert_eq!(loaded.min_boost_overlap, 0.5);
        assert_eq!(loaded.cache.max_entries, 128);
        assert_eq!(loaded.cache.evict_batch, 16);
    }
}
