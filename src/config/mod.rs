//! Configuration module.
//!
//! Provides `AlignConfig` (top-level settings), `CacheConfig` for the
//! similarity cache, `AppPaths` for cross-platform config directories, and
//! TOML persistence via `AlignConfig::load` / `AlignConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AlignConfig, CacheConfig};
