//! Dependency version resolution against a package registry
//!
//! This module provides:
//! - Tolerant version ordering and stability checks
//! - An npm-compatible registry client
//! - A resolver that caches the stable version list for one run

pub mod npm;
pub mod resolver;
pub mod versions;

pub use npm::{NpmRegistry, VersionSource, DEFAULT_REGISTRY_URL};
pub use resolver::{
    VersionChooser, VersionOption, VersionResolution, VersionResolver, DEFAULT_VERSION_LIMIT,
    LATEST,
};
pub use versions::{compare_semver_desc, is_stable, stable_sorted};
