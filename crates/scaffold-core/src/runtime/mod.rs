//! Package manager detection and command execution
//!
//! This module provides:
//! - Package manager detection (npm, pnpm, yarn, bun)
//! - A command runner for the install and dev-server steps

pub mod package_manager;
pub mod runner;

pub use package_manager::{CommandSpec, OutputMode, PackageManager};
pub use runner::{CommandRunner, ProcessRunner};
