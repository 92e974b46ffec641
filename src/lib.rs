//! Flotilla - a multi-project workspace orchestrator
//!
//! This crate provides the core library functionality for Flotilla:
//! manifest parsing and merging, dependency resolution, source-checksum
//! staleness tracking, build-environment composition, and the build driver
//! that delegates actual compilation to external build tools.

pub mod builder;
pub mod checksum;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

pub use crate::core::config::{BuildType, ConfigHandle, WorkspaceConfig};
pub use crate::core::manifest::{Manifest, ManifestError};
pub use crate::core::project::Project;
pub use crate::core::workspace::Workspace;

pub use crate::builder::{AdapterFailure, BuildTool};
pub use crate::resolver::{dependency_closure, ResolveError};
