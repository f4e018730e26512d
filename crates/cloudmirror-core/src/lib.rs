//! Core domain logic for CloudMirror
//!
//! This crate defines the provider-agnostic heart of the reconciliation
//! engine: validated domain types (relative paths, file metadata, tree maps),
//! the per-run configuration and result types, the `CloudProvider` port that
//! every backend adapter implements, and the ambient seams (logging sink,
//! retry policy, cancellation) the engine is wired with.
//!
//! No I/O happens here except the default breadth-first remote scan, which is
//! expressed entirely in terms of the port's own methods.

pub mod config;
pub mod domain;
pub mod ports;
pub mod retry;

pub use domain::actions::{LocalAction, RemoteAction};
pub use domain::cache::PathIdCache;
pub use domain::errors::SyncError;
pub use domain::metadata::{FileMetadata, TreeMap};
pub use domain::relpath::{join_under, RelPath};
pub use domain::report::{SyncReport, SyncStatus};
pub use domain::run::RunConfig;
