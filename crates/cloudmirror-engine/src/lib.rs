//! Reconciliation engine
//!
//! Scans the local and remote trees into relative-path maps, diffs them by
//! existence, and applies the configured per-side actions in two phases:
//! local entries first, then the remote leftovers. Provider-agnostic; all
//! backend access goes through the `CloudProvider` port.

pub mod reconciler;
pub mod scanner;

pub use reconciler::SyncRun;
pub use scanner::scan_local;
