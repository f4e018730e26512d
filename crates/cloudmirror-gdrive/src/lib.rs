//! Google Drive backend for CloudMirror
//!
//! Drive v3 has no path addressing: folders form an id graph and children
//! are found with `'{parentId}' in parents` queries, so path resolution
//! walks the tree segment by segment through the id cache. Uploads use the
//! `uploadType=multipart` endpoint with a `multipart/related` body.

pub mod client;
pub mod provider;

pub use client::DriveClient;
pub use provider::GDriveProvider;
