//! Dropbox backend for CloudMirror
//!
//! Dropbox splits its HTTP surface across two hosts: JSON RPC endpoints on
//! `api.dropboxapi.com` and byte transfer endpoints on
//! `content.dropboxapi.com`, where request metadata travels in a
//! `Dropbox-API-Arg` header. Tree scanning uses the recursive
//! `files/list_folder` cursor protocol instead of per-folder listings.

pub mod client;
pub mod provider;

pub use client::DropboxClient;
pub use provider::DropboxProvider;
