//! OneDrive backend for CloudMirror
//!
//! Talks to the Microsoft Graph API v1.0: path-based addressing under
//! `/me/drive/root:`, id-based item operations, and `@odata.nextLink`
//! pagination for folder listings.

pub mod client;
pub mod provider;

pub use client::GraphClient;
pub use provider::OneDriveProvider;
