//! Integration tests for cloudmirror-dropbox
//!
//! Uses wiremock to simulate both Dropbox hosts (RPC and content) and
//! verifies recursive scanning, transfers, and deletes end to end.

mod common;

mod test_operations;
mod test_scan;
