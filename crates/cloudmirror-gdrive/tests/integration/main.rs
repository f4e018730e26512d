//! Integration tests for cloudmirror-gdrive
//!
//! Uses wiremock to simulate the Drive v3 API and verifies id-graph
//! traversal, find-or-create root resolution, multipart uploads, downloads,
//! and deletes.

mod common;

mod test_scan;
