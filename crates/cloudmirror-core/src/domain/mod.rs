//! Domain layer: validated types shared by the engine and all adapters.

pub mod actions;
pub mod cache;
pub mod errors;
pub mod metadata;
pub mod relpath;
pub mod report;
pub mod run;
