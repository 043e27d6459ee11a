//! Library side of the `fieldcheck` binary: configuration, logging and the
//! per-input validation pipeline.

pub mod config;
pub mod logging;
pub mod pipeline;
