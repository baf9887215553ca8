//! # azy_core
//!
//! Core request pipeline for Azy IA.
//!
//! A single request flows through four stages:
//!
//! 1. [`intake`]: normalize a transport payload into a [`request::ChatRequest`]
//! 2. [`policy`]: reject messages matching the denylist
//! 3. [`pipeline`]: try the configured [`responders`] in priority order
//! 4. the caller formats the resulting [`responders::Reply`] or [`PipelineError`]

pub mod config;
pub mod intake;
pub mod knowledge;
pub mod language;
pub mod migrate;
pub mod pipeline;
pub mod policy;
pub mod request;
pub mod responders;

pub use pipeline::{Pipeline, PipelineError};

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
