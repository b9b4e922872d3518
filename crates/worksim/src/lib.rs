//! Rubric-based scoring engine for workplace simulation exercises.
//!
//! The `scoring` module holds the pure pipeline (extractors, per-task validators,
//! aggregation) together with the session bookkeeping and HTTP surface that wrap it.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
