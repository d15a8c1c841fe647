//! Month-to-map orchestration.
//!
//! ```text
//! history ──slice──▶ features, observed labels
//!                      │            │
//!                   predict         │
//!                      ▼            ▼
//!               predicted labels  observed labels
//!                      │            │
//!                annotate(grid)  annotate(grid)
//!                      ▼            ▼
//!                 overlay(base)  overlay(base)
//! ```
//!
//! [`pipeline::run_month`] performs one run against an [`context::AppContext`]
//! and returns either both maps or a typed [`pipeline::PipelineError`]. What
//! happens to the maps afterwards (files, HTTP responses) is up to the
//! caller.

pub mod context;
pub mod pipeline;
