//! Extraction, normalization and RAG classification for UK government
//! statistical publications.
//!
//! Upstream sources publish CSV, Excel, ODS and zipped spreadsheets with
//! undocumented, release-to-release-changing layouts. The pipeline loads the
//! raw bytes into sheet-aware cell grids, locates metric values by heuristic
//! content matching, optionally derives year-over-year change from level
//! series, classifies each value against a threshold policy and emits uniform
//! metric records. Extraction failures degrade to configured published
//! headlines instead of aborting the batch.

pub mod catalog;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod record;
pub mod status;
pub mod tabular;
pub mod telemetry;
