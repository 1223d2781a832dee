//! # Chunklens — Chunk Corpus Analysis Utilities
//!
//! Read-only analysis tools for a corpus of code chunks produced by an
//! upstream chunking pipeline. Each tool loads one corpus file, computes,
//! prints an indented JSON report to stdout, and exits.
//!
//! ## Architecture
//!
//! - **[`corpus`]** — Chunk data model and corpus loading (JSON / JSON Lines)
//! - **[`config`]** — Heuristic thresholds with JSON overrides
//! - **[`sizes`]** — Token-count statistics, histogram, outliers, recommendations
//! - **[`relations`]** — Directed relation graph: global summary and
//!   neighborhood exploration with all shortest paths
//!
//! Binaries: `chunk-sizes <chunks.json>` and
//! `chunk-relations <chunks.json> [chunk_id] [--depth N]`.

pub mod config;
pub mod corpus;
pub mod relations;
pub mod sizes;
