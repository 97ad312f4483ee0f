//! Parsing and liveness pipeline for ad/tracking block-lists.
//!
//! Stages, leaf first:
//! 1. [`parser`] extracts at most one domain from a raw hosts-file line.
//! 2. [`aggregator`] applies the parser to files and directories and
//!    deduplicates the result.
//! 3. [`prober`] checks DNS and/or HTTP liveness of every domain under a
//!    bounded, cancellable fan-out.
//! 4. [`filter`] reduces probe results to the domains judged alive.
//!
//! [`catalog`], [`fetcher`] and [`exporter`] cover the edges of a run:
//! reading the source list, downloading it, and writing the final set.
//! [`pipeline`] wires the stages into one batch.

pub mod aggregator;
pub mod catalog;
pub mod exporter;
pub mod fetcher;
pub mod filter;
pub mod parser;
pub mod pipeline;
pub mod prober;
