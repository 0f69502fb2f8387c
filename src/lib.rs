//! Wikigraph: batch pipelines for Wikipedia link-graph dump files
//!
//! This crate provides three independent one-shot transforms over the
//! tab-separated, gzip-compressed intermediate files of a Wikipedia link
//! graph build. Each one materializes a lookup table from one or more
//! reference files, then streams a primary file against it line by line,
//! writing TSV to stdout:
//!
//! 1. **Combine** -- Merge the per-page outgoing and incoming link lists into
//!    a single record per page, with counts
//! 2. **Prune** -- Drop pages flagged as redirects that have no entry in the
//!    redirects file
//! 3. **Resolve** -- Rewrite link targets from titles to page IDs, following
//!    redirects one hop on both ends and dropping dangling links
//!
//! # Architecture
//!
//! Every pipeline is two strictly sequential phases: a loader that fully
//! materializes its in-memory mapping(s), then a single forward streaming
//! pass over the primary file that emits at most one output line per input
//! line. There are no intermediate files and no concurrency; memory for the
//! lookup tables (tens of millions of entries on a full dump) is the binding
//! resource, which is why the maps are FxHashMap and the allocator is
//! mimalloc.
//!
//! Unresolvable records (a link to a title with no page, a redirect with no
//! target page) are dropped with a diagnostic, never a hard error. Malformed
//! lines are recovered where the upstream dump is known to be noisy and
//! fatal where it is not. Corrupt gzip data or missing files abort the run.
//!
//! # Key Modules
//!
//! - [`reader`] -- Streaming line decoding with gzip decompression
//! - [`combine`] -- Outgoing/incoming link list merging
//! - [`prune`] -- Redirect-aware page filtering
//! - [`resolve`] -- Title-to-ID link resolution with redirect following
//! - [`models`] -- Record types (PageRecord, RedirectRecord, LinkRecord)
//! - [`stats`] -- Per-pipeline counters
//! - [`config`] -- Buffer size and progress constants
//!
//! # Example Usage
//!
//! ```bash
//! wikigraph combine outgoing_links.tsv.gz incoming_links.tsv.gz > links.tsv
//! wikigraph prune pages.tsv.gz redirects.tsv.gz > pages_pruned.tsv
//! wikigraph resolve pages.tsv.gz redirects.tsv.gz links.tsv.gz > resolved.tsv
//! ```

pub mod combine;
pub mod config;
pub mod models;
pub mod prune;
pub mod reader;
pub mod resolve;
pub mod stats;
