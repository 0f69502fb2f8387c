//! Per-pipeline counters. The pipelines are strictly single-threaded, so
//! these are plain integers rather than atomics.

/// Statistics collected while combining the outgoing and incoming link files
#[derive(Debug, Default)]
pub struct CombineStats {
    pub pages_emitted: u64,
    pub skipped_incoming: u64,
}

/// Statistics collected while pruning the pages file
#[derive(Debug, Default)]
pub struct PruneStats {
    pub pages_kept: u64,
    pub pages_dropped: u64,
    pub skipped_short: u64,
}

/// Statistics collected while resolving titles and redirects in the links file
#[derive(Debug, Default)]
pub struct ResolveStats {
    pub links_emitted: u64,
    pub missing_sources: u64,
    pub missing_targets: u64,
    pub self_links: u64,
    pub skipped_malformed: u64,
}

impl ResolveStats {
    /// Total input links that produced no output line.
    pub fn dropped(&self) -> u64 {
        self.missing_sources + self.missing_targets + self.self_links + self.skipped_malformed
    }
}
