use crate::models::PageRecord;
use crate::reader::GzLineReader;
use crate::stats::PruneStats;
use anyhow::Result;
use rustc_hash::FxHashSet;
use std::io::Write;
use tracing::{debug, info};

/// Drops pages that are flagged as redirects but have no entry in the
/// redirects file. Non-redirect pages always pass through untouched.
///
/// This only filters; it never rewrites a field, so re-running it on its own
/// output with the same redirects file is a no-op.
pub fn run_prune<W: Write>(
    pages_path: &str,
    redirects_path: &str,
    mut out: W,
) -> Result<PruneStats> {
    let mut stats = PruneStats::default();

    info!("Reading redirect sources from: {}", redirects_path);
    let mut redirect_sources: FxHashSet<String> = FxHashSet::default();
    for line in GzLineReader::open(redirects_path)? {
        let line = line?;
        // Only the source id matters here; the target field is untouched.
        let source_id = line.split('\t').next().unwrap_or("");
        redirect_sources.insert(source_id.to_string());
    }
    info!(redirects = redirect_sources.len(), "Redirect set built");

    info!("Pruning pages from: {}", pages_path);
    for line in GzLineReader::open(pages_path)? {
        let line = line?;
        // Short page lines are deliberately tolerated and dropped.
        let Some(page) = PageRecord::parse(&line) else {
            stats.skipped_short += 1;
            continue;
        };
        if !page.is_redirect() || redirect_sources.contains(&page.id) {
            writeln!(out, "{}\t{}\t{}", page.id, page.title, page.redirect_flag)?;
            stats.pages_kept += 1;
        } else {
            debug!(page_id = %page.id, "Dropping redirect page with no redirect entry");
            stats.pages_dropped += 1;
        }
    }
    out.flush()?;

    info!(
        kept = stats.pages_kept,
        dropped = stats.pages_dropped,
        skipped_short = stats.skipped_short,
        "Prune complete"
    );
    Ok(stats)
}
