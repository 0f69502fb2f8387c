use crate::models::{list_len, split_pair, LinkAggregate};
use crate::reader::GzLineReader;
use crate::stats::CombineStats;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use std::io::Write;
use tracing::{info, warn};

/// Merges the per-page outgoing and incoming link files into one record per
/// page: `page_id \t out_count \t in_count \t out_list \t in_list`.
///
/// Output order is first appearance: every page from the outgoing file in
/// file order, then pages that only occur in the incoming file. A page id
/// repeated within a stream keeps its original position but the repeated
/// list field overwrites the earlier one (last write wins).
pub fn run_combine<W: Write>(
    outgoing_path: &str,
    incoming_path: &str,
    mut out: W,
) -> Result<CombineStats> {
    let mut stats = CombineStats::default();
    let mut links: FxHashMap<String, LinkAggregate> = FxHashMap::default();
    let mut order: Vec<String> = Vec::new();

    info!("Reading outgoing links from: {}", outgoing_path);
    for line in GzLineReader::open(outgoing_path)? {
        let line = line?;
        // A short outgoing line is fatal; the outgoing file is produced
        // upstream and a missing field means the dump is broken.
        let (page_id, target_ids) = split_pair(&line)
            .with_context(|| format!("Malformed outgoing links line: {:?}", line))?;
        let entry = links.entry(page_id.to_string()).or_insert_with(|| {
            order.push(page_id.to_string());
            LinkAggregate::default()
        });
        entry.outgoing = target_ids.to_string();
    }

    info!("Reading incoming links from: {}", incoming_path);
    for line in GzLineReader::open(incoming_path)? {
        let line = line?;
        let Some((page_id, source_ids)) = split_pair(&line) else {
            warn!(line = %line, "Skipping malformed incoming links line");
            stats.skipped_incoming += 1;
            continue;
        };
        let entry = links.entry(page_id.to_string()).or_insert_with(|| {
            order.push(page_id.to_string());
            LinkAggregate::default()
        });
        entry.incoming = source_ids.to_string();
    }

    for page_id in &order {
        let agg = &links[page_id];
        writeln!(
            out,
            "{}\t{}\t{}\t{}\t{}",
            page_id,
            list_len(&agg.outgoing),
            list_len(&agg.incoming),
            agg.outgoing,
            agg.incoming
        )?;
        stats.pages_emitted += 1;
    }
    out.flush()?;

    info!(
        pages = stats.pages_emitted,
        skipped_incoming = stats.skipped_incoming,
        "Combine complete"
    );
    Ok(stats)
}
