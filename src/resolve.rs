use crate::config::PROGRESS_INTERVAL;
use crate::models::split_pair;
use crate::reader::GzLineReader;
use crate::stats::ResolveStats;
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rustc_hash::{FxHashMap, FxHashSet};
use std::io::Write;
use tracing::{debug, info, warn};

/// Lookup tables for the link resolution pass, fully materialized before any
/// link line is read.
pub struct LinkIndex {
    page_ids: FxHashSet<String>,
    title_to_id: FxHashMap<String, String>,
    redirect_of: FxHashMap<String, String>,
}

impl LinkIndex {
    /// Builds the page-id set, title-to-id mapping, and redirect mapping by
    /// streaming the pages and redirects files once each.
    ///
    /// Duplicate titles and duplicate redirect sources overwrite earlier
    /// entries (last write wins); that matches the upstream dump tooling and
    /// is relied on rather than treated as an error.
    pub fn build(pages_path: &str, redirects_path: &str) -> Result<Self> {
        let mut page_ids = FxHashSet::default();
        let mut title_to_id = FxHashMap::default();
        let mut redirect_of = FxHashMap::default();
        let pb = ProgressBar::new_spinner();

        info!("Parsing pages file: {}", pages_path);
        let mut line_count: u64 = 0;
        for line in GzLineReader::open(pages_path)? {
            let line = line?;
            let (page_id, title) =
                split_pair(&line).with_context(|| format!("Malformed pages line: {:?}", line))?;
            page_ids.insert(page_id.to_string());
            title_to_id.insert(title.to_string(), page_id.to_string());
            line_count += 1;
            if line_count % PROGRESS_INTERVAL == 0 {
                pb.tick();
            }
        }

        info!("Parsing redirects file: {}", redirects_path);
        for line in GzLineReader::open(redirects_path)? {
            let line = line?;
            let (source_id, target_id) = split_pair(&line)
                .with_context(|| format!("Malformed redirects line: {:?}", line))?;
            redirect_of.insert(source_id.to_string(), target_id.to_string());
            line_count += 1;
            if line_count % PROGRESS_INTERVAL == 0 {
                pb.tick();
            }
        }

        pb.finish_and_clear();

        info!(
            pages = page_ids.len(),
            titles = title_to_id.len(),
            redirects = redirect_of.len(),
            "Link index built successfully"
        );

        Ok(Self {
            page_ids,
            title_to_id,
            redirect_of,
        })
    }

    pub fn page_exists(&self, page_id: &str) -> bool {
        self.page_ids.contains(page_id)
    }

    pub fn id_for_title(&self, title: &str) -> Option<&str> {
        self.title_to_id.get(title).map(String::as_str)
    }

    /// Follows at most one redirect hop. Chains deeper than one hop are not
    /// followed; the dump is expected to be pre-flattened, and a single hop
    /// keeps the streaming pass O(1) per line.
    pub fn follow_redirect<'a>(&'a self, page_id: &'a str) -> &'a str {
        self.redirect_of
            .get(page_id)
            .map(String::as_str)
            .unwrap_or(page_id)
    }
}

/// Rewrites a links file from `source_id \t target_title` to
/// `source_id \t target_id`, applying one-hop redirect resolution on both
/// sides and dropping links that cannot be resolved.
pub fn run_resolve<W: Write>(
    pages_path: &str,
    redirects_path: &str,
    links_path: &str,
    out: W,
) -> Result<ResolveStats> {
    let index = LinkIndex::build(pages_path, redirects_path)?;
    resolve_links(&index, GzLineReader::open(links_path)?, out)
}

/// The streaming pass, split out so tests can drive it with a hand-built
/// index.
///
/// Per link the steps run in a fixed order: source existence check, source
/// redirect hop, title lookup, self-link check, target redirect hop. The
/// self-link check intentionally compares the resolved source against the
/// target id *before* the target's own redirect hop; resolving the target
/// first would change which links are treated as self-links, so the order is
/// load-bearing.
fn resolve_links<W: Write>(
    index: &LinkIndex,
    links: impl Iterator<Item = Result<String>>,
    mut out: W,
) -> Result<ResolveStats> {
    let mut stats = ResolveStats::default();

    info!("Resolving links file");
    for line in links {
        let line = line?;
        let Some((source_id, target_title)) = split_pair(&line) else {
            warn!(line = %line, "Skipping malformed links line");
            stats.skipped_malformed += 1;
            continue;
        };

        if !index.page_exists(source_id) {
            debug!(source_id, "Link source page does not exist");
            stats.missing_sources += 1;
            continue;
        }
        let resolved_source = index.follow_redirect(source_id);

        let Some(target_id) = index.id_for_title(target_title) else {
            debug!(target_title, "Link target title has no page");
            stats.missing_targets += 1;
            continue;
        };
        if resolved_source == target_id {
            stats.self_links += 1;
            continue;
        }
        let resolved_target = index.follow_redirect(target_id);

        writeln!(out, "{}\t{}", resolved_source, resolved_target)?;
        stats.links_emitted += 1;
    }
    out.flush()?;

    info!(
        emitted = stats.links_emitted,
        dropped = stats.dropped(),
        missing_sources = stats.missing_sources,
        missing_targets = stats.missing_targets,
        self_links = stats.self_links,
        "Resolve complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_index(
        pages: Vec<(&str, &str)>,
        redirects: Vec<(&str, &str)>,
    ) -> LinkIndex {
        LinkIndex {
            page_ids: pages.iter().map(|(id, _)| id.to_string()).collect(),
            title_to_id: pages
                .into_iter()
                .map(|(id, title)| (title.to_string(), id.to_string()))
                .collect(),
            redirect_of: redirects
                .into_iter()
                .map(|(s, t)| (s.to_string(), t.to_string()))
                .collect(),
        }
    }

    fn resolve_all(index: &LinkIndex, links: &[&str]) -> (String, ResolveStats) {
        let mut out = Vec::new();
        let stats = resolve_links(
            index,
            links.iter().map(|l| Ok(l.to_string())),
            &mut out,
        )
        .unwrap();
        (String::from_utf8(out).unwrap(), stats)
    }

    #[test]
    fn resolves_title_to_id() {
        let index = make_index(vec![("1", "A"), ("2", "B")], vec![]);
        let (out, stats) = resolve_all(&index, &["1\tB"]);
        assert_eq!(out, "1\t2\n");
        assert_eq!(stats.links_emitted, 1);
    }

    #[test]
    fn resolves_source_and_target_redirects() {
        // Source 1 redirects to 2, title "C" names page 3.
        let index = make_index(
            vec![("1", "A"), ("2", "B"), ("3", "C")],
            vec![("1", "2")],
        );
        let (out, _) = resolve_all(&index, &["1\tC"]);
        assert_eq!(out, "2\t3\n");
    }

    #[test]
    fn follows_only_one_redirect_hop() {
        // 1 -> 2 -> 3 is a two-hop chain; only the first hop applies.
        let index = make_index(
            vec![("1", "A"), ("2", "B"), ("3", "C"), ("4", "D")],
            vec![("1", "2"), ("2", "3")],
        );
        let (out, _) = resolve_all(&index, &["1\tD"]);
        assert_eq!(out, "2\t4\n");
    }

    #[test]
    fn drops_link_with_unknown_source() {
        let index = make_index(vec![("1", "A")], vec![]);
        let (out, stats) = resolve_all(&index, &["99\tA"]);
        assert!(out.is_empty());
        assert_eq!(stats.missing_sources, 1);
    }

    #[test]
    fn drops_link_with_unknown_target_title() {
        let index = make_index(vec![("1", "A")], vec![]);
        let (out, stats) = resolve_all(&index, &["1\tZ"]);
        assert!(out.is_empty());
        assert_eq!(stats.missing_targets, 1);
    }

    #[test]
    fn drops_self_link_after_source_resolution() {
        // Source 1 resolves to 2; the link targets title "B" which is page 2.
        let index = make_index(vec![("1", "A"), ("2", "B")], vec![("1", "2")]);
        let (out, stats) = resolve_all(&index, &["1\tB"]);
        assert!(out.is_empty());
        assert_eq!(stats.self_links, 1);
    }

    #[test]
    fn self_link_check_precedes_target_redirect() {
        // Target title "B" names page 2, which redirects to 1. The check
        // compares against 2 (pre-hop), so source 1 vs target 2 is not a
        // self-link even though both resolve to 1 in the end.
        let index = make_index(vec![("1", "A"), ("2", "B")], vec![("2", "1")]);
        let (out, stats) = resolve_all(&index, &["1\tB"]);
        assert_eq!(out, "1\t1\n");
        assert_eq!(stats.self_links, 0);
    }

    #[test]
    fn skips_malformed_link_line() {
        let index = make_index(vec![("1", "A")], vec![]);
        let (out, stats) = resolve_all(&index, &["no-tab-here", "1\tA"]);
        assert!(out.is_empty());
        assert_eq!(stats.skipped_malformed, 1);
        // "1\tA" is a self-link without redirects (source 1, title A -> 1)
        assert_eq!(stats.self_links, 1);
    }

    #[test]
    fn source_resolution_is_stable_across_repeats() {
        let index = make_index(
            vec![("1", "A"), ("2", "B"), ("3", "C"), ("4", "D")],
            vec![("1", "2")],
        );
        let (out, _) = resolve_all(&index, &["1\tC", "1\tD", "1\tC"]);
        assert_eq!(out, "2\t3\n2\t4\n2\t3\n");
    }

    #[test]
    fn duplicate_title_last_write_wins() {
        // Two pages share a title; the later pages line owns the lookup.
        let index = make_index(vec![("1", "A"), ("2", "X"), ("3", "X")], vec![]);
        let (out, _) = resolve_all(&index, &["1\tX"]);
        assert_eq!(out, "1\t3\n");
    }

    #[test]
    fn self_redirect_source_keeps_its_id() {
        let index = make_index(vec![("1", "A"), ("2", "B")], vec![("1", "1")]);
        let (out, _) = resolve_all(&index, &["1\tB"]);
        assert_eq!(out, "1\t2\n");
    }
}
