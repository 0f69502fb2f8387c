/// A row of the pages file: `page_id \t title \t is_redirect_flag`.
///
/// The redirect flag is kept verbatim so the pruner can echo the row back
/// without normalizing it.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub id: String,
    pub title: String,
    pub redirect_flag: String,
}

impl PageRecord {
    /// Parses a pages-file line. Returns `None` when the line has fewer than
    /// three fields; extra fields are dropped.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split('\t');
        let id = fields.next()?;
        let title = fields.next()?;
        let redirect_flag = fields.next()?;
        Some(Self {
            id: id.to_string(),
            title: title.to_string(),
            redirect_flag: redirect_flag.to_string(),
        })
    }

    pub fn is_redirect(&self) -> bool {
        self.redirect_flag != "0"
    }
}

/// A row of the redirects file: `source_page_id \t target_page_id`.
#[derive(Debug, Clone)]
pub struct RedirectRecord {
    pub source_id: String,
    pub target_id: String,
}

impl RedirectRecord {
    pub fn parse(line: &str) -> Option<Self> {
        let (source_id, target_id) = split_pair(line)?;
        Some(Self {
            source_id: source_id.to_string(),
            target_id: target_id.to_string(),
        })
    }
}

/// A row of the links file before resolution: the target is still a title.
#[derive(Debug, Clone)]
pub struct LinkRecord {
    pub source_id: String,
    pub target_title: String,
}

impl LinkRecord {
    pub fn parse(line: &str) -> Option<Self> {
        let (source_id, target_title) = split_pair(line)?;
        Some(Self {
            source_id: source_id.to_string(),
            target_title: target_title.to_string(),
        })
    }
}

/// Per-page link lists accumulated by the combiner. Both sides are the raw
/// pipe-delimited field from the input; either may stay empty when the page
/// appears in only one stream.
#[derive(Debug, Clone, Default)]
pub struct LinkAggregate {
    pub outgoing: String,
    pub incoming: String,
}

/// Splits a line into its first two tab-separated fields. Trailing extra
/// fields are ignored, not an error.
pub fn split_pair(line: &str) -> Option<(&str, &str)> {
    let mut fields = line.split('\t');
    let first = fields.next()?;
    let second = fields.next()?;
    Some((first, second))
}

/// Number of `|`-separated tokens in a link list field; an empty field is
/// zero, not one.
pub fn list_len(list: &str) -> u64 {
    if list.is_empty() {
        0
    } else {
        list.split('|').count() as u64
    }
}
