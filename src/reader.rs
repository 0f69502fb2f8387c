use crate::config::IO_BUF_SIZE;
use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};

/// Streams decoded lines out of a gzip-compressed dump file.
///
/// The stream is single-pass and not restartable; each pipeline opens a file
/// at most twice (once per phase) rather than seeking.
pub struct GzLineReader {
    lines: Lines<BufReader<GzDecoder<BufReader<File>>>>,
}

impl GzLineReader {
    pub fn open(path: &str) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open dump file: {}", path))?;
        let decoder = GzDecoder::new(BufReader::with_capacity(IO_BUF_SIZE, file));
        let lines = BufReader::with_capacity(IO_BUF_SIZE, decoder).lines();
        Ok(Self { lines })
    }
}

impl Iterator for GzLineReader {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        // Corrupt gzip data surfaces here as an io error; callers treat it
        // as fatal per the batch-tool error model.
        self.lines
            .next()
            .map(|r| r.context("Failed to read line from gzip stream"))
    }
}

/// Rejects paths that do not name a gzip file before any I/O happens.
pub fn require_gz(path: &str, label: &str) -> Result<()> {
    if !path.ends_with(".gz") {
        bail!("{} file must be gzipped: {}", label, path);
    }
    Ok(())
}
