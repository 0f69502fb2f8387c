/// Progress update interval (tick every N lines)
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Buffer size for gzip readers and the stdout writer
pub const IO_BUF_SIZE: usize = 128 * 1024;
