use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use wikigraph::config::IO_BUF_SIZE;
use wikigraph::reader::require_gz;
use wikigraph::{combine, prune, resolve};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "wikigraph")]
#[command(about = "Normalize Wikipedia link-graph dump files into ID-resolved TSV streams")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge outgoing and incoming link lists into one record per page
    Combine(CombineArgs),
    /// Drop redirect-flagged pages with no entry in the redirects file
    Prune(PruneArgs),
    /// Replace link target titles with page IDs, following redirects one hop
    Resolve(ResolveArgs),
}

#[derive(Args)]
struct CombineArgs {
    /// Gzipped outgoing links file (page_id <TAB> pipe-delimited target IDs)
    outgoing_links_file: String,

    /// Gzipped incoming links file (page_id <TAB> pipe-delimited source IDs)
    incoming_links_file: String,
}

#[derive(Args)]
struct PruneArgs {
    /// Gzipped pages file (page_id <TAB> title <TAB> is_redirect)
    pages_file: String,

    /// Gzipped redirects file (source_id <TAB> target_id)
    redirects_file: String,
}

#[derive(Args)]
struct ResolveArgs {
    /// Gzipped pages file (page_id <TAB> title <TAB> is_redirect)
    pages_file: String,

    /// Gzipped redirects file (source_id <TAB> target_id)
    redirects_file: String,

    /// Gzipped links file (source_id <TAB> target_title)
    links_file: String,
}

fn stdout_writer() -> BufWriter<io::StdoutLock<'static>> {
    BufWriter::with_capacity(IO_BUF_SIZE, io::stdout().lock())
}

fn run_combine(args: CombineArgs) -> Result<()> {
    require_gz(&args.outgoing_links_file, "Outgoing links")?;
    require_gz(&args.incoming_links_file, "Incoming links")?;

    let start = Instant::now();
    let mut out = stdout_writer();
    let stats = combine::run_combine(
        &args.outgoing_links_file,
        &args.incoming_links_file,
        &mut out,
    )?;
    out.flush()?;
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        pages = stats.pages_emitted,
        skipped_incoming = stats.skipped_incoming,
        "Combine finished"
    );
    Ok(())
}

fn run_prune(args: PruneArgs) -> Result<()> {
    require_gz(&args.pages_file, "Pages")?;
    require_gz(&args.redirects_file, "Redirects")?;

    let start = Instant::now();
    let mut out = stdout_writer();
    let stats = prune::run_prune(&args.pages_file, &args.redirects_file, &mut out)?;
    out.flush()?;
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        kept = stats.pages_kept,
        dropped = stats.pages_dropped,
        "Prune finished"
    );
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    require_gz(&args.pages_file, "Pages")?;
    require_gz(&args.redirects_file, "Redirects")?;
    require_gz(&args.links_file, "Links")?;

    let start = Instant::now();
    let mut out = stdout_writer();
    let stats = resolve::run_resolve(
        &args.pages_file,
        &args.redirects_file,
        &args.links_file,
        &mut out,
    )?;
    out.flush()?;
    info!(
        duration_secs = start.elapsed().as_secs_f64(),
        emitted = stats.links_emitted,
        dropped = stats.dropped(),
        "Resolve finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // stdout carries the data stream, so all logging goes to stderr.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    let result = match cli.command {
        Commands::Combine(args) => run_combine(args),
        Commands::Prune(args) => run_prune(args),
        Commands::Resolve(args) => run_resolve(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
