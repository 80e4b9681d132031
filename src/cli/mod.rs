//! # CLI Module
//!
//! Command-line front end: lists a directory, runs a session and shows
//! the duplicate pairs.
//!
//! ## Usage
//! ```bash
//! # One pass with every algorithm
//! image-dedup scan ~/Pictures/inbox
//!
//! # Only trust exact and perceptual matches, JSON output
//! image-dedup scan ~/Pictures/inbox --algorithms exact,perceptual --output json
//!
//! # Pre-exempt known false positives
//! image-dedup scan ~/Pictures/inbox --skip ~/Pictures/inbox/logo-dark.png
//!
//! # Walk through pairs, skipping false positives as you go
//! image-dedup review ~/Pictures/inbox
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Key, Term};
use fingerprint_dedup::core::fingerprint::Algorithm;
use fingerprint_dedup::core::report::{DisplayPair, Report};
use fingerprint_dedup::core::session::{Session, SessionConfig};
use fingerprint_dedup::error::Result;
use fingerprint_dedup::events::{
    Event, EventChannel, EventReceiver, FingerprintEvent, ScanEvent, SessionEvent,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

/// Fingerprint Dedup - find duplicate images by exact fingerprint collisions
#[derive(Parser, Debug)]
#[command(name = "image-dedup")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one pass over a directory and print the duplicates
    Scan {
        #[command(flatten)]
        common: CommonArgs,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,

        /// Images to exempt from the report (repeatable)
        #[arg(long = "skip", value_name = "PATH")]
        skips: Vec<PathBuf>,
    },

    /// Step through duplicate pairs and skip false positives
    Review {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(clap::Args, Debug)]
struct CommonArgs {
    /// Directory to check (not searched recursively)
    directory: PathBuf,

    /// Algorithms to enable, comma separated
    #[arg(
        short,
        long,
        value_delimiter = ',',
        default_value = "exact,perceptual,blur,edge,sharpen,gray-blur"
    )]
    algorithms: Vec<AlgorithmArg>,

    /// Include hidden files
    #[arg(long)]
    include_hidden: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    /// SHA-256 of the file bytes
    Exact,
    /// DCT perceptual hash
    Perceptual,
    /// Box-averaged colour grid
    Blur,
    /// Horizontal gradient grid
    Edge,
    /// Sharpened colour grid
    Sharpen,
    /// Box-averaged grayscale grid
    GrayBlur,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Exact => Algorithm::Exact,
            AlgorithmArg::Perceptual => Algorithm::Perceptual,
            AlgorithmArg::Blur => Algorithm::Blur,
            AlgorithmArg::Edge => Algorithm::Edge,
            AlgorithmArg::Sharpen => Algorithm::Sharpen,
            AlgorithmArg::GrayBlur => Algorithm::GrayBlur,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
    /// Duplicate paths only, one per line
    Minimal,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            common,
            output,
            skips,
        } => run_scan(common, output, skips),
        Commands::Review { common } => run_review(common),
    }
}

impl CommonArgs {
    fn session_config(&self) -> SessionConfig {
        SessionConfig::new()
            .algorithms(self.algorithms.iter().copied().map(Algorithm::from))
            .include_hidden(self.include_hidden)
    }
}

fn run_scan(common: CommonArgs, output: OutputFormat, skips: Vec<PathBuf>) -> Result<()> {
    fingerprint_dedup::init_tracing(if common.verbose { "debug" } else { "warn" });
    let term = Term::stderr();
    let pretty = matches!(output, OutputFormat::Pretty);

    if pretty {
        print_header(&term);
    }

    let (sender, receiver) = EventChannel::new();
    let event_thread = spawn_progress(receiver, pretty, common.verbose);

    let mut session =
        Session::from_directory_with_events(&common.directory, common.session_config(), sender)?;
    for skip in skips {
        session.skip(skip);
    }
    let report = session.run_once();
    let total_images = session.images().len();

    // Dropping the session drops its sender and ends the event thread
    drop(session);
    event_thread.join().ok();

    match output {
        OutputFormat::Pretty => print_pretty_report(&term, &report, total_images, common.verbose),
        OutputFormat::Json => print_json_report(&report, total_images)?,
        OutputFormat::Minimal => print_minimal_report(&report),
    }

    Ok(())
}

fn run_review(common: CommonArgs) -> Result<()> {
    fingerprint_dedup::init_tracing(if common.verbose { "debug" } else { "warn" });
    let term = Term::stderr();
    print_header(&term);

    let (sender, receiver) = EventChannel::new();
    let event_thread = spawn_progress(receiver, true, common.verbose);

    let mut session =
        Session::from_directory_with_events(&common.directory, common.session_config(), sender)?;
    let mut kept: HashSet<PathBuf> = HashSet::new();

    let report = loop {
        let report = session.run_once();
        let Some(pair) = report
            .pairs
            .iter()
            .find(|p| !kept.contains(&p.duplicate))
            .cloned()
        else {
            break report;
        };

        print_pair(&term, &pair, report.duplicate_count() - kept.len());

        match term.read_key()? {
            Key::Char('s') | Key::Char('S') => {
                session.skip(pair.duplicate.clone());
                term.write_line(&format!("    {} skipped", style("↷").yellow()))?;
            }
            Key::Char('q') | Key::Char('Q') | Key::Escape => break report,
            _ => {
                kept.insert(pair.duplicate);
            }
        }
    };

    let total_images = session.images().len();
    drop(session);
    event_thread.join().ok();

    print_pretty_report(&term, &report, total_images, common.verbose);
    Ok(())
}

fn spawn_progress(receiver: EventReceiver, show: bool, verbose: bool) -> JoinHandle<()> {
    let progress = show.then(|| {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        pb
    });

    thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = progress else {
                continue;
            };
            match event {
                Event::Scan(ScanEvent::Completed { total_images }) => {
                    pb.set_length(total_images as u64);
                }
                Event::Fingerprint(FingerprintEvent::Started {
                    algorithm,
                    total_images,
                }) => {
                    pb.set_length(total_images as u64);
                    pb.set_position(0);
                    pb.set_message(algorithm.to_string());
                }
                Event::Fingerprint(FingerprintEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    if verbose {
                        pb.set_message(format!(
                            "{} {}",
                            p.algorithm,
                            p.current_path.file_name().unwrap_or_default().to_string_lossy()
                        ));
                    }
                }
                Event::Fingerprint(FingerprintEvent::Failed { path, message, .. }) if verbose => {
                    pb.println(format!("  {} {}: {}", style("!").red(), path.display(), message));
                }
                Event::Session(SessionEvent::PhaseChanged { phase }) => {
                    pb.set_message(phase.to_string());
                }
                Event::Session(SessionEvent::Completed { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    })
}

fn print_header(term: &Term) {
    term.write_line(&format!(
        "{} {}",
        style("Fingerprint Dedup").bold().cyan(),
        style(concat!("v", env!("CARGO_PKG_VERSION"))).dim()
    ))
    .ok();
    term.write_line("").ok();
}

fn print_pair(term: &Term, pair: &DisplayPair, remaining: usize) {
    term.write_line("").ok();
    term.write_line(&format!(
        "{} {} ({} left)",
        style(format!("{}", pair.algorithm)).yellow().bold(),
        style("match").dim(),
        remaining
    ))
    .ok();
    term.write_line(&format!("  {} {}", style("Original:").green(), pair.original.display()))
        .ok();
    term.write_line(&format!("  {} {}", style("Possible duplicate:").red(), pair.duplicate.display()))
        .ok();
    term.write_line(&format!(
        "  {}",
        style("[s] skip (not a duplicate)   [n/Enter] keep as duplicate   [q] finish").dim()
    ))
    .ok();
}

fn print_pretty_report(term: &Term, report: &Report, total_images: usize, verbose: bool) {
    term.write_line("").ok();
    term.write_line(&format!("{} Check Complete", style("✓").green().bold()))
        .ok();
    term.write_line("").ok();

    term.write_line(&format!("  {} images checked", style(total_images).cyan()))
        .ok();
    term.write_line(&format!("  {} duplicate groups", style(report.group_count()).cyan()))
        .ok();
    term.write_line(&format!("  {} duplicates", style(report.duplicate_count()).cyan()))
        .ok();
    if !report.failures.is_empty() {
        term.write_line(&format!(
            "  {} images could not be fingerprinted by some algorithm",
            style(report.failures.len()).yellow()
        ))
        .ok();
    }
    term.write_line("").ok();

    if report.is_empty() {
        term.write_line(&format!("  {} No duplicates found!", style("🎉").green()))
            .ok();
    } else {
        for section in report.sections.iter().filter(|s| !s.groups.is_empty()) {
            term.write_line(&format!(
                "{}",
                style(format!("{} ({})", section.algorithm, section.algorithm.description()))
                    .bold()
                    .underlined()
            ))
            .ok();

            for group in &section.groups {
                term.write_line(&format!("  {} {}", style("★").green(), group.original.display()))
                    .ok();
                for duplicate in &group.duplicates {
                    term.write_line(&format!("    {} {}", style("○").dim(), duplicate.display()))
                        .ok();
                }
            }
            term.write_line("").ok();
        }
    }

    if verbose {
        for failure in &report.failures {
            term.write_line(&format!(
                "  {} [{}] {}",
                style("!").red(),
                failure.algorithm.name(),
                failure.reason
            ))
            .ok();
        }
    }

    // The count and pattern go to stdout so they can be piped into other tools
    println!("{}", report.duplicate_count());
    println!("{}", report.selection_pattern());

    term.write_line(&format!(
        "{}",
        style("No files were changed. Review carefully before taking action.").dim()
    ))
    .ok();
}

fn print_json_report(report: &Report, total_images: usize) -> Result<()> {
    let output = serde_json::json!({
        "total_images": total_images,
        "duplicate_groups": report.group_count(),
        "duplicate_count": report.duplicate_count(),
        "joined_names": report.joined_names(),
        "selection_pattern": report.selection_pattern(),
        "sections": report.sections,
        "pairs": report.pairs,
        "failures": report.failures,
    });

    let json = serde_json::to_string_pretty(&output).map_err(std::io::Error::from)?;
    println!("{}", json);
    Ok(())
}

fn print_minimal_report(report: &Report) {
    for pair in &report.pairs {
        println!("{}", pair.duplicate.display());
    }
}
