//! CLI for comparing a live landmark capture against enrolled templates.
//!
//! Usage:
//!   face-similarity live.json enrolled.json                # Human-readable output
//!   face-similarity live.json a.json b.json --json         # JSON output
//!   face-similarity live.json enrolled.json -o result.json # Save to file
//!
//! Landmark files are JSON objects keyed by label name, e.g.
//! `{"LEFT_EYE": {"x": 120.0, "y": 80.5}, ...}`.

use clap::Parser;
use face_similarity::{best_outcome, FaceComparator, LandmarkSet, ScoringConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "face-similarity")]
#[command(author, version, about = "Facial landmark similarity scoring", long_about = None)]
struct Args {
    /// Landmarks of the live capture
    #[arg(required = true)]
    live: PathBuf,

    /// Enrolled landmark templates to compare against
    #[arg(required = true, num_args = 1..)]
    enrolled: Vec<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    json: bool,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Scores strictly above this are reported as a match
    #[arg(short, long, default_value = "0.98")]
    threshold: f32,

    /// Scoring config (JSON); unset fields keep their defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Show verbose output (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Output structure for JSON serialization
#[derive(Serialize)]
struct Output {
    live: String,
    live_landmarks: usize,
    threshold: f32,
    comparisons: Vec<ComparisonOutput>,
    /// 1-based index of the best-scoring template, if any matched
    best_match: Option<usize>,
}

#[derive(Serialize)]
struct ComparisonOutput {
    /// Template index (1-based)
    index: usize,
    enrolled: String,
    #[serde(flatten)]
    outcome: OutcomeOutput,
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum OutcomeOutput {
    Scored {
        score: f32,
        distance: f32,
        angle: f32,
        is_match: bool,
    },
    Failed {
        error: String,
    },
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if !(0.0..=1.0).contains(&args.threshold) {
        return Err(format!("threshold must be within [0, 1], got {}", args.threshold).into());
    }

    let config = match &args.config {
        Some(path) => {
            tracing::info!("Loading scoring config from {:?}", path);
            let text = std::fs::read_to_string(path)?;
            serde_json::from_str::<ScoringConfig>(&text)?
        }
        None => ScoringConfig::default(),
    };
    let comparator = FaceComparator::new(config)?;
    tracing::debug!(config = ?comparator.config(), "scoring config");

    tracing::info!("Loading live landmarks from {:?}", args.live);
    let live = load_landmarks(&args.live)?;

    // Files that fail to load are reported but never reach the comparator
    let mut templates = Vec::with_capacity(args.enrolled.len());
    let mut slots = Vec::with_capacity(args.enrolled.len());
    for path in &args.enrolled {
        match load_landmarks(path) {
            Ok(set) => {
                slots.push(Ok(templates.len()));
                templates.push(set);
            }
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", path, e);
                slots.push(Err(e.to_string()));
            }
        }
    }

    tracing::info!("Comparing against {} template(s)", templates.len());
    let outcomes = comparator.compare_all(&live, &templates);
    let best = best_outcome(&outcomes)
        .filter(|(_, result)| result.exceeds(args.threshold))
        .map(|(t, _)| t);

    let mut comparisons = Vec::with_capacity(slots.len());
    let mut best_match = None;
    for (i, (path, slot)) in args.enrolled.iter().zip(slots).enumerate() {
        let outcome = match slot {
            Ok(t) => {
                if best == Some(t) {
                    best_match = Some(i + 1);
                }
                match &outcomes[t] {
                    Ok(result) => OutcomeOutput::Scored {
                        score: result.score,
                        distance: result.distance,
                        angle: result.angle,
                        is_match: result.exceeds(args.threshold),
                    },
                    Err(e) => OutcomeOutput::Failed {
                        error: e.to_string(),
                    },
                }
            }
            Err(error) => OutcomeOutput::Failed { error },
        };

        comparisons.push(ComparisonOutput {
            index: i + 1,
            enrolled: path.display().to_string(),
            outcome,
        });
    }

    let output = Output {
        live: args.live.display().to_string(),
        live_landmarks: live.len(),
        threshold: args.threshold,
        comparisons,
        best_match,
    };

    // Generate output
    let output_str = if args.json {
        serde_json::to_string_pretty(&output)?
    } else {
        format_human_readable(&output)
    };

    // Write output
    if let Some(ref path) = args.output {
        std::fs::write(path, &output_str)?;
        tracing::info!("Output written to {:?}", path);
    } else {
        println!("{}", output_str);
    }

    Ok(())
}

fn load_landmarks(path: &Path) -> Result<LandmarkSet, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let set = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    Ok(set)
}

fn format_human_readable(output: &Output) -> String {
    let mut s = String::new();

    s.push_str(&format!("Live: {} ({} landmarks)\n", output.live, output.live_landmarks));
    s.push_str(&format!("Threshold: {:.3}\n", output.threshold));

    for cmp in &output.comparisons {
        s.push_str(&format!("\n--- Template {}: {} ---\n", cmp.index, cmp.enrolled));
        match &cmp.outcome {
            OutcomeOutput::Scored {
                score,
                distance,
                angle,
                is_match,
            } => {
                s.push_str(&format!("  Score:    {:.4} ({:.1}%)\n", score, score * 100.0));
                s.push_str(&format!("  Distance: {:.4}\n", distance));
                s.push_str(&format!("  Angle:    {:.4}\n", angle));
                let verdict = if *is_match { "MATCH" } else { "NO MATCH" };
                s.push_str(&format!("  Verdict:  {}\n", verdict));
            }
            OutcomeOutput::Failed { error } => {
                s.push_str(&format!("  Failed: {}\n", error));
            }
        }
    }

    match output.best_match {
        Some(index) => s.push_str(&format!("\nBest match: template {}\n", index)),
        None => s.push_str("\nNo template matched.\n"),
    }

    s
}
