use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(author, version)]
#[clap(name = "Saliency Client")]
#[clap(about = "Perturbation-based saliency maps for chess positions", long_about = None)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Analyze(AnalyzeCommand),
    Benchmark(BenchmarkCommand),
}

/// Computes and prints the saliency map of a single position.
#[derive(Args)]
pub struct AnalyzeCommand {
    /// Position to analyze, as a FEN string.
    pub fen: String,

    /// Path to a UCI engine binary.
    #[clap(short, long)]
    pub engine: String,

    /// Reference move in coordinate notation; defaults to the engine's
    /// preferred move in the base position.
    #[clap(short, long)]
    pub reference: Option<String>,

    /// Probe empty squares with pawn additions instead of removing
    /// occupants.
    #[clap(long)]
    pub addition: bool,

    #[clap(short, long)]
    pub config: Option<String>,
}

/// Scores saliency maps against an annotated puzzle dataset.
#[derive(Args)]
pub struct BenchmarkCommand {
    /// Path to the puzzle dataset JSON file.
    pub dataset: String,

    /// Path to a UCI engine binary.
    #[clap(short, long)]
    pub engine: String,

    /// Only run the first N puzzles.
    #[clap(short, long)]
    pub limit: Option<usize>,

    #[clap(short, long)]
    pub config: Option<String>,
}
