mod cli;
mod options;

use anyhow::{Context, Result};
use clap::Parser;
use dotenv::dotenv;
use env_logger::Env;
use log::{info, warn};

use chess::{grid_index, ChessState, Square, UciMove};
use cli::{AnalyzeCommand, BenchmarkCommand, Cli, Commands};
use common::ConfigLoader;
use dataset::{accuracy, aligned_arrays, roc_auc, PuzzleDataset};
use engine::DecisionState;
use options::SaliencyOptions;
use saliency::{
    compute_saliency_map, Attribution, Attributor, FailurePolicy, PerturbationSource, SaliencyMap,
};
use uci::ScoreExtractor;

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Analyze(args) => analyze(args),
        Commands::Benchmark(args) => benchmark(args),
    }
}

fn analyze(args: &AnalyzeCommand) -> Result<()> {
    let options = load_options(args.config.as_deref())?;

    let extractor: ScoreExtractor<ChessState> =
        ScoreExtractor::spawn(&args.engine, options.extractor_options())?;

    let state = ChessState::from_fen(&args.fen)?;
    let attributor = Attributor::new(&extractor, state, options.attributor_options())?;

    info!("preferred move in the base position: {}", attributor.best_action());

    let reference = args
        .reference
        .as_deref()
        .map(|token| token.parse::<UciMove>())
        .transpose()
        .with_context(|| format!("Invalid reference move: {:?}", args.reference))?;

    let source = if args.addition {
        PerturbationSource::addition()
    } else {
        PerturbationSource::removal()
    }
    .with_skip_exposed(options.skip_exposed);

    let map = compute_saliency_map(
        &attributor,
        &source,
        reference.as_ref(),
        options.directional,
        FailurePolicy::Skip,
    )?;

    print_heatmap(&map);
    print_top_squares(&map, 5);

    Ok(())
}

fn benchmark(args: &BenchmarkCommand) -> Result<()> {
    let options = load_options(args.config.as_deref())?;

    let dataset = PuzzleDataset::load(&args.dataset)?;
    let limit = args.limit.unwrap_or(dataset.len());

    let extractor: ScoreExtractor<ChessState> =
        ScoreExtractor::spawn(&args.engine, options.extractor_options())?;

    let source = PerturbationSource::removal().with_skip_exposed(options.skip_exposed);

    let mut aucs = Vec::new();
    let mut accuracies = Vec::new();

    for (index, puzzle) in dataset.iter().take(limit).enumerate() {
        let state = match ChessState::from_fen(&puzzle.fen) {
            Ok(state) => state,
            Err(err) => {
                warn!("puzzle {}: unusable position: {}", index, err);
                continue;
            }
        };

        let attributor = Attributor::new(&extractor, state, options.attributor_options())?;

        // The annotated squares are relative to the puzzle's solution,
        // so force it as the reference when it parses and is legal.
        let reference = puzzle
            .solution
            .first()
            .and_then(|token| match token.parse::<UciMove>() {
                Ok(solution) => Some(solution),
                Err(err) => {
                    warn!("puzzle {}: unparseable solution {:?}: {}", index, token, err);
                    None
                }
            })
            .filter(|solution| {
                let legal = attributor.base_state().is_action_legal(solution);
                if !legal {
                    warn!("puzzle {}: solution {} is not legal", index, solution);
                }
                legal
            });

        let map = compute_saliency_map(
            &attributor,
            &source,
            reference.as_ref(),
            false,
            FailurePolicy::Skip,
        )?;

        let aligned = aligned_arrays(&puzzle.saliency_ground_truth, &map.scores());
        let auc = roc_auc(&aligned.scores, &aligned.labels);
        let acc = accuracy(&aligned.scores, &aligned.labels, options.accuracy_threshold);

        info!("puzzle {:>3}: auc {:.3}, accuracy {:.3}", index, auc, acc);

        aucs.push(auc);
        accuracies.push(acc);
    }

    if aucs.is_empty() {
        warn!("no puzzles were scored");
        return Ok(());
    }

    println!("puzzles scored: {}", aucs.len());
    println!("mean auc:       {:.3}", mean(&aucs));
    println!("mean accuracy:  {:.3}", mean(&accuracies));

    Ok(())
}

fn load_options(config: Option<&str>) -> Result<SaliencyOptions> {
    match config {
        Some(path) => ConfigLoader::new(path, "saliency".to_string())?.load(),
        None => Ok(SaliencyOptions::default()),
    }
}

/// Renders saliency as an 8x8 board, rank 8 at the top. Squares with no
/// attribution (no piece to remove, skipped, etc.) print as dots.
fn print_heatmap(map: &SaliencyMap<Square, UciMove>) {
    let mut grid: [[Option<f32>; 8]; 8] = [[None; 8]; 8];

    for (square, attribution) in map.iter() {
        let (row, col) = grid_index(*square);
        grid[row][col] = Some(attribution.saliency);
    }

    for (rank, row) in grid.iter().enumerate().rev() {
        print!("{} ", rank + 1);
        for cell in row {
            match cell {
                Some(saliency) => print!(" {:>5.3}", saliency),
                None => print!("     ."),
            }
        }
        println!();
    }

    println!("       a     b     c     d     e     f     g     h");
}

fn print_top_squares(map: &SaliencyMap<Square, UciMove>, count: usize) {
    let mut entries: Vec<&(Square, Attribution<UciMove>)> = map.iter().collect();
    entries.sort_by(|(_, a), (_, b)| b.saliency.total_cmp(&a.saliency));

    println!();
    for (square, attribution) in entries.into_iter().take(count) {
        println!(
            "{}: saliency {:.3}, drop {:.3}, reference {}",
            square, attribution.saliency, attribution.probability_drop, attribution.reference_action
        );
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
