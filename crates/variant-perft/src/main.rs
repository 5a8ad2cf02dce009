use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use chess_variants::movegen::perft::{perft, perft_divide};
use chess_variants::{GameConfig, VariantKind};
use clap::Parser;

#[derive(Parser)]
#[command(name = "variant-perft")]
#[command(about = "Count legal move paths for chess variants")]
struct Args {
    /// Search depth in plies
    #[arg(short, long, default_value = "3")]
    depth: u32,

    /// Variant to use (overrides the config file)
    #[arg(short, long)]
    variant: Option<VariantKind>,

    /// Starting FEN (overrides the config file)
    #[arg(short, long)]
    fen: Option<String>,

    /// Print the node count below each root move
    #[arg(long)]
    divide: bool,

    /// Game configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(GameConfig::config_path);
    let config = GameConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    let kind = args.variant.unwrap_or(config.variant);
    let variant = kind.rules();
    let fen = args
        .fen
        .or(config.fen)
        .unwrap_or_else(|| variant.starting_fen().to_string());
    let position = variant
        .decode_fen(&fen)
        .with_context(|| format!("invalid {} position: {}", kind, fen))?;

    tracing::info!("Variant: {}", kind);
    tracing::info!("Position: {}", variant.encode_fen(&position));
    tracing::info!("Depth: {}", args.depth);

    let start = Instant::now();
    let nodes = if args.divide {
        let divide = perft_divide(variant.as_ref(), &position, args.depth);
        for (mv, count) in &divide {
            println!("{}: {}", mv, count);
        }
        println!();
        divide.iter().map(|(_, count)| count).sum()
    } else {
        perft(variant.as_ref(), &position, args.depth)
    };
    let elapsed = start.elapsed();

    println!("Nodes: {}", nodes);
    tracing::info!(
        "{} nodes in {:.3}s ({:.0} nps)",
        nodes,
        elapsed.as_secs_f64(),
        nodes as f64 / elapsed.as_secs_f64().max(1e-9)
    );
    Ok(())
}
