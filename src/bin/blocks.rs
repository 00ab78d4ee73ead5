//! Headless driver: load the pieces, replay a command script, print the volume.

use blockpuzzle::{
    Command, DirectorySource, Feedback, Occupancy, Palette, PlacementEngine, PuzzleConfig, Session,
    Tag,
};
use clap::Parser;
use console::Style;
use std::error::Error;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "blocks")]
#[command(about = "Replay move/rotate commands against the block puzzle")]
struct Cli {
    /// JSON puzzle config; defaults to the 16-cube, six-piece puzzle
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory holding block_<id>.txt shape files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Command script, one command per line; reads stdin when omitted
    #[arg(long)]
    script: Option<PathBuf>,

    /// Skip printing the final volume
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blockpuzzle=info,blocks=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => PuzzleConfig::from_file(path)?,
        None => PuzzleConfig::default(),
    };
    if let Some(dir) = cli.data_dir {
        config = config.with_data_dir(dir);
    }

    let source = DirectorySource::from_config(&config);
    let engine = PlacementEngine::init(&config, &source)?;
    let mut session = Session::new(engine);

    let reader: Box<dyn BufRead> = match &cli.script {
        Some(path) => Box::new(BufReader::new(std::fs::File::open(path)?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let (mut accepted, mut rejected) = (0usize, 0usize);
    for (number, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let command: Command = match text.parse() {
            Ok(command) => command,
            Err(err) => {
                warn!(line = number + 1, %err, "skipping command");
                continue;
            }
        };
        match session.apply(command) {
            Feedback::Accepted => accepted += 1,
            Feedback::Rejected => {
                rejected += 1;
                info!(line = number + 1, %command, piece = session.selected(), "bump");
            }
        }
    }
    info!(accepted, rejected, "script finished");

    if !cli.quiet {
        print_layers(&session.engine().snapshot(), &Palette::default());
    }
    Ok(())
}

/// Print each Y layer top-down as a grid of tag digits, coloured by tag.
fn print_layers(occupancy: &Occupancy, palette: &Palette) {
    let side = occupancy.side() as i32;
    for y in (0..side).rev() {
        let layer = occupancy.layer(y);
        if layer.iter().flatten().all(|&tag| tag == 0) {
            continue;
        }
        println!("y = {}", y);
        for row in &layer {
            let line: Vec<String> = row.iter().map(|&tag| cell_glyph(tag, palette)).collect();
            println!("  {}", line.join(" "));
        }
    }
}

/// `.` for an empty cell, otherwise the tag digit. Tags without a palette
/// entry print uncoloured.
fn cell_glyph(tag: Tag, palette: &Palette) -> String {
    if tag == 0 {
        return ".".to_string();
    }
    match palette.colour(tag) {
        Some(colour) => Style::new()
            .color256(colour.ansi256())
            .apply_to(tag.to_string())
            .to_string(),
        None => tag.to_string(),
    }
}
