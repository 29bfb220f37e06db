use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap::ValueEnum;

use crate::Offset;
use crate::rle;

pub const DEFAULT_DIMENSION: Offset = 20;
pub const DEFAULT_DELAY_MS: u64 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererKind {
    /// Print every frame below the previous one
    Text,

    /// Redraw in place. Press q to quit, space to skip ahead
    Terminal,
}

/// Conway's Game of Life on a bounded square board
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// Side length of the board
    #[arg(short, long, default_value_t = DEFAULT_DIMENSION, allow_negative_numbers = true)]
    pub dimension: Offset,

    /// Generations to advance after the first frame
    #[arg(short, long, default_value_t = 0)]
    pub steps: usize,

    /// A live starting cell, as `x,y`. May be repeated
    #[arg(
        short,
        long = "cell",
        value_name = "X,Y",
        value_parser = parse_cell,
        allow_hyphen_values = true
    )]
    pub cells: Vec<(Offset, Offset)>,

    /// RLE pattern file whose live cells are added to the starting board
    #[arg(short, long, value_name = "FILE")]
    pub pattern: Option<PathBuf>,

    /// Pause between generations, in milliseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    #[arg(short, long, value_enum, default_value_t = RendererKind::Text)]
    pub renderer: RendererKind,
}

/// Everything needed to start a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub dimension: Offset,
    pub total_steps: usize,

    /// Live starting cells, in the order they were given
    pub starting_grid: Vec<(Offset, Offset)>,

    pub delay: Duration,
    pub renderer: RendererKind,
}

impl Config {
    /// Resolve command line arguments, reading the pattern file if one was given.
    pub fn from_args(args: Args) -> anyhow::Result<Self> {
        let mut starting_grid = args.cells;

        if let Some(path) = &args.pattern {
            let bytes = std::fs::read(path)
                .with_context(|| format!("Failed to read pattern {}", path.display()))?;

            rle::read_rle(&bytes, |x, y| starting_grid.push((x, y)))
                .with_context(|| format!("Failed to parse pattern {}", path.display()))?;
        }

        Ok(Self {
            dimension: args.dimension,
            total_steps: args.steps,
            starting_grid,
            delay: Duration::from_millis(args.delay_ms),
            renderer: args.renderer,
        })
    }
}

/// Parse `x,y` into a coordinate pair.
fn parse_cell(s: &str) -> Result<(Offset, Offset), String> {
    let Some((x, y)) = s.split_once(',') else {
        return Err(format!("expected `x,y`, got \"{s}\""));
    };

    let x = x.trim().parse().map_err(|e| format!("bad x in \"{s}\": {e}"))?;
    let y = y.trim().parse().map_err(|e| format!("bad y in \"{s}\": {e}"))?;

    Ok((x, y))
}
