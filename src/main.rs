use std::io;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gridlife::config::Args;
use gridlife::config::Config;
use gridlife::config::RendererKind;
use gridlife::driver;
use gridlife::driver::FixedDelay;
use gridlife::driver::KeyboardPacer;
use gridlife::driver::RunSummary;
use gridlife::grid::Grid;
use gridlife::render::TerminalRenderer;
use gridlife::render::TextRenderer;

fn main() -> anyhow::Result<()> {
    // Frames go to stdout, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = Config::from_args(Args::parse())?;

    println!("starting game");

    let mut grid = Grid::new(config.dimension, config.dimension, &config.starting_grid)
        .context("Failed to set up the starting grid")?;

    let summary = play(&config, &mut grid)?;

    if summary.stopped_early {
        println!("Stopped after {} generations", summary.generations);
    }

    println!("Game Complete :)");

    Ok(())
}

fn play(config: &Config, grid: &mut Grid) -> anyhow::Result<RunSummary> {
    let summary = match config.renderer {
        RendererKind::Text => {
            let mut renderer = TextRenderer::new(io::stdout().lock());
            let mut pacer = FixedDelay::new(config.delay);

            driver::run(grid, config.total_steps, &mut renderer, &mut pacer)
        }

        // The terminal is handed back when `renderer` drops at the end of this arm
        RendererKind::Terminal => {
            let mut renderer = TerminalRenderer::acquire(io::stdout())
                .context("Failed to take over the terminal")?;
            let mut pacer = KeyboardPacer::new(config.delay);

            driver::run(grid, config.total_steps, &mut renderer, &mut pacer)
        }
    };

    summary.context("Run failed")
}
