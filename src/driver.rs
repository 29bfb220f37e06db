use std::io;
use std::thread;
use std::time::Duration;
use std::time::Instant;

use crossterm::event;
use tracing::debug;
use tracing::info;

use crate::events::Event;
use crate::grid::Grid;
use crate::io::convert_event;
use crate::render::Renderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Waits between two steps of a run.
pub trait Pacer {
    fn pause(&mut self) -> io::Result<Flow>;
}

/// Sleeps for a fixed amount of time, never stops a run.
pub struct FixedDelay {
    delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pacer for FixedDelay {
    fn pause(&mut self) -> io::Result<Flow> {
        thread::sleep(self.delay);

        Ok(Flow::Continue)
    }
}

/// Waits for up to `delay` while listening to the keyboard. Only useful while the terminal is in
/// raw mode, see [`crate::render::TerminalRenderer`].
pub struct KeyboardPacer {
    delay: Duration,
}

impl KeyboardPacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Pacer for KeyboardPacer {
    fn pause(&mut self) -> io::Result<Flow> {
        let deadline = Instant::now() + self.delay;

        loop {
            let left = deadline.saturating_duration_since(Instant::now());

            if !event::poll(left)? {
                return Ok(Flow::Continue);
            }

            match convert_event(event::read()?) {
                Some(Event::Exit) => return Ok(Flow::Stop),
                Some(Event::Skip) => return Ok(Flow::Continue),
                None => {}
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Generations advanced during the run
    pub generations: usize,

    /// Live cells in the last generation
    pub population: usize,

    /// Whether the pacer ended the run before `total_steps` generations
    pub stopped_early: bool,
}

/// Render the starting generation, then advance and render `total_steps` more, pausing before
/// each one.
pub fn run<R, P>(
    grid: &mut Grid,
    total_steps: usize,
    renderer: &mut R,
    pacer: &mut P,
) -> io::Result<RunSummary>
where
    R: Renderer + ?Sized,
    P: Pacer + ?Sized,
{
    info!(
        width = grid.width(),
        height = grid.height(),
        population = grid.population(),
        total_steps,
        "Starting run"
    );

    renderer.render(grid)?;

    let mut generations = 0;
    let mut stopped_early = pacer.pause()? == Flow::Stop;

    while !stopped_early && generations < total_steps {
        if pacer.pause()? == Flow::Stop {
            stopped_early = true;
            break;
        }

        grid.advance();
        generations += 1;

        debug!(
            generation = grid.generation(),
            population = grid.population(),
            "Advanced"
        );

        renderer.render(grid)?;
    }

    let summary = RunSummary {
        generations,
        population: grid.population(),
        stopped_early,
    };

    info!(?summary, "Run finished");

    Ok(summary)
}
