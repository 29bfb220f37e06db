use std::io;
use std::io::Write;

use crossterm::cursor;
use crossterm::execute;
use crossterm::queue;
use crossterm::style;
use crossterm::terminal;
use tracing::debug;
use tracing::warn;

use crate::grid::Grid;

pub const ALIVE: &str = " X ";
pub const DEAD: &str = "   ";

/// Something that can display a generation.
///
/// The grid is only borrowed for the duration of the call, so it can't change underneath a
/// render.
pub trait Renderer {
    fn render(&mut self, grid: &Grid) -> io::Result<()>;
}

/// The line drawn above and below the board.
pub fn border(width: usize) -> String {
    format!("--{}", "---".repeat(width))
}

/// Lines of a text frame: the border, one line per row of the board from `y = 0` down, and the
/// border again.
pub fn frame_lines(grid: &Grid) -> Vec<String> {
    let border = border(grid.width());

    let mut lines = Vec::with_capacity(grid.height() + 2);
    lines.push(border.clone());

    for y in 0..grid.height() {
        let mut line = String::with_capacity(3 * grid.width() + 2);
        line.push('|');

        for x in 0..grid.width() {
            line.push_str(if grid.is_alive(x, y) { ALIVE } else { DEAD });
        }

        line.push('|');
        lines.push(line);
    }

    lines.push(border);

    lines
}

/// A whole text frame, each line terminated by `\n`.
pub fn frame(grid: &Grid) -> String {
    frame_lines(grid)
        .into_iter()
        .fold(String::new(), |mut s, line| {
            s.push_str(&line);
            s.push('\n');
            s
        })
}

/// Appends plain text frames to a writer, one after the other.
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, grid: &Grid) -> io::Result<()> {
        self.out.write_all(frame(grid).as_bytes())?;
        self.out.flush()
    }
}

/// Redraws the frame in place on a terminal.
///
/// Creating one puts the terminal in raw mode and hides the cursor. Both are undone when it is
/// dropped, however the run ends.
pub struct TerminalRenderer<W: Write> {
    out: W,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn acquire(mut out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;

        // Raw mode is already on, so it has to be undone if hiding the cursor fails
        if let Err(e) = execute!(out, cursor::Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }

        debug!("Acquired terminal");

        Ok(Self { out })
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, grid: &Grid) -> io::Result<()> {
        queue!(
            self.out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0),
        )?;

        // `\n` doesn't return the carriage in raw mode
        for line in frame_lines(grid) {
            queue!(self.out, style::Print(line), cursor::MoveToNextLine(1))?;
        }

        self.out.flush()
    }
}

impl<W: Write> Drop for TerminalRenderer<W> {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, cursor::Show) {
            warn!("Failed to show the cursor: {e}");
        }

        if let Err(e) = terminal::disable_raw_mode() {
            warn!("Failed to leave raw mode: {e}");
        }

        let _ = self.out.flush();

        debug!("Released terminal");
    }
}

#[cfg(test)]
mod tests {
    use super::Renderer;
    use crate::grid::Grid;

    #[test]
    fn terminal_renderer_shows_the_cursor_on_drop() {
        let grid = Grid::new(1, 1, &[(0, 0)]).unwrap();
        let mut out = Vec::new();

        {
            let mut renderer = super::TerminalRenderer { out: &mut out };
            renderer.render(&grid).unwrap();
        }

        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("| X |"), "{out:?}");
        assert!(out.ends_with("\x1b[?25h"), "{out:?}");
    }

    #[test]
    fn border_widths() {
        assert_eq!(super::border(1), "-----");
        assert_eq!(super::border(3), "-----------");
        assert_eq!(super::border(20).len(), 62);
    }

    #[test]
    fn empty_3x3() {
        let grid = Grid::new(3, 3, &[]).unwrap();

        assert_eq!(
            super::frame_lines(&grid),
            vec![
                "-----------",
                "|         |",
                "|         |",
                "|         |",
                "-----------",
            ]
        );
    }

    #[test]
    fn rows_run_along_x() {
        let grid = Grid::new(3, 2, &[(0, 0), (2, 1)]).unwrap();

        assert_eq!(super::frame_lines(&grid)[1], "| X       |");
        assert_eq!(super::frame_lines(&grid)[2], "|       X |");
    }

    #[test]
    fn text_renderer_appends_frames() {
        let grid = Grid::new(1, 1, &[(0, 0)]).unwrap();

        let mut renderer = super::TextRenderer::new(Vec::new());
        super::Renderer::render(&mut renderer, &grid).unwrap();
        super::Renderer::render(&mut renderer, &grid).unwrap();

        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(out, "-----\n| X |\n-----\n".repeat(2));
    }
}
