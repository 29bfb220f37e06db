use thiserror::Error;
use tracing::debug;

use crate::Offset;

/// The 8 compass directions around a cell, as `(dx, dy)`.
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("Invalid dimensions {width}x{height}: both must be at least 1")]
    InvalidDimensions { width: Offset, height: Offset },

    #[error("Cell ({x}, {y}) lies outside of the {width}x{height} grid")]
    OutOfBounds {
        x: Offset,
        y: Offset,
        width: usize,
        height: usize,
    },
}

/// A bounded Life board. Edges do not wrap.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,

    /// The current generation. Cell `(x, y)` lives at `x * height + y`, so the field is `width`
    /// columns of `height` cells each.
    cells: Vec<bool>,

    /// Scratch buffer the next generation is written to before being swapped in. Its contents
    /// are meaningless between calls to [`Grid::advance`].
    next: Vec<bool>,

    generation: u64,
}

impl Grid {
    /// Create a `width` by `height` grid where only the cells in `alive` are on.
    pub fn new(
        width: Offset,
        height: Offset,
        alive: &[(Offset, Offset)],
    ) -> Result<Self, GridError> {
        if width < 1 || height < 1 {
            return Err(GridError::InvalidDimensions { width, height });
        }

        let (Ok(w), Ok(h)) = (usize::try_from(width), usize::try_from(height)) else {
            return Err(GridError::InvalidDimensions { width, height });
        };

        let Some(size) = w.checked_mul(h) else {
            return Err(GridError::InvalidDimensions { width, height });
        };

        let mut cells = vec![false; size];

        for &(x, y) in alive {
            if !(0..width).contains(&x) || !(0..height).contains(&y) {
                return Err(GridError::OutOfBounds {
                    x,
                    y,
                    width: w,
                    height: h,
                });
            }

            // Both coordinates are within the checked dimensions, so the casts hold
            cells[x as usize * h + y as usize] = true;
        }

        debug!(width = w, height = h, seeds = alive.len(), "Created grid");

        Ok(Self {
            width: w,
            height: h,
            next: vec![false; cells.len()],
            cells,
            generation: 0,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of times [`Grid::advance`] was called.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// State of cell `(x, y)`, or `None` if it lies off the board.
    pub fn get(&self, x: usize, y: usize) -> Option<bool> {
        if x < self.width && y < self.height {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Whether cell `(x, y)` is alive. Anything off the board is dead.
    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.get(x, y).unwrap_or(false)
    }

    /// Live cells, column by column.
    pub fn alive_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let height = self.height;

        self.cells
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(move |(i, _)| (i / height, i % height))
    }

    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// The in-bounds cells surrounding `(x, y)`. Interior cells have 8, edges 5 and corners 3.
    pub fn neighbors_of(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        self.neighbors(x, y).collect()
    }

    /// How many of the cells around `(x, y)` are alive.
    pub fn live_neighbor_count(&self, x: usize, y: usize) -> usize {
        self.neighbors(x, y)
            .filter(|&(nx, ny)| self.cells[self.index(nx, ny)])
            .count()
    }

    /// The Life rule, B3/S23.
    pub const fn next_state(alive: bool, live_neighbors: usize) -> bool {
        matches!((alive, live_neighbors), (true, 2 | 3) | (false, 3))
    }

    /// Step the whole board forward by one generation.
    ///
    /// Every cell of the next generation is computed from the current one into `next`, which is
    /// then swapped in. Cells are never updated in place.
    pub fn advance(&mut self) {
        for x in 0..self.width {
            for y in 0..self.height {
                let i = self.index(x, y);
                let n = self.live_neighbor_count(x, y);

                self.next[i] = Self::next_state(self.cells[i], n);
            }
        }

        std::mem::swap(&mut self.cells, &mut self.next);
        self.generation += 1;
    }

    fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        NEIGHBOR_OFFSETS.iter().filter_map(move |&(dx, dy)| {
            let nx = x.checked_add_signed(dx)?;
            let ny = y.checked_add_signed(dy)?;

            (nx < self.width && ny < self.height).then_some((nx, ny))
        })
    }

    fn index(&self, x: usize, y: usize) -> usize {
        x * self.height + y
    }
}
