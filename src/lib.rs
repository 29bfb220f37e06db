pub mod config;
pub mod driver;
pub mod events;
pub mod grid;
pub mod io;
pub mod render;
pub mod rle;

mod parse_util;

/// Signed coordinate or dimension, as given by a caller before it is checked against a grid.
pub type Offset = i64;
