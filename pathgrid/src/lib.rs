//! Shortest-path search over a grid of walls.
//!
//! A [`Grid`] holds the wall layout together with one start and one finish
//! cell. [`search`] (or [`Grid::search`]) runs a uniform-cost search over it
//! and returns the order in which cells were settled plus the reconstructed
//! path, ready to be played back by whatever draws the grid. [`PathFinder`]
//! exposes the same search one settled cell at a time.
//!
//! Ties are resolved deterministically: among cells at equal distance the
//! one that comes first row-major is settled first, and neighbors are always
//! relaxed in the order up, down, left, right.

pub mod config;
pub mod error;
pub mod find;
pub mod grid;

pub use config::GridConfig;
pub use error::GridError;
pub use find::{
    reconstruct_path, search, MapStorage, MapTrait, NodeReference, PathFinder, PathFinderState,
    PathResult, Scratch, SearchEvent, SearchOutcome,
};
pub use grid::{Cell, CellStorage, Grid, Point};
