use serde::{Deserialize, Serialize};

use crate::error::GridError;
use crate::grid::{Grid, Point};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLUMNS: usize = 50;
pub const DEFAULT_START: Point = Point::new(10, 15);
pub const DEFAULT_FINISH: Point = Point::new(10, 35);

/// Description of a board: its size, the two endpoints and the painted walls.
///
/// Missing fields take their default when deserializing, so `{}` is the
/// default 20x50 board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub rows: usize,
    pub columns: usize,
    pub start: Point,
    pub finish: Point,
    pub walls: Vec<Point>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            columns: DEFAULT_COLUMNS,
            start: DEFAULT_START,
            finish: DEFAULT_FINISH,
            walls: Vec::new(),
        }
    }
}

impl GridConfig {
    pub fn build(&self) -> Result<Grid, GridError> {
        let mut grid = Grid::new(self.rows, self.columns, self.start, self.finish)?;
        for &wall in &self.walls {
            grid.paint(wall, true)?;
        }
        Ok(grid)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl TryFrom<GridConfig> for Grid {
    type Error = GridError;

    fn try_from(config: GridConfig) -> Result<Self, Self::Error> {
        config.build()
    }
}

impl From<Grid> for GridConfig {
    fn from(grid: Grid) -> Self {
        Self {
            rows: grid.rows(),
            columns: grid.columns(),
            start: grid.start(),
            finish: grid.finish(),
            walls: grid.walls().collect(),
        }
    }
}
