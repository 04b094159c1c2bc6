use crate::config::GridConfig;
use crate::error::GridError;
use crate::find::{search, MapStorage, MapTrait, NodeReference, SearchOutcome};
use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

/// Coordinate of a cell. Ordering is row-major, which is also the order used
/// to break ties between cells at equal distance during a search.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn manhattan(&self, other: Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl NodeReference for Point {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_start: bool,
    pub is_finish: bool,
    pub is_wall: bool,
}

impl Cell {
    pub fn point(&self) -> Point {
        Point::new(self.row, self.col)
    }
}

impl Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match (self.is_start, self.is_finish, self.is_wall) {
                (true, _, false) => 'S',
                (true, _, true) => 's',
                (_, true, false) => 'F',
                (_, true, true) => 'f',
                (_, _, true) => '#',
                _ => '.',
            }
        )
    }
}

/// A rectangular wall layout with one start and one finish cell.
///
/// Cells are stored row-major in a single vector. A `Grid` is a snapshot:
/// editing operations return a new grid and leave `self` untouched, and a
/// search never writes to it (see [`crate::find::Scratch`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "GridConfig", try_from = "GridConfig")]
pub struct Grid {
    rows: usize,
    columns: usize,
    cells: Vec<Cell>,
    start: Point,
    finish: Point,
}

impl Grid {
    pub fn new(rows: usize, columns: usize, start: Point, finish: Point) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::InvalidDimensions { rows, columns });
        }
        for point in [start, finish] {
            if point.row >= rows || point.col >= columns {
                return Err(GridError::OutOfBounds {
                    point,
                    rows,
                    columns,
                });
            }
        }
        if start == finish {
            return Err(GridError::StartIsFinish(start));
        }

        let cells = (0..rows)
            .flat_map(|row| (0..columns).map(move |col| Point::new(row, col)))
            .map(|p| Cell {
                row: p.row,
                col: p.col,
                is_start: p == start,
                is_finish: p == finish,
                is_wall: false,
            })
            .collect();

        Ok(Self {
            rows,
            columns,
            cells,
            start,
            finish,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn finish(&self) -> Point {
        self.finish
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    fn index(&self, point: Point) -> Result<usize, GridError> {
        if self.contains(point) {
            Ok(point.row * self.columns + point.col)
        } else {
            Err(GridError::OutOfBounds {
                point,
                rows: self.rows,
                columns: self.columns,
            })
        }
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        self.index(point).ok().map(|i| &self.cells[i])
    }

    /// Points outside of the grid are not walls, they are simply absent.
    pub fn is_wall(&self, point: Point) -> bool {
        self.cell(point).is_some_and(|c| c.is_wall)
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn walls(&self) -> impl Iterator<Item = Point> + '_ {
        self.cells.iter().filter(|c| c.is_wall).map(Cell::point)
    }

    /// The in-bounds axis-aligned neighbors of `point`, always in the order
    /// up, down, left, right. Walls are included.
    pub fn neighbors(&self, point: Point) -> impl Iterator<Item = Point> {
        let inside = self.contains(point);
        let Point { row, col } = point;

        [
            (inside && row > 0).then(|| Point::new(row - 1, col)),
            (inside && row + 1 < self.rows).then(|| Point::new(row + 1, col)),
            (inside && col > 0).then(|| Point::new(row, col - 1)),
            (inside && col + 1 < self.columns).then(|| Point::new(row, col + 1)),
        ]
        .into_iter()
        .flatten()
    }

    /// Returns a copy of the grid with the wall flag of `(row, col)` flipped.
    /// The start and finish cells may be toggled as well, a search then
    /// reports that no path exists.
    pub fn toggle_wall(&self, row: usize, col: usize) -> Result<Grid, GridError> {
        let index = self.index(Point::new(row, col))?;
        let mut grid = self.clone();
        grid.cells[index].is_wall = !grid.cells[index].is_wall;
        Ok(grid)
    }

    /// Returns a copy of the grid with the wall flag of `point` set to `wall`.
    pub fn set_wall(&self, point: Point, wall: bool) -> Result<Grid, GridError> {
        let mut grid = self.clone();
        grid.paint(point, wall)?;
        Ok(grid)
    }

    pub(crate) fn paint(&mut self, point: Point, wall: bool) -> Result<(), GridError> {
        let index = self.index(point)?;
        self.cells[index].is_wall = wall;
        Ok(())
    }

    /// Run a search from this grid's start cell to its finish cell.
    pub fn search(&self) -> SearchOutcome<Grid> {
        search(self, self.start, self.finish)
    }
}

/// A MapStorage keyed by [`Point`], laid out row-major in a single vec
#[derive(Debug, Clone)]
pub struct CellStorage<T> {
    rows: usize,
    columns: usize,
    values: Vec<T>,
}

impl<T: Copy + 'static> MapStorage<T> for CellStorage<T> {
    type Reference = Point;

    fn is_valid(&self, node: Self::Reference) -> bool {
        node.row < self.rows && node.col < self.columns
    }

    fn get(&self, node: Self::Reference) -> T {
        self.values[node.row * self.columns + node.col]
    }

    fn get_mut(&mut self, node: Self::Reference) -> &mut T {
        &mut self.values[node.row * self.columns + node.col]
    }
}

impl<T: Display> Display for CellStorage<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.values.chunks(self.columns) {
            for value in row {
                write!(f, "{}", value)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.columns) {
            for cell in row {
                write!(f, "{}", cell)?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl FromStr for Grid {
    type Err = GridError;

    /// Parses the picture produced by `Display`: `.` open, `#` wall, `S`
    /// start, `F` finish, lowercase `s`/`f` for a walled start/finish.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut rows: Vec<Vec<bool>> = Vec::new();
        let mut start = None;
        let mut finish = None;

        let lines = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        for (line_no, line) in lines {
            let row = rows.len();
            let mut walls = Vec::with_capacity(line.len());

            for (col, c) in line.chars().enumerate() {
                let point = Point::new(row, col);
                let (wall, slot) = match c {
                    '.' => (false, None),
                    '#' => (true, None),
                    'S' => (false, Some(&mut start)),
                    's' => (true, Some(&mut start)),
                    'F' => (false, Some(&mut finish)),
                    'f' => (true, Some(&mut finish)),
                    other => {
                        return Err(GridError::Layout {
                            line: line_no,
                            message: format!("unexpected character '{}'", other),
                        })
                    }
                };
                if let Some(slot) = slot {
                    if slot.replace(point).is_some() {
                        return Err(GridError::Layout {
                            line: line_no,
                            message: format!("second '{}' marker", c.to_ascii_uppercase()),
                        });
                    }
                }
                walls.push(wall);
            }

            if let Some(first) = rows.first() {
                if first.len() != walls.len() {
                    return Err(GridError::Layout {
                        line: line_no,
                        message: format!("expected {} columns, found {}", first.len(), walls.len()),
                    });
                }
            }
            rows.push(walls);
        }

        let missing = |marker: char| GridError::Layout {
            line: rows.len(),
            message: format!("no '{}' marker in layout", marker),
        };
        let start = start.ok_or_else(|| missing('S'))?;
        let finish = finish.ok_or_else(|| missing('F'))?;

        let mut grid = Grid::new(rows.len(), rows[0].len(), start, finish)?;
        for (row, walls) in rows.iter().enumerate() {
            for (col, &wall) in walls.iter().enumerate() {
                grid.paint(Point::new(row, col), wall)?;
            }
        }

        Ok(grid)
    }
}

impl MapTrait for Grid {
    type Reference = Point;
    type Storage<T: Default + Copy + Clone + 'static> = CellStorage<T>;

    fn is_passable(&self, node: Self::Reference) -> bool {
        self.cell(node).is_some_and(|c| !c.is_wall)
    }

    fn neighbors_of(&self, node: Self::Reference) -> impl Iterator<Item = Self::Reference> {
        // filter to only keep open cells
        self.neighbors(node).filter(move |p| !self.is_wall(*p))
    }

    fn create_storage<T: Default + Copy + Clone + 'static>(&self) -> Self::Storage<T> {
        CellStorage {
            rows: self.rows,
            columns: self.columns,
            values: vec![Default::default(); self.rows * self.columns],
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn test_create_grid() {
        let grid = Grid::new(3, 4, p(0, 0), p(2, 3)).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.cells().count(), 12);
        assert_eq!(grid.walls().count(), 0);
        assert!(grid.cell(p(0, 0)).unwrap().is_start);
        assert!(grid.cell(p(2, 3)).unwrap().is_finish);
        assert_eq!(grid.cells().filter(|c| c.is_start).count(), 1);
        assert_eq!(grid.cells().filter(|c| c.is_finish).count(), 1);

        // cells are row-major
        let points: Vec<Point> = grid.cells().map(Cell::point).take(5).collect();
        assert_eq!(points, vec![p(0, 0), p(0, 1), p(0, 2), p(0, 3), p(1, 0)]);
    }

    #[test]
    fn test_create_grid_invalid() {
        assert_eq!(
            Grid::new(0, 5, p(0, 0), p(0, 1)),
            Err(GridError::InvalidDimensions {
                rows: 0,
                columns: 5
            })
        );
        assert_eq!(
            Grid::new(2, 2, p(0, 0), p(2, 0)),
            Err(GridError::OutOfBounds {
                point: p(2, 0),
                rows: 2,
                columns: 2
            })
        );
        assert_eq!(
            Grid::new(2, 2, p(1, 1), p(1, 1)),
            Err(GridError::StartIsFinish(p(1, 1)))
        );
    }

    #[test]
    fn test_neighbor_order() {
        let grid = Grid::new(3, 3, p(0, 0), p(2, 2)).unwrap();

        let center: Vec<Point> = grid.neighbors(p(1, 1)).collect();
        assert_eq!(center, vec![p(0, 1), p(2, 1), p(1, 0), p(1, 2)]);

        let corner: Vec<Point> = grid.neighbors(p(0, 0)).collect();
        assert_eq!(corner, vec![p(1, 0), p(0, 1)]);

        let edge: Vec<Point> = grid.neighbors(p(2, 1)).collect();
        assert_eq!(edge, vec![p(1, 1), p(2, 0), p(2, 2)]);

        assert_eq!(grid.neighbors(p(5, 5)).count(), 0);
    }

    #[test]
    fn test_neighbors_of_skips_walls() {
        let grid = Grid::new(3, 3, p(0, 0), p(2, 2))
            .unwrap()
            .toggle_wall(0, 1)
            .unwrap();

        // plain neighbors still report the wall, the map view does not
        assert_eq!(grid.neighbors(p(1, 1)).count(), 4);
        let open: Vec<Point> = grid.neighbors_of(p(1, 1)).collect();
        assert_eq!(open, vec![p(2, 1), p(1, 0), p(1, 2)]);
        assert!(!grid.is_passable(p(0, 1)));
        assert!(!grid.is_passable(p(3, 0)));
    }

    #[test]
    fn test_toggle_wall_is_a_copy() {
        let grid = Grid::new(2, 3, p(0, 0), p(1, 2)).unwrap();
        let painted = grid.toggle_wall(1, 1).unwrap();

        assert!(!grid.is_wall(p(1, 1)));
        assert!(painted.is_wall(p(1, 1)));
        assert_eq!(painted.walls().collect::<Vec<_>>(), vec![p(1, 1)]);

        let erased = painted.toggle_wall(1, 1).unwrap();
        assert_eq!(erased, grid);

        // start and finish can be walled at this layer
        let blocked = grid.toggle_wall(1, 2).unwrap();
        assert!(blocked.is_wall(blocked.finish()));

        assert!(matches!(
            grid.toggle_wall(2, 0),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_set_wall() {
        let grid = Grid::new(2, 2, p(0, 0), p(1, 1)).unwrap();
        let painted = grid.set_wall(p(0, 1), true).unwrap();
        let again = painted.set_wall(p(0, 1), true).unwrap();

        assert_eq!(painted, again);
        assert!(again.is_wall(p(0, 1)));
        assert!(!again.set_wall(p(0, 1), false).unwrap().is_wall(p(0, 1)));
    }

    #[test]
    fn test_parse_and_display() {
        let layout = "\
...#
.#..
s#.F
";
        // a walled start is allowed in a layout
        let grid: Grid = layout.parse().unwrap();
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.start(), p(2, 0));
        assert_eq!(grid.finish(), p(2, 3));
        assert_eq!(
            grid.walls().collect::<Vec<_>>(),
            vec![p(0, 3), p(1, 1), p(2, 0), p(2, 1)]
        );
        assert_eq!(grid.to_string(), layout);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "S.x\n..F".parse::<Grid>(),
            Err(GridError::Layout {
                line: 1,
                message: "unexpected character 'x'".into()
            })
        );
        assert_eq!(
            "S..\n.F".parse::<Grid>(),
            Err(GridError::Layout {
                line: 2,
                message: "expected 3 columns, found 2".into()
            })
        );
        assert!(matches!(
            "S.S\n..F".parse::<Grid>(),
            Err(GridError::Layout { line: 1, .. })
        ));
        assert!(matches!(
            "S..\n...".parse::<Grid>(),
            Err(GridError::Layout { .. })
        ));
        assert!(matches!(
            "".parse::<Grid>(),
            Err(GridError::Layout { .. })
        ));
    }

    #[test]
    fn test_storage() {
        let grid = Grid::new(2, 3, p(0, 0), p(1, 2)).unwrap();
        let mut storage = grid.create_storage::<usize>();

        *storage.get_mut(p(1, 2)) = 7;
        assert_eq!(storage.get(p(1, 2)), 7);
        assert_eq!(storage.get(p(0, 2)), 0);
        assert!(storage.is_valid(p(1, 0)));
        assert!(!storage.is_valid(p(2, 0)));
        assert_eq!(storage.to_string(), "000\n007\n");
    }
}
