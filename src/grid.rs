use derive_more::Display;
use smallvec::SmallVec;
use thiserror::Error;

type Coord = u32;

const MAX_ELEMENTS_DISPLAYED: usize = 40;

/// A cell address as `(row, col)`, row 0 at the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: Coord,
    pub col: Coord,
}

impl Position {
    #[inline(always)]
    pub fn new(row: Coord, col: Coord) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum CellType {
    #[display("█")]
    Wall,
    #[display("░")]
    Free,
    #[display("S")]
    Start,
    #[display("G")]
    Goal,
}

impl CellType {
    /// Start and Goal cells are walkable too.
    #[inline(always)]
    pub fn is_traversable(&self) -> bool {
        *self != CellType::Wall
    }
}

#[derive(Debug, Error)]
pub enum CellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for CellType {
    type Error = CellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            '0' => Ok(CellType::Free),
            '1' => Ok(CellType::Wall),
            '2' => Ok(CellType::Start),
            '3' => Ok(CellType::Goal),
            ch => Err(CellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Debug, Error)]
pub enum GridParseError {
    #[error("Empty maze input")]
    EmptyMaze,
    #[error("Invalid cell at ({row},{col}): {e}")]
    InvalidCell {
        e: CellParseError,
        row: usize,
        col: usize,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("No {0:?} cell in the grid")]
    NotFound(CellType),
    #[error("{count} {cell:?} cells in the grid, first at {first}")]
    Ambiguous {
        cell: CellType,
        first: Position,
        count: usize,
    },
}

/// An immutable rectangular maze.
///
/// Rows may come in ragged from the text format; short rows are right-padded
/// with `Wall` so every row has the same width.
#[derive(Clone)]
pub struct Grid {
    cells: Vec<Vec<CellType>>,
}

impl Grid {
    pub fn new_from_cells(cells: Vec<Vec<CellType>>) -> Self {
        debug_assert!(cells.iter().all(|r| r.len() == cells[0].len()));
        Self { cells }
    }

    /// `(rows, cols)`
    pub fn dimensions(&self) -> (Coord, Coord) {
        if self.cells.is_empty() {
            return (0, 0);
        }
        (self.cells.len() as Coord, self.cells[0].len() as Coord)
    }

    #[inline(always)]
    pub fn in_bounds(&self, pos: Position) -> bool {
        let (rows, cols) = self.dimensions();
        pos.row < rows && pos.col < cols
    }

    #[inline(always)]
    pub fn classify(&self, pos: Position) -> CellType {
        debug_assert!(self.in_bounds(pos));
        self.cells[pos.row as usize][pos.col as usize]
    }

    /// Traversable neighbours of `pos` in the fixed order North, East,
    /// South, West.
    ///
    /// The order decides which of two equally-ranked cells gets expanded
    /// first, so the whole step trace depends on it.
    pub fn neighbors(&self, pos: Position) -> SmallVec<[Position; 4]> {
        let (rows, cols) = self.dimensions();
        let mut v = SmallVec::<[Position; 4]>::new();

        // Wrapping add with Coord::MAX is a bounds-checked decrement.
        let prev = Coord::MAX;
        let same: Coord = 0;
        let next: Coord = 1;

        for (dr, dc) in [
            (prev, same), // North
            (same, next), // East
            (next, same), // South
            (same, prev), // West
        ] {
            let row = pos.row.wrapping_add(dr);
            let col = pos.col.wrapping_add(dc);
            if row < rows && col < cols {
                let n = Position::new(row, col);
                debug_assert!(self.in_bounds(n));
                if self.classify(n).is_traversable() {
                    v.push(n);
                }
            }
        }
        v
    }

    /// First occurrence of `cell` in row-major order (lowest row, then
    /// lowest column).
    pub fn locate_first(&self, cell: CellType) -> Option<Position> {
        self.occurrences(cell).next()
    }

    /// The unique occurrence of `cell`.
    pub fn locate(&self, cell: CellType) -> Result<Position, LocateError> {
        let mut it = self.occurrences(cell);
        let first = it.next().ok_or(LocateError::NotFound(cell))?;
        let extra = it.count();
        if extra > 0 {
            return Err(LocateError::Ambiguous {
                cell,
                first,
                count: extra + 1,
            });
        }
        Ok(first)
    }

    fn occurrences(&self, cell: CellType) -> impl Iterator<Item = Position> + '_ {
        self.cells.iter().enumerate().flat_map(move |(r, row)| {
            row.iter().enumerate().filter_map(move |(c, cl)| {
                (*cl == cell).then(|| Position::new(r as Coord, c as Coord))
            })
        })
    }
}

impl std::convert::TryFrom<&str> for Grid {
    type Error = GridParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.trim().is_empty()).collect();
        if lines.is_empty() {
            return Err(GridParseError::EmptyMaze);
        }

        let cols = lines
            .iter()
            .map(|l| l.trim_end().chars().count())
            .max()
            .unwrap_or(0);
        if cols == 0 {
            return Err(GridParseError::EmptyMaze);
        }

        let mut cells = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut cells_row = Vec::with_capacity(cols);
            for (col, ch) in line.trim_end().chars().enumerate() {
                let cell = CellType::try_from(ch)
                    .map_err(|e| GridParseError::InvalidCell { e, row, col })?;
                cells_row.push(cell);
            }
            // Ragged rows are padded with walls
            cells_row.resize(cols, CellType::Wall);
            cells.push(cells_row);
        }

        Ok(Grid::new_from_cells(cells))
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.dimensions();
        writeln!(f, "Grid({}x{}):", d.0, d.1)?;
        for line in self.cells.iter().take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid{:?}", self.dimensions())
    }
}

#[derive(Debug, Error)]
pub enum MazeError {
    #[error("{0}")]
    Parse(#[from] GridParseError),
    #[error("Missing {0:?} cell")]
    MissingEndpoint(CellType),
    #[error("Endpoint {0} is out of bounds or a wall")]
    InvalidEndpoint(Position),
}

/// A well-formed search problem: a grid plus its resolved start and goal.
///
/// Duplicate Start/Goal cells resolve to the first occurrence in row-major
/// order; the duplicates stay traversable. `Maze` is read-only once built,
/// so several searches can borrow the same instance.
#[derive(Clone, Debug)]
pub struct Maze {
    grid: Grid,
    start: Position,
    goal: Position,
}

impl Maze {
    pub fn new(grid: Grid) -> Result<Self, MazeError> {
        let start = Self::resolve_endpoint(&grid, CellType::Start)?;
        let goal = Self::resolve_endpoint(&grid, CellType::Goal)?;
        Ok(Self { grid, start, goal })
    }

    /// Builds a maze with explicit endpoints, ignoring any `Start`/`Goal`
    /// cells in the grid. Start and goal may coincide.
    pub fn with_endpoints(grid: Grid, start: Position, goal: Position) -> Result<Self, MazeError> {
        for pos in [start, goal] {
            if !grid.in_bounds(pos) || !grid.classify(pos).is_traversable() {
                return Err(MazeError::InvalidEndpoint(pos));
            }
        }
        Ok(Self { grid, start, goal })
    }

    fn resolve_endpoint(grid: &Grid, cell: CellType) -> Result<Position, MazeError> {
        match grid.locate(cell) {
            Ok(pos) => Ok(pos),
            Err(LocateError::Ambiguous { first, count, .. }) => {
                log::warn!("{count} {cell:?} cells, using the first at {first}");
                Ok(first)
            }
            Err(LocateError::NotFound(c)) => Err(MazeError::MissingEndpoint(c)),
        }
    }

    #[inline(always)]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }
    #[inline(always)]
    pub fn start(&self) -> Position {
        self.start
    }
    #[inline(always)]
    pub fn goal(&self) -> Position {
        self.goal
    }

    #[inline(always)]
    pub fn neighbors(&self, pos: Position) -> SmallVec<[Position; 4]> {
        self.grid.neighbors(pos)
    }
}

impl std::convert::TryFrom<&str> for Maze {
    type Error = MazeError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Maze::new(Grid::try_from(s)?)
    }
}

impl std::fmt::Display for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let d = self.grid.dimensions();
        writeln!(f, "Maze({}x{}) (s:{}, g:{}):", d.0, d.1, self.start, self.goal)?;
        write!(f, "{}", self.grid)
    }
}
