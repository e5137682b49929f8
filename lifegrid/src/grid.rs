use std::{
    fmt::{Display, Write},
    str::FromStr,
};

use itertools::Itertools;
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }
}

impl From<bool> for Cell {
    fn from(alive: bool) -> Self {
        if alive { Cell::Alive } else { Cell::Dead }
    }
}

impl From<u8> for Cell {
    fn from(value: u8) -> Self {
        Cell::from(value != 0)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        cell.is_alive() as u8
    }
}

/// A position in the bordered grid: `x` is the column, `y` the row.
///
/// Interior cells live in `1..=width` by `1..=height`; index `0` and
/// `width + 1` / `height + 1` are the dead border.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Interior size of a grid. Both sides are at least one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    height: usize,
    width: usize,
}

impl Dimensions {
    pub fn new(height: usize, width: usize) -> Result<Self> {
        if height == 0 || width == 0 {
            return Err(Error::InvalidGridSize(format!(
                "{height}x{width} has an empty side"
            )));
        }
        let cells = height
            .checked_add(2)
            .zip(width.checked_add(2))
            .and_then(|(h, w)| h.checked_mul(w))
            .and_then(|n| n.checked_mul(size_of::<Cell>()))
            .filter(|&bytes| bytes <= isize::MAX as usize);
        if cells.is_none() {
            return Err(Error::InvalidGridSize(format!(
                "{height}x{width} is too large to allocate"
            )));
        }
        Ok(Self { height, width })
    }

    pub fn square(edge: usize) -> Result<Self> {
        Self::new(edge, edge)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

/// Grid size as it appears in configuration: a single edge length or a
/// `[height, width]` pair.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum GridSize {
    Square(i64),
    Pair(Vec<i64>),
}

impl GridSize {
    pub fn resolve(&self) -> Result<Dimensions> {
        fn side(n: i64) -> Result<usize> {
            match usize::try_from(n) {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(Error::InvalidGridSize(format!("{n} is not a positive size"))),
            }
        }
        match self {
            GridSize::Square(edge) => Dimensions::square(side(*edge)?),
            GridSize::Pair(pair) => match pair.as_slice() {
                &[height, width] => Dimensions::new(side(height)?, side(width)?),
                other => Err(Error::InvalidGridSize(format!(
                    "expected [height, width], got {} values",
                    other.len()
                ))),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dims: Dimensions,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(dims: Dimensions) -> Self {
        let cells = vec![Cell::Dead; (dims.height + 2) * (dims.width + 2)];
        Self { dims, cells }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn height(&self) -> usize {
        self.dims.height
    }

    pub fn width(&self) -> usize {
        self.dims.width
    }

    /// Copies a `height x width` array of 0/1 values into the interior.
    /// Any nonzero value counts as alive.
    pub fn set_interior<R: AsRef<[u8]>>(&mut self, rows: &[R]) -> Result<()> {
        let expected = (self.dims.height, self.dims.width);
        let actual_width = rows
            .iter()
            .map(|row| row.as_ref().len())
            .find(|&len| len != self.dims.width)
            .unwrap_or(self.dims.width);
        let actual = (rows.len(), actual_width);
        if actual != expected {
            return Err(Error::DimensionMismatch { expected, actual });
        }
        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.as_ref().iter().enumerate() {
                self.set(Coord::new(x + 1, y + 1), Cell::from(value));
            }
        }
        Ok(())
    }

    /// Counts the live cells among the eight neighbours of an interior cell.
    pub fn live_neighbours(&self, p: Coord) -> u8 {
        debug_assert!(self.is_interior(p), "{p:?} is not an interior cell");
        let i = self.index(p);
        let s = self.stride();
        [
            i - s - 1,
            i - s,
            i - s + 1,
            i - 1,
            i + 1,
            i + s - 1,
            i + s,
            i + s + 1,
        ]
        .into_iter()
        .filter(|&j| self.cells[j].is_alive())
        .count() as u8
    }

    pub fn interior_view(&self) -> InteriorView<'_> {
        InteriorView { grid: self }
    }

    pub fn border_is_dead(&self) -> bool {
        let (h, w) = (self.dims.height, self.dims.width);
        let rows = [0, h + 1].into_iter().cartesian_product(0..w + 2);
        let cols = (1..=h).cartesian_product([0, w + 1]);
        rows.chain(cols)
            .all(|(y, x)| !self.get(Coord::new(x, y)).is_alive())
    }
}

impl Grid {
    fn stride(&self) -> usize {
        self.dims.width + 2
    }

    fn index(&self, Coord { x, y }: Coord) -> usize {
        y * self.stride() + x
    }

    pub(crate) fn is_interior(&self, Coord { x, y }: Coord) -> bool {
        (1..=self.dims.width).contains(&x) && (1..=self.dims.height).contains(&y)
    }

    pub(crate) fn get(&self, p: Coord) -> Cell {
        self.cells[self.index(p)]
    }

    pub(crate) fn set(&mut self, p: Coord, cell: Cell) {
        debug_assert!(self.is_interior(p), "border cell {p:?} must stay dead");
        let i = self.index(p);
        self.cells[i] = cell;
    }

    /// Every interior coordinate, row by row.
    pub(crate) fn interior(&self) -> impl Iterator<Item = Coord> + use<> {
        (1..=self.dims.height)
            .cartesian_product(1..=self.dims.width)
            .map(|(y, x)| Coord { x, y })
    }

    /// `p` and its Moore neighbours, clipped to the interior.
    pub(crate) fn neighbourhood(
        &self,
        Coord { x, y }: Coord,
    ) -> impl Iterator<Item = Coord> + use<> {
        let ys = y.max(2) - 1..=(y + 1).min(self.dims.height);
        let xs = x.max(2) - 1..=(x + 1).min(self.dims.width);
        ys.cartesian_product(xs).map(|(y, x)| Coord { x, y })
    }

    pub(crate) fn live_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.interior().filter(|&p| self.get(p).is_alive())
    }
}

/// Read-only window onto the interior of a [`Grid`], indexed from zero.
#[derive(Clone, Copy)]
pub struct InteriorView<'a> {
    grid: &'a Grid,
}

impl<'a> InteriorView<'a> {
    pub fn height(&self) -> usize {
        self.grid.dims.height
    }

    pub fn width(&self) -> usize {
        self.grid.dims.width
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        (x < self.width() && y < self.height())
            .then(|| self.grid.get(Coord::new(x + 1, y + 1)))
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a [Cell]> + use<'a> {
        let grid = self.grid;
        let (stride, width) = (grid.stride(), grid.dims.width);
        (1..=grid.dims.height).map(move |y| {
            let start = y * stride + 1;
            &grid.cells[start..start + width]
        })
    }

    /// Zero-based `(x, y)` positions of the live cells, row by row.
    pub fn live_cells(&self) -> impl Iterator<Item = (usize, usize)> + use<'a> {
        self.grid.live_cells().map(|Coord { x, y }| (x - 1, y - 1))
    }

    pub fn population(&self) -> usize {
        self.rows().flatten().filter(|cell| cell.is_alive()).count()
    }

    pub fn to_array(&self) -> Vec<Vec<u8>> {
        self.rows()
            .map(|row| row.iter().map(|&cell| u8::from(cell)).collect())
            .collect()
    }
}

impl Display for InteriorView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (y, row) in self.rows().enumerate() {
            if y > 0 {
                f.write_char('\n')?;
            }
            for cell in row {
                f.write_char(if cell.is_alive() { 'o' } else { '.' })?;
            }
        }
        Ok(())
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.interior_view().fmt(f)
    }
}

impl FromStr for Grid {
    type Err = String;

    /// Parses one row per non-blank line, `o` for alive and `.` for dead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|c| match c {
                        'o' => Ok(1),
                        '.' => Ok(0),
                        _ => Err(format!("Unexpected character {c}")),
                    })
                    .collect::<Result<Vec<u8>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        let width = rows.first().map_or(0, Vec::len);
        let dims = Dimensions::new(rows.len(), width).map_err(|e| e.to_string())?;
        let mut grid = Grid::new(dims);
        grid.set_interior(&rows).map_err(|e| e.to_string())?;
        Ok(grid)
    }
}
