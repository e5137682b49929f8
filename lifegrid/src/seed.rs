use log::warn;
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    error::{Error, Result},
    grid::{Cell, Coord, Grid},
};

/// Where the first generation comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Seed {
    /// Each interior cell is alive with `probability`. A fixed `rng_seed`
    /// makes the draw reproducible.
    Random {
        probability: f64,
        rng_seed: Option<u64>,
    },
    /// A `height x width` array of 0/1, e.g. a previously saved grid.
    Array(Vec<Vec<u8>>),
    /// Zero-based `(x, y)` positions of the live cells.
    Coords(Vec<(i64, i64)>),
}

impl Seed {
    /// Rejects seeds that can never apply, before any grid exists.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Seed::Random { probability, .. } => check_probability(probability),
            _ => Ok(()),
        }
    }

    /// Populates the interior of `grid`. Out of range coordinates are not
    /// fatal: they are logged, skipped and handed back.
    pub fn apply(&self, grid: &mut Grid) -> Result<Vec<Error>> {
        self.validate()?;
        match self {
            Seed::Random {
                probability,
                rng_seed,
            } => {
                let mut rng = match rng_seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_os_rng(),
                };
                fill_random(grid, *probability, &mut rng).map(|()| vec![])
            }
            Seed::Array(rows) => grid.set_interior(rows).map(|()| vec![]),
            Seed::Coords(coords) => Ok(place_coords(grid, coords)),
        }
    }
}

fn check_probability(probability: f64) -> Result<()> {
    match (0.0..=1.0).contains(&probability) {
        true => Ok(()),
        false => Err(Error::InvalidProbability(probability)),
    }
}

/// Makes each interior cell alive with `probability`, which must lie in
/// `[0, 1]`.
pub fn fill_random<R: Rng>(grid: &mut Grid, probability: f64, rng: &mut R) -> Result<()> {
    check_probability(probability)?;
    for p in grid.interior() {
        grid.set(p, Cell::from(rng.random_bool(probability)));
    }
    Ok(())
}

pub fn place_coords(grid: &mut Grid, coords: &[(i64, i64)]) -> Vec<Error> {
    let (width, height) = (grid.width(), grid.height());
    let mut rejected = vec![];
    for &(x, y) in coords {
        let inside = |v: i64, limit: usize| usize::try_from(v).ok().filter(|&v| v < limit);
        match (inside(x, width), inside(y, height)) {
            (Some(x), Some(y)) => grid.set(Coord::new(x + 1, y + 1), Cell::Alive),
            _ => {
                let err = Error::CoordinateOutOfBounds {
                    x,
                    y,
                    width,
                    height,
                };
                warn!("skipping seed cell: {err}");
                rejected.push(err);
            }
        }
    }
    rejected
}
