use std::{collections::HashSet, str::FromStr};

use log::{debug, trace};

use crate::{
    error::Error,
    grid::{Coord, Grid},
    rule::next_state,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateMode {
    /// Re-evaluate every interior cell each step.
    All,
    /// Re-evaluate only live cells and their neighbours.
    AliveBased,
}

impl FromStr for UpdateMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(UpdateMode::All),
            "alive_based" => Ok(UpdateMode::AliveBased),
            _ => Err(Error::unsupported("update", s)),
        }
    }
}

/// Computes successive generations of a [`Grid`].
///
/// Steps never write to the grid they read; they hand back a new one.
#[derive(Clone, Debug)]
pub enum Engine {
    FullScan,
    Frontier(Frontier),
}

impl Engine {
    pub fn new(mode: UpdateMode) -> Self {
        match mode {
            UpdateMode::All => Engine::FullScan,
            UpdateMode::AliveBased => Engine::Frontier(Frontier::default()),
        }
    }

    pub fn mode(&self) -> UpdateMode {
        match self {
            Engine::FullScan => UpdateMode::All,
            Engine::Frontier(_) => UpdateMode::AliveBased,
        }
    }

    pub fn step(&mut self, current: &Grid) -> Grid {
        match self {
            Engine::FullScan => full_scan(current),
            Engine::Frontier(frontier) => frontier.step(current),
        }
    }

    /// Forgets any tracked cells; the next step rescans the grid it is given.
    pub fn reset(&mut self) {
        if let Engine::Frontier(frontier) = self {
            *frontier = Frontier::default();
        }
    }
}

fn full_scan(current: &Grid) -> Grid {
    let mut next = current.clone();
    for p in current.interior() {
        let cell = next_state(current.get(p), current.live_neighbours(p));
        next.set(p, cell);
    }
    next
}

/// Tracks the live cells of the last generation so a step only visits them
/// and their neighbours.
///
/// The set is `None` until the first step, which primes it by scanning the
/// whole interior. From then on the grid passed to
/// [`Frontier::step`] must be the one the previous step returned.
#[derive(Clone, Debug, Default)]
pub struct Frontier {
    active: Option<HashSet<Coord>>,
}

impl Frontier {
    pub fn is_primed(&self) -> bool {
        self.active.is_some()
    }

    /// Live cells (bordered coordinates) as of the last step.
    pub fn active_cells(&self) -> Option<&HashSet<Coord>> {
        self.active.as_ref()
    }

    pub fn step(&mut self, current: &Grid) -> Grid {
        let active = self.active.get_or_insert_with(|| {
            let active: HashSet<Coord> = current.live_cells().collect();
            debug!("primed frontier with {} live cells", active.len());
            active
        });
        let mut next = current.clone();
        if active.is_empty() {
            return next;
        }
        let candidates: HashSet<Coord> = active
            .iter()
            .flat_map(|&p| current.neighbourhood(p))
            .collect();
        trace!(
            "frontier step: {} active, {} candidates",
            active.len(),
            candidates.len()
        );
        active.clear();
        for p in candidates {
            let cell = next_state(current.get(p), current.live_neighbours(p));
            next.set(p, cell);
            if cell.is_alive() {
                active.insert(p);
            }
        }
        next
    }
}
