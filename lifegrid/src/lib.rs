//! Conway's Game of Life on a bounded grid with a permanently dead border.

mod engine;
mod error;
mod grid;
pub mod render;
mod rule;
mod seed;
mod simulation;


pub use crate::{
    engine::{Engine, Frontier, UpdateMode},
    error::{Error, Result},
    grid::{Cell, Coord, Dimensions, Grid, GridSize, InteriorView},
    rule::next_state,
    seed::{Seed, fill_random, place_coords},
    simulation::{NoPacing, Pacer, Phase, Renderer, Settings, Simulation},
};
