use std::time::Duration;

use log::{debug, trace};

use crate::{
    engine::{Engine, UpdateMode},
    error::{Error, Result},
    grid::{Grid, GridSize, InteriorView},
    seed::Seed,
};

/// Receives every generation the simulation produces, starting with the
/// initial one.
pub trait Renderer {
    fn render(&mut self, generation: usize, view: InteriorView<'_>);
}

/// Waits between rendered frames.
pub trait Pacer {
    fn pause(&mut self, delay: Duration);
}

/// Runs frames back to back.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn pause(&mut self, _delay: Duration) {}
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub size: GridSize,
    pub generations: usize,
    pub update_mode: UpdateMode,
    pub seed: Seed,
    pub delay: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Ready,
    Running,
    Terminated,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    grid: Grid,
    engine: Engine,
    generation: usize,
    generations: usize,
    delay: Duration,
    phase: Phase,
    rejected: Vec<Error>,
}

impl Simulation {
    /// Builds and seeds the grid. Every fatal configuration problem surfaces
    /// here, so a `Simulation` is always able to run.
    pub fn new(settings: Settings) -> Result<Self> {
        let Settings {
            size,
            generations,
            update_mode,
            seed,
            delay,
        } = settings;
        let dims = size.resolve()?;
        let mut grid = Grid::new(dims);
        let rejected = seed.apply(&mut grid)?;
        debug!(
            "seeded {}x{} grid with {} live cells ({} seed cells rejected)",
            dims.height(),
            dims.width(),
            grid.interior_view().population(),
            rejected.len()
        );
        Ok(Self {
            grid,
            engine: Engine::new(update_mode),
            generation: 0,
            generations,
            delay,
            phase: Phase::Ready,
            rejected,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn update_mode(&self) -> UpdateMode {
        self.engine.mode()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn view(&self) -> InteriorView<'_> {
        self.grid.interior_view()
    }

    /// Seed coordinates that fell outside the grid.
    pub fn rejected_seeds(&self) -> &[Error] {
        &self.rejected
    }

    /// Advances one generation. Does nothing once terminated.
    pub fn step(&mut self) {
        if self.phase == Phase::Terminated {
            return;
        }
        self.grid = self.engine.step(&self.grid);
        self.generation += 1;
        trace!(
            "generation {}: {} alive",
            self.generation,
            self.grid.interior_view().population()
        );
    }

    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Moves a ready simulation to `Running`. Returns false if it already
    /// started.
    pub fn begin(&mut self) -> bool {
        if self.phase != Phase::Ready {
            return false;
        }
        debug!(
            "starting at generation {} of {} in {:?} mode",
            self.generation,
            self.generations,
            self.engine.mode()
        );
        self.phase = Phase::Running;
        self.finish_if_done();
        true
    }

    /// Steps once while running and below the generation bound. Returns
    /// whether a new generation was produced.
    pub fn advance(&mut self) -> bool {
        if self.phase != Phase::Running {
            return false;
        }
        self.step();
        self.finish_if_done();
        true
    }

    fn finish_if_done(&mut self) {
        if self.generation >= self.generations {
            self.phase = Phase::Terminated;
            debug!("terminated after generation {}", self.generation);
        }
    }

    /// Renders the current generation, then steps and renders until the
    /// configured generation is reached, pausing after each one.
    pub fn start(&mut self, renderer: &mut impl Renderer, pacer: &mut impl Pacer) {
        if !self.begin() {
            return;
        }
        renderer.render(self.generation, self.grid.interior_view());
        while self.advance() {
            renderer.render(self.generation, self.grid.interior_view());
            pacer.pause(self.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(seed: Seed) -> Settings {
        Settings {
            size: GridSize::Square(5),
            generations: 4,
            update_mode: UpdateMode::AliveBased,
            seed,
            delay: Duration::from_millis(25),
        }
    }

    #[derive(Default)]
    struct Frames(Vec<(usize, String)>);

    impl Renderer for Frames {
        fn render(&mut self, generation: usize, view: InteriorView<'_>) {
            self.0.push((generation, view.to_string()));
        }
    }

    #[derive(Default)]
    struct CountingPacer(Vec<Duration>);

    impl Pacer for CountingPacer {
        fn pause(&mut self, delay: Duration) {
            self.0.push(delay);
        }
    }

    #[test]
    fn test_invalid_size() {
        let mut s = settings(Seed::Coords(vec![]));
        s.size = GridSize::Pair(vec![3, 0]);
        assert!(matches!(
            Simulation::new(s),
            Err(Error::InvalidGridSize(_))
        ));
    }

    #[test]
    fn test_invalid_probability() {
        let s = settings(Seed::Random {
            probability: 2.0,
            rng_seed: None,
        });
        assert_eq!(
            Simulation::new(s).err(),
            Some(Error::InvalidProbability(2.0))
        );
    }

    #[test]
    fn test_mismatched_array() {
        let s = settings(Seed::Array(vec![vec![0; 5]; 4]));
        assert_eq!(
            Simulation::new(s).err(),
            Some(Error::DimensionMismatch {
                expected: (5, 5),
                actual: (4, 5)
            })
        );
    }

    #[test]
    fn test_start_runs_to_termination() {
        // Blinker, period 2.
        let seed = Seed::Coords(vec![(1, 2), (2, 2), (3, 2)]);
        let mut sim = Simulation::new(settings(seed)).unwrap();
        assert_eq!(sim.phase(), Phase::Ready);
        let mut frames = Frames::default();
        let mut pacer = CountingPacer::default();
        sim.start(&mut frames, &mut pacer);
        let frames = frames.0;
        assert_eq!(sim.phase(), Phase::Terminated);
        assert_eq!(sim.generation(), 4);
        assert_eq!(frames.len(), 5);
        assert_eq!(pacer.0, vec![Duration::from_millis(25); 4]);
        let generations: Vec<usize> = frames.iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, [0, 1, 2, 3, 4]);
        assert_eq!(frames[0].1, frames[2].1);
        assert_eq!(frames[1].1, ".....\n..o..\n..o..\n..o..\n.....");
        assert_eq!(frames[4].1, frames[0].1);
    }

    #[test]
    fn test_start_after_termination_is_noop() {
        let mut sim = Simulation::new(settings(Seed::Coords(vec![(0, 0)]))).unwrap();
        sim.start(&mut Frames::default(), &mut NoPacing);
        let mut frames = Frames::default();
        sim.start(&mut frames, &mut NoPacing);
        assert!(frames.0.is_empty());
        sim.step();
        assert_eq!(sim.generation(), 4);
    }

    #[test]
    fn test_start_after_manual_steps_stops_at_bound() {
        let mut sim = Simulation::new(settings(Seed::Coords(vec![(1, 2), (2, 2), (3, 2)]))).unwrap();
        sim.step();
        sim.step();
        let mut frames = Frames::default();
        let mut pacer = CountingPacer::default();
        sim.start(&mut frames, &mut pacer);
        assert_eq!(sim.generation(), 4);
        assert_eq!(sim.phase(), Phase::Terminated);
        let generations: Vec<usize> = frames.0.iter().map(|(g, _)| *g).collect();
        assert_eq!(generations, [2, 3, 4]);
        assert_eq!(pacer.0.len(), 2);
    }

    #[test]
    fn test_start_past_bound_renders_once() {
        let mut sim = Simulation::new(settings(Seed::Coords(vec![]))).unwrap();
        for _ in 0..6 {
            sim.step();
        }
        let mut frames = Frames::default();
        sim.start(&mut frames, &mut NoPacing);
        assert_eq!(frames.0.len(), 1);
        assert_eq!(sim.generation(), 6);
        assert_eq!(sim.phase(), Phase::Terminated);
    }

    #[test]
    fn test_advance_one_frame_at_a_time() {
        let mut sim = Simulation::new(settings(Seed::Coords(vec![(2, 2)]))).unwrap();
        assert!(!sim.advance());
        assert!(sim.begin());
        assert!(!sim.begin());
        let mut steps = 0;
        while sim.advance() {
            steps += 1;
        }
        assert_eq!(steps, 4);
        assert_eq!(sim.generation(), sim.generations());
        assert_eq!(sim.phase(), Phase::Terminated);
    }

    #[test]
    fn test_zero_generations() {
        let mut s = settings(Seed::Coords(vec![]));
        s.generations = 0;
        let mut sim = Simulation::new(s).unwrap();
        let mut frames = Frames::default();
        sim.start(&mut frames, &mut NoPacing);
        assert_eq!(frames.0.len(), 1);
        assert_eq!(sim.phase(), Phase::Terminated);
    }

    #[test]
    fn test_extinct_population_runs_full_count() {
        let mut sim = Simulation::new(settings(Seed::Coords(vec![(2, 2)]))).unwrap();
        let mut frames = Frames::default();
        sim.start(&mut frames, &mut NoPacing);
        let populations: Vec<usize> = frames
            .0
            .iter()
            .map(|(_, text)| text.matches('o').count())
            .collect();
        assert_eq!(populations, [1, 0, 0, 0, 0]);
    }

    #[test]
    fn test_rejected_seeds_are_kept() {
        let sim = Simulation::new(settings(Seed::Coords(vec![(9, 9), (1, 1)]))).unwrap();
        assert_eq!(sim.rejected_seeds().len(), 1);
        assert_eq!(sim.view().population(), 1);
        assert_eq!(sim.update_mode(), UpdateMode::AliveBased);
    }
}
