use std::{fs, io, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use lifegrid::Simulation;
use log::info;

use crate::{
    app::App,
    config::{Config, Visualization},
    output::{ImageFrames, Sleep, TextFrames},
};

mod app;
mod config;
mod input;
mod output;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("config.yaml"), PathBuf::from);
    let config = Config::load(&path)?;
    let visualization = config.visualization()?;
    let settings = config.settings(|| {
        eprintln!("Enter live cells as `x y`, one per line. Finish with `done` or EOF.");
        input::read_coords(io::stdin().lock()).context("reading coordinates")
    })?;

    info!(
        "Starting Game of Life with grid size {:?}, max steps {}, update mode {:?}, visualization {:?}",
        config.grid_size, config.max_steps, settings.update_mode, visualization
    );
    let mut sim = Simulation::new(settings)?;

    match visualization {
        Visualization::Text => {
            let mut frames = TextFrames::new(io::stdout().lock());
            sim.start(&mut frames, &mut Sleep);
            frames.finish().context("writing frames")?;
        }
        Visualization::Image { output_dir } => {
            fs::create_dir_all(&output_dir)
                .with_context(|| format!("creating {}", output_dir.display()))?;
            let mut frames = ImageFrames::new(output_dir);
            sim.start(&mut frames, &mut Sleep);
            frames.finish().context("writing frames")?;
        }
        Visualization::Graphical => {
            let options = eframe::NativeOptions {
                viewport: egui::ViewportBuilder::default().with_inner_size([800., 600.]),
                ..Default::default()
            };
            return eframe::run_native(
                "Game of Life",
                options,
                Box::new(move |cc| Ok(Box::new(App::new(cc, sim)))),
            )
            .map_err(|e| anyhow!("viewer failed: {e}"));
        }
    }
    info!(
        "Finished after {} generations with {} live cells",
        sim.generation(),
        sim.view().population()
    );
    Ok(())
}
