use std::time::Instant;

use eframe::{CreationContext, Frame};
use egui::{
    Color32, ColorImage, Context, TextureHandle, TextureOptions, Vec2, load::SizedTexture,
};
use lifegrid::{InteriorView, Phase, Simulation, render};
use log::info;

/// Shows the simulation in a window, one generation per repaint.
pub struct App {
    sim: Simulation,
    texture: Option<TextureHandle>,
    settings: render::Settings,
    /// Generation and scale of the texture on screen.
    shown: Option<(usize, usize)>,
    last_step: Instant,
}

impl App {
    pub fn new(_cc: &CreationContext<'_>, mut sim: Simulation) -> Self {
        sim.begin();
        Self {
            sim,
            texture: None,
            settings: render::Settings::default(),
            shown: None,
            last_step: Instant::now(),
        }
    }

    fn advance(&mut self) {
        if self.sim.phase() != Phase::Running || self.last_step.elapsed() < self.sim.delay() {
            return;
        }
        self.sim.advance();
        self.last_step = Instant::now();
        if self.sim.phase() == Phase::Terminated {
            info!(
                "Finished after {} generations with {} live cells",
                self.sim.generation(),
                self.sim.view().population()
            );
        }
    }
}

/// Largest whole number of pixels per cell that fits `available`.
pub fn fit_scale(available: Vec2, width: usize, height: usize) -> usize {
    let across = available.x.max(0.) as usize / width.max(1);
    let down = available.y.max(0.) as usize / height.max(1);
    across.min(down).max(1)
}

pub fn color_image(view: InteriorView<'_>, settings: render::Settings) -> ColorImage {
    let image = render::image(view, settings);
    let pixels: Vec<Color32> = image.pixels.into_iter().map(From::from).collect();
    ColorImage::new([image.width, image.height], pixels)
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.advance();
        egui::TopBottomPanel::top("status").show(ctx, |ui| {
            ui.label(format!(
                "generation {} / {}    alive {}",
                self.sim.generation(),
                self.sim.generations(),
                self.sim.view().population()
            ));
        });
        egui::CentralPanel::default().show(ctx, |ui| {
            let view = self.sim.view();
            let scale = fit_scale(ui.available_size(), view.width(), view.height());
            let current = (self.sim.generation(), scale);
            let texture = match self.texture.take() {
                Some(t) if self.shown == Some(current) => t,
                texture => {
                    self.settings.scale = scale;
                    let image = color_image(view, self.settings);
                    let options = TextureOptions::NEAREST;
                    match texture {
                        Some(mut t) if t.size() == image.size => {
                            t.set(image, options);
                            t
                        }
                        _ => ctx.load_texture("lifegrid", image, options),
                    }
                }
            };
            self.shown = Some(current);
            let size = texture.size_vec2();
            let sized_texture = SizedTexture::new(&texture, size);
            ui.add(egui::Image::new(sized_texture).fit_to_exact_size(size));
            self.texture = Some(texture);
        });
        if self.sim.phase() == Phase::Running {
            let remaining = self.sim.delay().saturating_sub(self.last_step.elapsed());
            ctx.request_repaint_after(remaining);
        }
    }
}
