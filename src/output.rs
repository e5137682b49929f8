use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    thread,
    time::Duration,
};

use lifegrid::{InteriorView, Pacer, Renderer, render};
use log::debug;

/// Prints each generation as text.
pub struct TextFrames<W: Write> {
    out: W,
    glyphs: render::Glyphs,
    error: Option<io::Error>,
}

impl<W: Write> TextFrames<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            glyphs: render::Glyphs::default(),
            error: None,
        }
    }

    /// The first write error, if any frame failed.
    pub fn finish(mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => self.out.flush(),
        }
    }
}

impl<W: Write> Renderer for TextFrames<W> {
    fn render(&mut self, generation: usize, view: InteriorView<'_>) {
        if self.error.is_some() {
            return;
        }
        let text = render::text(view, self.glyphs);
        if let Err(err) = writeln!(self.out, "generation {generation}\n{text}\n") {
            self.error = Some(err);
        }
    }
}

/// Writes each generation as a binary PPM image into a directory.
pub struct ImageFrames {
    dir: PathBuf,
    settings: render::Settings,
    error: Option<io::Error>,
}

impl ImageFrames {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            settings: render::Settings::default(),
            error: None,
        }
    }

    pub fn finish(self) -> io::Result<()> {
        self.error.map_or(Ok(()), Err)
    }

    fn write(&self, generation: usize, view: InteriorView<'_>) -> io::Result<()> {
        let image = render::image(view, self.settings);
        let path = self.dir.join(format!("frame_{generation:05}.ppm"));
        let mut out = BufWriter::new(File::create(&path)?);
        write!(out, "P6\n{} {}\n255\n", image.width, image.height)?;
        out.write_all(&image.to_rgb8())?;
        out.flush()?;
        debug!("wrote {}", path.display());
        Ok(())
    }
}

impl Renderer for ImageFrames {
    fn render(&mut self, generation: usize, view: InteriorView<'_>) {
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.write(generation, view) {
            self.error = Some(err);
        }
    }
}

/// Sleeps the calling thread between frames.
pub struct Sleep;

impl Pacer for Sleep {
    fn pause(&mut self, delay: Duration) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
