use egui::{Color32, Rgba};

use crate::grid::InteriorView;

#[derive(Clone, Copy, Debug)]
pub struct Glyphs {
    pub alive: char,
    pub dead: char,
}

impl Default for Glyphs {
    fn default() -> Self {
        Self {
            alive: 'o',
            dead: '.',
        }
    }
}

/// One line per row.
pub fn text(view: InteriorView<'_>, glyphs: Glyphs) -> String {
    let mut out = String::with_capacity(view.height() * (view.width() + 1));
    for (y, row) in view.rows().enumerate() {
        if y > 0 {
            out.push('\n');
        }
        out.extend(
            row.iter()
                .map(|cell| if cell.is_alive() { glyphs.alive } else { glyphs.dead }),
        );
    }
    out
}

#[derive(Clone, Copy, Debug)]
pub struct Settings {
    /// Side of the pixel square drawn for each cell.
    pub scale: usize,
    pub dead_rgba: Rgba,
    pub alive_rgba: Rgba,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scale: 8,
            dead_rgba: Rgba::WHITE,
            alive_rgba: Rgba::BLACK,
        }
    }
}

/// A row-major pixel buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Rgba>,
}

impl Image {
    /// Packed 8-bit sRGB triples, row by row.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&rgba| {
                let c = Color32::from(rgba);
                [c.r(), c.g(), c.b()]
            })
            .collect()
    }
}

pub fn image(view: InteriorView<'_>, settings: Settings) -> Image {
    let scale = settings.scale.max(1);
    let (width, height) = (view.width() * scale, view.height() * scale);
    let mut pixels = Vec::with_capacity(width * height);
    for row in view.rows() {
        let line: Vec<Rgba> = row
            .iter()
            .flat_map(|cell| {
                let rgba = if cell.is_alive() {
                    settings.alive_rgba
                } else {
                    settings.dead_rgba
                };
                std::iter::repeat_n(rgba, scale)
            })
            .collect();
        for _ in 0..scale {
            pixels.extend_from_slice(&line);
        }
    }
    Image {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;

    #[test]
    fn test_text_glyphs() {
        let grid: Grid = "o.\n.o".parse().unwrap();
        let glyphs = Glyphs {
            alive: '#',
            dead: ' ',
        };
        assert_eq!(text(grid.interior_view(), glyphs), "# \n #");
        assert_eq!(
            text(grid.interior_view(), Glyphs::default()),
            grid.to_string()
        );
    }

    #[test]
    fn test_image_scaling() {
        let grid: Grid = "o..\n...".parse().unwrap();
        let settings = Settings {
            scale: 2,
            ..Default::default()
        };
        let img = image(grid.interior_view(), settings);
        assert_eq!((img.width, img.height), (6, 4));
        assert_eq!(img.pixels.len(), 24);
        let alive: Vec<usize> = (0..img.pixels.len())
            .filter(|&i| img.pixels[i] == Rgba::BLACK)
            .collect();
        assert_eq!(alive, [0, 1, 6, 7]);
    }

    #[test]
    fn test_rgb8() {
        let grid: Grid = "o.".parse().unwrap();
        let settings = Settings {
            scale: 1,
            ..Default::default()
        };
        let rgb = image(grid.interior_view(), settings).to_rgb8();
        assert_eq!(rgb, [0, 0, 0, 255, 255, 255]);
    }
}
