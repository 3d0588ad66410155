//! Line-graph rendering of an image's histograms.

use crate::advanced::histogram::{Histogram, LEVELS};
use crate::channel::Channel;
use crate::image::{ComponentKind, Image};

/// Side length of the rendered graph.
pub const VIEW_SIZE: usize = LEVELS;
const GRID_SPACING: usize = 32;

const BACKGROUND: [u32; 3] = [255, 255, 255];
const GRID: [u32; 3] = [220, 220, 220];
const INTENSITY: [u32; 3] = [0, 0, 0];
const RED: [u32; 3] = [255, 0, 0];
const GREEN: [u32; 3] = [0, 255, 0];
const BLUE: [u32; 3] = [0, 0, 255];

struct Canvas {
    pixels: Vec<[u32; 3]>,
}

impl Canvas {
    fn new() -> Self {
        let mut pixels = vec![BACKGROUND; VIEW_SIZE * VIEW_SIZE];
        for y in 0..VIEW_SIZE {
            for x in 0..VIEW_SIZE {
                if x % GRID_SPACING == 0 || y % GRID_SPACING == 0 {
                    pixels[y * VIEW_SIZE + x] = GRID;
                }
            }
        }
        Self { pixels }
    }

    fn put(&mut self, x: i64, y: i64, color: [u32; 3]) {
        let range = 0..VIEW_SIZE as i64;
        if range.contains(&x) && range.contains(&y) {
            self.pixels[y as usize * VIEW_SIZE + x as usize] = color;
        }
    }

    /// Bresenham line from `(x0, y0)` to `(x1, y1)`, both ends inclusive.
    fn line(&mut self, (mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64), color: [u32; 3]) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }

    /// Plot one histogram as a polyline; `scale` is the count that reaches
    /// the top row.
    fn graph(&mut self, histogram: &Histogram, scale: u64, color: [u32; 3]) {
        let top = (VIEW_SIZE - 1) as f64;
        let row = |count: u64| -> i64 {
            if scale == 0 {
                return top as i64;
            }
            (top - (count as f64 / scale as f64 * top).round()) as i64
        };
        let counts = histogram.counts();
        for x in 1..counts.len() {
            let from = ((x - 1) as i64, row(counts[x - 1]));
            let to = (x as i64, row(counts[x]));
            self.line(from, to, color);
        }
    }

    fn into_image(self) -> Image {
        let [r, g, b] = [0, 1, 2].map(|i| {
            let values = self.pixels.iter().map(|px| px[i]).collect();
            Channel::from_parts(VIEW_SIZE, VIEW_SIZE, values)
        });
        Image::from_channels(r, g, b, 255)
    }
}

impl Image {
    /// Render a 256×256 line graph of the red, green, blue and intensity
    /// histograms, scaled so the tallest bucket reaches the top row.
    pub fn histogram_view(&self) -> Self {
        let intensity = self.component(ComponentKind::Intensity);
        let graphs = [
            (intensity.red().frequency(), INTENSITY),
            (self.red().frequency(), RED),
            (self.green().frequency(), GREEN),
            (self.blue().frequency(), BLUE),
        ];
        let scale = graphs.iter().map(|(h, _)| h.max_count()).max().unwrap_or(0);

        let mut canvas = Canvas::new();
        for (histogram, color) in &graphs {
            canvas.graph(histogram, scale, *color);
        }
        canvas.into_image()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_is_256_square() {
        let img = Image::from_pixels(1, 2, &[[0, 128, 255], [10, 10, 10]], 255).unwrap();
        let view = img.histogram_view();
        assert_eq!(view.width(), 256);
        assert_eq!(view.height(), 256);
        assert_eq!(view.max_value(), 255);
    }

    #[test]
    fn test_peak_reaches_top_row() {
        // Every channel has all pixels at level 64 except blue, drawn last.
        let img = Image::from_pixels(2, 2, &[[64, 64, 64]; 4], 255).unwrap();
        let view = img.histogram_view();
        assert_eq!(view.pixel(0, 64), Ok(BLUE));
        // Empty buckets sit on the bottom row.
        assert_eq!(view.pixel(255, 200), Ok(BLUE));
    }

    #[test]
    fn test_background_and_grid() {
        let img = Image::from_pixels(1, 1, &[[0, 0, 0]], 255).unwrap();
        let view = img.histogram_view();
        assert_eq!(view.pixel(100, 100), Ok(BACKGROUND));
        assert_eq!(view.pixel(96, 101), Ok(GRID));
    }

    #[test]
    fn test_line_is_connected() {
        let mut canvas = Canvas::new();
        canvas.line((0, 0), (3, 10), RED);
        let hits = canvas.pixels.iter().filter(|&&px| px == RED).count();
        assert_eq!(hits, 11);
    }
}
