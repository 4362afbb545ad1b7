//! Figures: deferred chart drawings with fixed pixel dimensions.

use plotters::coord::Shift;
use plotters::prelude::*;

/// Drawing surface handed to a figure's draw closure.
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// An in-memory description of one chart, ready to rasterize.
///
/// A figure owns its pixel dimensions and a one-shot draw closure over
/// the data it captured at construction time. It is created, rasterized,
/// and dropped within a single request; nothing about it is shared.
pub struct Figure {
    width: u32,
    height: u32,
    draw: Box<dyn for<'a> FnOnce(&Canvas<'a>) -> anyhow::Result<()> + Send>,
}

impl Figure {
    /// Create a figure from a size in inches and a DPI, matching the
    /// conventions of the source charts (e.g. (16, 10) at 80 DPI is
    /// 1280x800 pixels).
    pub fn new<F>(size_in: (f64, f64), dpi: u32, draw: F) -> Self
    where
        F: for<'a> FnOnce(&Canvas<'a>) -> anyhow::Result<()> + Send + 'static,
    {
        let width = (size_in.0 * dpi as f64).round() as u32;
        let height = (size_in.1 * dpi as f64).round() as u32;
        Self::from_pixels(width, height, draw)
    }

    /// Create a figure with explicit pixel dimensions.
    pub fn from_pixels<F>(width: u32, height: u32, draw: F) -> Self
    where
        F: for<'a> FnOnce(&Canvas<'a>) -> anyhow::Result<()> + Send + 'static,
    {
        Self {
            width: width.max(1),
            height: height.max(1),
            draw: Box::new(draw),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Draw into a fresh RGB buffer (3 bytes per pixel, row-major) and
    /// return it. Consumes the figure.
    pub fn rasterize(self) -> anyhow::Result<Vec<u8>> {
        let (width, height) = (self.width, self.height);
        let mut pixels = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
            root.fill(&WHITE)?;
            (self.draw)(&root)?;
            root.present()?;
        }
        Ok(pixels)
    }
}

impl std::fmt::Debug for Figure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Figure")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inches_times_dpi_gives_pixels() {
        let fig = Figure::new((16.0, 10.0), 80, |_| Ok(()));
        assert_eq!((fig.width(), fig.height()), (1280, 800));

        let fig = Figure::new((13.0, 10.0), 80, |_| Ok(()));
        assert_eq!((fig.width(), fig.height()), (1040, 800));
    }

    #[test]
    fn rasterize_starts_from_a_white_canvas() {
        let fig = Figure::from_pixels(4, 4, |_| Ok(()));
        let pixels = fig.rasterize().unwrap();
        assert_eq!(pixels.len(), 4 * 4 * 3);
        assert!(pixels.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn draw_failure_surfaces_from_rasterize() {
        let fig = Figure::from_pixels(4, 4, |_| anyhow::bail!("boom"));
        assert!(fig.rasterize().is_err());
    }
}
