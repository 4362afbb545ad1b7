//! The image response pipeline: figure in, typed PNG response out.
//!
//! A single-shot synchronous transform: rasterize the figure into an RGB
//! buffer, encode the buffer as PNG, and hand back a fully buffered
//! response value. No retries; failures are deterministic for fixed
//! input data.

use axum::http::header;
use axum::response::{IntoResponse, Response};
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::error::{ChartError, EncodeError, RenderError};

use super::figure::Figure;

/// A complete rendered chart: PNG bytes plus pixel dimensions.
#[derive(Debug, Clone)]
pub struct PngImage {
    /// Encoded PNG document.
    pub bytes: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl IntoResponse for PngImage {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "image/png")], self.bytes).into_response()
    }
}

/// Render a figure to a PNG image.
///
/// `chart` names the route for error context. Blocks the calling thread
/// for the full duration of drawing and encoding.
pub fn render(chart: &'static str, figure: Figure) -> Result<PngImage, ChartError> {
    let (width, height) = (figure.width(), figure.height());

    let pixels = figure
        .rasterize()
        .map_err(|source| RenderError::Draw { chart, source })?;

    let bytes = encode_png(&pixels, width, height)?;

    Ok(PngImage {
        bytes,
        width,
        height,
    })
}

/// Encode an RGB pixel buffer (3 bytes per pixel) as an in-memory PNG.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    let expected = width as usize * height as usize * 3;
    if pixels.len() != expected {
        return Err(EncodeError::BufferSize {
            got: pixels.len(),
            expected,
            width,
            height,
        });
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(pixels, width, height, ExtendedColorType::Rgb8)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotters::prelude::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn encode_png_round_trips_through_a_decoder() {
        let pixels = vec![200u8; 8 * 6 * 3];
        let bytes = encode_png(&pixels, 8, 6).unwrap();

        assert_eq!(&bytes[..8], &PNG_MAGIC);
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn encode_png_rejects_a_wrong_sized_buffer() {
        let pixels = vec![0u8; 10];
        assert!(matches!(
            encode_png(&pixels, 8, 6),
            Err(EncodeError::BufferSize { .. })
        ));
    }

    #[test]
    fn render_produces_a_valid_png_of_the_figure_size() {
        let figure = Figure::from_pixels(120, 90, |root| {
            root.fill(&BLUE)?;
            Ok(())
        });

        let png = render("test", figure).unwrap();
        assert_eq!(&png.bytes[..8], &PNG_MAGIC);
        assert_eq!((png.width, png.height), (120, 90));

        let decoded = image::load_from_memory(&png.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (120, 90));
    }

    #[test]
    fn render_surfaces_draw_failures_as_render_errors() {
        let figure = Figure::from_pixels(16, 16, |_| anyhow::bail!("no data"));
        assert!(matches!(
            render("test", figure),
            Err(ChartError::Render(RenderError::Draw { chart: "test", .. }))
        ));
    }
}
