//! PNG preview of the tile layout, drawn with the plotters bitmap backend.
//!
//! The preview covers the chart canvas only: background and tile rects, no
//! text, so it needs no system fonts.

use crate::scene::Scene;
use crate::traits::SceneRenderer;
use image::{ImageOutputFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use treemap_common::{Result, TreemapError};

/// Renders the chart area of a scene to PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngPreviewRenderer;

impl PngPreviewRenderer {
    /// Creates a new PNG preview renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn render_error(e: impl std::fmt::Display) -> TreemapError {
    TreemapError::Render(e.to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixels(value: f64) -> u32 {
    value.round().max(1.0) as u32
}

#[allow(clippy::cast_possible_truncation)]
fn coord(value: f64) -> i32 {
    value.round() as i32
}

impl SceneRenderer for PngPreviewRenderer {
    fn render(&self, scene: &Scene) -> Result<Vec<u8>> {
        let (width, height) = (pixels(scene.width), pixels(scene.chart_height));
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&scene.colors.background).map_err(render_error)?;

            for tile in &scene.tiles {
                let r = tile.rect;
                // tiles narrower than a pixel vanish instead of smearing into the gap
                if r.width() < 1.0 || r.height() < 1.0 {
                    continue;
                }
                root.draw(&Rectangle::new(
                    [(coord(r.x0), coord(r.y0)), (coord(r.x1) - 1, coord(r.y1) - 1)],
                    tile.fill.filled(),
                ))
                .map_err(render_error)?;
            }

            root.present().map_err(render_error)?;
        }

        let image = RgbImage::from_raw(width, height, buffer)
            .ok_or_else(|| render_error("pixel buffer does not match the canvas size"))?;
        let mut png = Cursor::new(Vec::new());
        image
            .write_to(&mut png, ImageOutputFormat::Png)
            .map_err(render_error)?;

        tracing::debug!(width, height, tiles = scene.tiles.len(), "PNG preview rendered");
        Ok(png.into_inner())
    }

    fn name(&self) -> &'static str {
        "png-preview"
    }

    fn file_extension(&self) -> &'static str {
        "png"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Chart;
    use crate::layout::LayoutOptions;
    use treemap_common::test_utils::dataset_fixtures;
    use treemap_common::Theme;
    use treemap_config::{DatasetConfig, LabelConfig};

    fn scene() -> Scene {
        let dataset = DatasetConfig {
            key: "games".to_string(),
            url: "games.json".to_string(),
            title: String::new(),
            description: String::new(),
        };
        let options = LayoutOptions {
            width: 200.0,
            height: 100.0,
            padding_inner: 1.0,
        };
        let chart = Chart::from_slice(dataset, dataset_fixtures::games_json().as_bytes(), options, Vec::new())
            .unwrap();
        Scene::compose(&chart, Theme::Light, None, &LabelConfig::default())
    }

    #[test]
    fn test_preview_is_png_of_canvas_size() {
        let png = PngPreviewRenderer::new().render(&scene()).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (200, 100));
    }

    #[test]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn test_tile_centre_has_tile_colour() {
        let scene = scene();
        let png = PngPreviewRenderer::new().render(&scene).unwrap();
        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();

        for tile in &scene.tiles {
            let c = tile.rect.center();
            let pixel = decoded.get_pixel(c.x as u32, c.y as u32);
            assert_eq!(pixel.0, [tile.fill.0, tile.fill.1, tile.fill.2], "tile {}", tile.name);
        }
    }
}
