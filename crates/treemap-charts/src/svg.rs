//! SVG document renderer.
//!
//! The document keeps the structure the treemap page is tested against:
//! `#title`, `#description`, `#tree-map` with one `g` per tile holding a
//! `rect.tile[data-name][data-category][data-value]`, `#legend` with
//! `rect.legend-item` swatches, and `#tooltip` while a tile is hovered.

use crate::color::to_hex;
use crate::label::FittedLabel;
use crate::legend::SWATCH_SIZE;
use crate::scene::{Scene, Tile, TooltipView, HEADER_HEIGHT};
use crate::tooltip::TooltipContent;
use crate::traits::SceneRenderer;
use std::fmt::{self, Write};
use treemap_common::{escape_xml, format_coord, grapheme_len, Result, TreemapError};

const TOOLTIP_LINE_HEIGHT: f64 = 16.0;
const TOOLTIP_PADDING: f64 = 8.0;
const TOOLTIP_CHAR_WIDTH: f64 = 7.0;

/// Renders scenes as standalone SVG documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgRenderer;

impl SvgRenderer {
    /// Creates a new SVG renderer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Renders the scene to an SVG string.
    pub fn render_to_string(&self, scene: &Scene) -> Result<String> {
        let mut out = String::with_capacity(4096 + scene.tiles.len() * 512);
        write_document(&mut out, scene)
            .map_err(|e| TreemapError::Render(format!("failed to write SVG: {e}")))?;
        Ok(out)
    }
}

impl SceneRenderer for SvgRenderer {
    fn render(&self, scene: &Scene) -> Result<Vec<u8>> {
        self.render_to_string(scene).map(String::into_bytes)
    }

    fn name(&self) -> &'static str {
        "svg"
    }

    fn file_extension(&self) -> &'static str {
        "svg"
    }
}

fn write_document(out: &mut String, scene: &Scene) -> fmt::Result {
    let width = format_coord(scene.width);
    let height = format_coord(scene.height());
    let colors = &scene.colors;

    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" data-theme="{}">"#,
        scene.theme
    )?;
    writeln!(
        out,
        r#"<rect class="background" width="{width}" height="{height}" fill="{}"/>"#,
        to_hex(colors.background)
    )?;

    write_header(out, scene)?;

    let chart_height = format_coord(scene.chart_height);
    writeln!(
        out,
        r#"<svg id="tree-map" x="0" y="{}" width="{width}" height="{chart_height}" viewBox="0 0 {width} {chart_height}">"#,
        format_coord(HEADER_HEIGHT)
    )?;
    for tile in &scene.tiles {
        write_tile(out, scene, tile)?;
    }
    out.push_str("</svg>\n");

    write_legend(out, scene)?;

    if let Some(tooltip) = &scene.tooltip {
        write_tooltip(out, scene, tooltip)?;
    }

    out.push_str("</svg>\n");
    Ok(())
}

fn write_header(out: &mut String, scene: &Scene) -> fmt::Result {
    let center = format_coord(scene.width / 2.0);
    writeln!(
        out,
        r#"<text id="title" x="{center}" y="30" text-anchor="middle" font-size="24" fill="{}">{}</text>"#,
        to_hex(scene.colors.text),
        escape_xml(&scene.title)
    )?;
    writeln!(
        out,
        r#"<text id="description" x="{center}" y="54" text-anchor="middle" font-size="14" fill="{}">{}</text>"#,
        to_hex(scene.colors.muted),
        escape_xml(&scene.description)
    )?;
    writeln!(
        out,
        r#"<g id="theme-toggle" transform="translate({},10)"><title>Switch to {} theme</title><text y="22" font-size="20">{}</text></g>"#,
        format_coord(scene.width - 36.0),
        scene.theme.toggled(),
        scene.theme.toggle_icon()
    )
}

fn write_tile(out: &mut String, scene: &Scene, tile: &Tile) -> fmt::Result {
    let rect = tile.rect;
    writeln!(
        out,
        r#"<g class="tile-group" transform="translate({},{})">"#,
        format_coord(rect.x0),
        format_coord(rect.y0)
    )?;

    write!(out, r#"<rect class="tile" data-name="{}""#, escape_xml(&tile.name))?;
    if let Some(category) = &tile.category {
        write!(out, r#" data-category="{}""#, escape_xml(category))?;
    }
    if let Some(value) = &tile.value {
        write!(out, r#" data-value="{}""#, escape_xml(value))?;
    }
    writeln!(
        out,
        r#" width="{}" height="{}" fill="{}"/>"#,
        format_coord(rect.width()),
        format_coord(rect.height()),
        to_hex(tile.fill)
    )?;

    let labels = &scene.labels;
    let x = format_coord(labels.inset_x);
    write!(
        out,
        r#"<text class="tile-label" x="{x}" y="{}" font-size="10" fill="{}">"#,
        format_coord(labels.baseline_y),
        to_hex(scene.colors.tile_text)
    )?;
    match &tile.label {
        FittedLabel::Single { text } => out.push_str(&escape_xml(text)),
        FittedLabel::Split { line1, line2 } => {
            write!(
                out,
                r#"<tspan x="{x}" dy="0">{}</tspan><tspan x="{x}" dy="{}">{}</tspan>"#,
                escape_xml(line1),
                format_coord(labels.line_height),
                escape_xml(line2)
            )?;
        }
    }
    out.push_str("</text>\n");

    let content = TooltipContent {
        name: tile.name.clone(),
        category: tile.category.clone(),
        value: tile.value.clone(),
    };
    writeln!(out, "<title>{}</title>", escape_xml(&content.lines().join("\n")))?;
    out.push_str("</g>\n");
    Ok(())
}

fn write_legend(out: &mut String, scene: &Scene) -> fmt::Result {
    writeln!(
        out,
        r#"<g id="legend" transform="translate(0,{})">"#,
        format_coord(scene.legend_top())
    )?;
    let swatch = format_coord(SWATCH_SIZE);
    for item in &scene.legend {
        writeln!(
            out,
            r#"<g class="legend-entry" transform="translate({},{})"><rect class="legend-item" width="{swatch}" height="{swatch}" fill="{}"/><text x="{}" y="14" font-size="12" fill="{}">{}</text></g>"#,
            format_coord(item.x),
            format_coord(item.y),
            to_hex(item.entry.color),
            format_coord(SWATCH_SIZE + 6.0),
            to_hex(scene.colors.text),
            escape_xml(item.entry.label())
        )?;
    }
    out.push_str("</g>\n");
    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn write_tooltip(out: &mut String, scene: &Scene, tooltip: &TooltipView) -> fmt::Result {
    let lines = tooltip.content.lines();
    let longest = lines.iter().map(|l| grapheme_len(l)).max().unwrap_or(0);
    let box_width = longest as f64 * TOOLTIP_CHAR_WIDTH + 2.0 * TOOLTIP_PADDING;
    let box_height = lines.len() as f64 * TOOLTIP_LINE_HEIGHT + TOOLTIP_PADDING;

    write!(out, r#"<g id="tooltip""#)?;
    if let Some(value) = &tooltip.content.value {
        write!(out, r#" data-value="{}""#, escape_xml(value))?;
    }
    writeln!(
        out,
        r#" transform="translate({},{})">"#,
        format_coord(tooltip.position.left),
        format_coord(HEADER_HEIGHT + tooltip.position.top)
    )?;
    writeln!(
        out,
        r#"<rect width="{}" height="{}" rx="4" fill="{}" fill-opacity="0.95"/>"#,
        format_coord(box_width),
        format_coord(box_height),
        to_hex(scene.colors.tooltip_background)
    )?;

    write!(out, r#"<text font-size="12" fill="{}">"#, to_hex(scene.colors.tooltip_text))?;
    let x = format_coord(TOOLTIP_PADDING);
    for (i, line) in lines.iter().enumerate() {
        let y = format_coord(TOOLTIP_LINE_HEIGHT * (i as f64 + 1.0));
        if i == 0 {
            write!(out, r#"<tspan x="{x}" y="{y}" font-weight="bold">{}</tspan>"#, escape_xml(line))?;
        } else {
            write!(out, r#"<tspan x="{x}" y="{y}">{}</tspan>"#, escape_xml(line))?;
        }
    }
    out.push_str("</text>\n</g>\n");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::Chart;
    use crate::layout::LayoutOptions;
    use treemap_common::test_utils::dataset_fixtures;
    use treemap_common::{Theme, TooltipPosition};
    use treemap_config::{DatasetConfig, LabelConfig};

    fn movies() -> Chart {
        let dataset = DatasetConfig {
            key: "movies".to_string(),
            url: "movies.json".to_string(),
            title: "Movie Sales".to_string(),
            description: "Top 100 <by> gross".to_string(),
        };
        Chart::from_slice(
            dataset,
            dataset_fixtures::movies_json().as_bytes(),
            LayoutOptions::default(),
            Vec::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_document_structure() {
        let chart = movies();
        let scene = Scene::compose(&chart, Theme::Dark, None, &LabelConfig::default());
        let svg = SvgRenderer::new().render_to_string(&scene).unwrap();

        assert!(svg.starts_with("<svg "));
        assert!(svg.contains(r#"data-theme="dark""#));
        assert!(svg.contains(r#"<text id="title""#));
        assert!(svg.contains(r#"<svg id="tree-map""#));
        assert!(svg.contains(r#"<g id="legend""#));
        assert!(svg.contains("☀️"));
        assert!(!svg.contains(r#"id="tooltip""#));
        assert_eq!(svg.matches(r#"<rect class="tile""#).count(), 5);
        assert_eq!(svg.matches(r#"class="legend-item""#).count(), 2);
    }

    #[test]
    fn test_text_is_escaped() {
        let chart = movies();
        let scene = Scene::compose(&chart, Theme::Light, None, &LabelConfig::default());
        let svg = SvgRenderer::new().render_to_string(&scene).unwrap();

        assert!(svg.contains(r#"data-name="Tom &amp; Jerry &lt;Remastered&gt;""#));
        assert!(svg.contains("Top 100 &lt;by&gt; gross"));
        assert!(!svg.contains("<Remastered>"));
    }

    #[test]
    fn test_missing_category_omits_attribute() {
        let json = br#"{"name":"r","children":[{"name":"plain","value":"3"}]}"#;
        let dataset = DatasetConfig {
            key: "x".to_string(),
            url: "x.json".to_string(),
            title: String::new(),
            description: String::new(),
        };
        let chart = Chart::from_slice(dataset, json, LayoutOptions::default(), Vec::new()).unwrap();
        let scene = Scene::compose(&chart, Theme::Light, None, &LabelConfig::default());
        let svg = SvgRenderer::new().render_to_string(&scene).unwrap();

        assert!(svg.contains(r#"data-name="plain" data-value="3""#));
        assert!(!svg.contains("data-category"));
    }

    #[test]
    fn test_split_label_uses_two_tspans() {
        let chart = movies();
        let mut scene = Scene::compose(&chart, Theme::Light, None, &LabelConfig::default());
        scene.tiles[0].label = FittedLabel::Split {
            line1: "Ava".to_string(),
            line2: "tar".to_string(),
        };
        let svg = SvgRenderer::new().render_to_string(&scene).unwrap();
        assert!(svg.contains(r#"<tspan x="4" dy="0">Ava</tspan><tspan x="4" dy="11">tar</tspan>"#));
    }

    #[test]
    fn test_tooltip_is_drawn_at_position() {
        let chart = movies();
        let first = chart.treemap.leaves()[0];
        let tooltip = TooltipView::for_node(&chart, first, TooltipPosition { left: 98.0, top: 98.0 });
        let scene = Scene::compose(&chart, Theme::Light, Some(tooltip), &LabelConfig::default());
        let svg = SvgRenderer::new().render_to_string(&scene).unwrap();

        assert!(svg.contains(r#"<g id="tooltip" data-value="760505847" transform="translate(98,168)">"#));
        assert!(svg.contains("Category: Action"));
        assert!(svg.contains("🌙"));
    }
}
