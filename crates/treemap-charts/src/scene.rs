//! Render-ready description of a page.
//!
//! [`Scene::compose`] is the single function turning state into output: it
//! takes a chart, the theme and the hovered tile, and produces everything a
//! [`crate::SceneRenderer`] draws. It does no I/O.

use crate::chart::Chart;
use crate::color::ThemePalette;
use crate::hierarchy::NodeId;
use crate::label::{FittedLabel, LabelFitter};
use crate::layout::LayoutRect;
use crate::legend::{LegendEntry, SWATCH_SIZE};
use crate::tooltip::TooltipContent;
use plotters::style::RGBColor;
use treemap_common::{Rectangle, Theme, TooltipPosition};
use treemap_config::LabelConfig;

/// Height of the title block above the chart.
pub const HEADER_HEIGHT: f64 = 70.0;
/// Gap between the chart and the legend.
pub const LEGEND_GAP: f64 = 20.0;
/// Horizontal space given to each legend entry.
pub const LEGEND_ITEM_WIDTH: f64 = 150.0;
/// Vertical space given to each legend row.
pub const LEGEND_ROW_HEIGHT: f64 = SWATCH_SIZE + 8.0;

/// One leaf tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    /// Leaf the tile draws.
    pub node: NodeId,
    /// Position in chart coordinates.
    pub rect: LayoutRect,
    /// Leaf name.
    pub name: String,
    /// Leaf category.
    pub category: Option<String>,
    /// Leaf value as written in the source.
    pub value: Option<String>,
    /// Fill colour.
    pub fill: RGBColor,
    /// Label fitted to the tile width.
    pub label: FittedLabel,
}

impl Tile {
    /// Tile size.
    #[must_use]
    pub fn size(&self) -> Rectangle {
        Rectangle::new(self.rect.width(), self.rect.height())
    }
}

/// A legend entry with its position relative to the legend origin.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendItem {
    /// Category and colour.
    pub entry: LegendEntry,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
}

/// A visible tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipView {
    /// Hovered leaf.
    pub node: NodeId,
    /// Offset from the chart container origin.
    pub position: TooltipPosition,
    /// Text of the tooltip.
    pub content: TooltipContent,
}

impl TooltipView {
    /// Tooltip for a leaf of `chart` at `position`.
    #[must_use]
    pub fn for_node(chart: &Chart, node: NodeId, position: TooltipPosition) -> Self {
        Self {
            node,
            position,
            content: chart.tooltip_content(node),
        }
    }
}

/// Everything drawn on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    /// Active theme.
    pub theme: Theme,
    /// Page colours of the active theme.
    pub colors: ThemePalette,
    /// Page title.
    pub title: String,
    /// Line under the title.
    pub description: String,
    /// Key of the dataset shown, `None` before the first load.
    pub dataset: Option<String>,
    /// Chart width, also the page width.
    pub width: f64,
    /// Chart height.
    pub chart_height: f64,
    /// Leaf tiles in pre-order.
    pub tiles: Vec<Tile>,
    /// Legend entries.
    pub legend: Vec<LegendItem>,
    /// Tooltip, if a tile is hovered.
    pub tooltip: Option<TooltipView>,
    /// Label placement.
    pub labels: LabelConfig,
}

impl Scene {
    /// Scene of a chart.
    #[must_use]
    pub fn compose(
        chart: &Chart,
        theme: Theme,
        tooltip: Option<TooltipView>,
        labels: &LabelConfig,
    ) -> Self {
        let fitter = LabelFitter::new(labels.char_width_px);
        let options = chart.treemap.options();

        let tiles = chart
            .treemap
            .leaves()
            .iter()
            .map(|&id| {
                let node = &chart.hierarchy[id];
                let rect = chart.treemap.rect(id);
                Tile {
                    node: id,
                    rect,
                    name: node.name.clone(),
                    category: node.category.clone(),
                    value: node.raw_value.as_ref().map(crate::hierarchy::RawValue::display),
                    fill: chart.colors.color(node.category.as_deref()),
                    label: fitter.fit(&node.name, rect.width()),
                }
            })
            .collect();

        Self {
            theme,
            colors: ThemePalette::for_theme(theme),
            title: chart.dataset.title.clone(),
            description: chart.dataset.description.clone(),
            dataset: Some(chart.dataset.key.clone()),
            width: options.width,
            chart_height: options.height,
            tiles,
            legend: layout_legend(chart.legend(), options.width),
            tooltip,
            labels: labels.clone(),
        }
    }

    /// An empty page, shown until the first dataset has loaded.
    #[must_use]
    pub fn blank(width: f64, chart_height: f64, theme: Theme, labels: &LabelConfig) -> Self {
        Self {
            theme,
            colors: ThemePalette::for_theme(theme),
            title: String::new(),
            description: String::new(),
            dataset: None,
            width,
            chart_height,
            tiles: Vec::new(),
            legend: Vec::new(),
            tooltip: None,
            labels: labels.clone(),
        }
    }

    /// Top of the legend in page coordinates.
    #[must_use]
    pub fn legend_top(&self) -> f64 {
        HEADER_HEIGHT + self.chart_height + LEGEND_GAP
    }

    /// Total page height.
    #[must_use]
    pub fn height(&self) -> f64 {
        let legend_height = self
            .legend
            .iter()
            .map(|item| item.y + LEGEND_ROW_HEIGHT)
            .fold(0.0, f64::max);
        self.legend_top() + legend_height
    }
}

/// Places legend entries left to right, wrapping at `width`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn layout_legend(entries: Vec<LegendEntry>, width: f64) -> Vec<LegendItem> {
    let per_row = ((width / LEGEND_ITEM_WIDTH).floor() as usize).max(1);
    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| LegendItem {
            entry,
            x: (i % per_row) as f64 * LEGEND_ITEM_WIDTH,
            y: (i / per_row) as f64 * LEGEND_ROW_HEIGHT,
        })
        .collect()
}
