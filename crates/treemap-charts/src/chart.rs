//! A dataset that has been parsed, laid out and coloured.

use crate::color::{parse_hex, ColorScale};
use crate::hierarchy::{Hierarchy, NodeId};
use crate::layout::{LayoutOptions, Treemap};
use crate::legend::{build_legend, LegendEntry};
use crate::tooltip::TooltipContent;
use plotters::style::RGBColor;
use treemap_common::{Point, Result};
use treemap_config::{DatasetConfig, LayoutConfig};

/// Everything needed to draw one dataset.
#[derive(Debug, Clone)]
pub struct Chart {
    /// Dataset the chart was built from.
    pub dataset: DatasetConfig,
    /// Summed and sorted hierarchy.
    pub hierarchy: Hierarchy,
    /// Tile rects.
    pub treemap: Treemap,
    /// Category colours, domain set from the leaves.
    pub colors: ColorScale,
}

impl Chart {
    /// Builds a chart from a raw dataset document.
    pub fn from_slice(
        dataset: DatasetConfig,
        json: &[u8],
        options: LayoutOptions,
        palette: Vec<RGBColor>,
    ) -> Result<Self> {
        let hierarchy = Hierarchy::from_json(&dataset.key, json)?;
        let treemap = Treemap::layout(&hierarchy, options);
        let mut colors = ColorScale::new(palette);
        colors.set_domain(hierarchy.categories());

        tracing::info!(
            dataset = %dataset.key,
            leaves = treemap.leaves().len(),
            categories = colors.domain().len(),
            "Chart built"
        );

        Ok(Self {
            dataset,
            hierarchy,
            treemap,
            colors,
        })
    }

    /// [`Chart::from_slice`] with canvas and palette taken from configuration.
    pub fn from_config(dataset: DatasetConfig, json: &[u8], layout: &LayoutConfig) -> Result<Self> {
        Self::from_slice(dataset, json, LayoutOptions::from(layout), palette_from_config(layout))
    }

    /// The leaf under a point in chart coordinates.
    #[must_use]
    pub fn leaf_at(&self, p: Point) -> Option<NodeId> {
        self.treemap.leaf_at(p)
    }

    /// Tooltip text for a node.
    #[must_use]
    pub fn tooltip_content(&self, id: NodeId) -> TooltipContent {
        let node = &self.hierarchy[id];
        TooltipContent {
            name: node.name.clone(),
            category: node.category.clone(),
            value: node.raw_value.as_ref().map(crate::hierarchy::RawValue::display),
        }
    }

    /// Legend entries in domain order.
    #[must_use]
    pub fn legend(&self) -> Vec<LegendEntry> {
        build_legend(&self.colors)
    }
}

/// Parsed configured palette. Entries that do not parse are skipped.
#[must_use]
pub fn palette_from_config(layout: &LayoutConfig) -> Vec<RGBColor> {
    layout
        .palette
        .iter()
        .filter_map(|entry| {
            let color = parse_hex(entry);
            if color.is_none() {
                tracing::warn!(color = %entry, "Ignoring invalid palette colour");
            }
            color
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TABLEAU10;
    use treemap_common::test_utils::dataset_fixtures;

    fn dataset(key: &str) -> DatasetConfig {
        DatasetConfig {
            key: key.to_string(),
            url: format!("file:///tmp/{key}.json"),
            title: key.to_string(),
            description: String::new(),
        }
    }

    #[test]
    fn test_chart_domain_matches_categories() {
        let chart = Chart::from_config(
            dataset("games"),
            dataset_fixtures::games_json().as_bytes(),
            &LayoutConfig::default(),
        )
        .unwrap();
        let legend = chart.legend();
        assert_eq!(legend.len(), 2);
        assert_eq!(legend[0].label(), "Wii");
        assert_eq!(legend[0].color, TABLEAU10[0]);
    }

    #[test]
    fn test_tooltip_content_uses_source_text() {
        let chart = Chart::from_config(
            dataset("games"),
            dataset_fixtures::games_json().as_bytes(),
            &LayoutConfig::default(),
        )
        .unwrap();
        let first = chart.treemap.leaves()[0];
        let content = chart.tooltip_content(first);
        assert_eq!(content.name, "Wii Sports");
        assert_eq!(content.category.as_deref(), Some("Wii"));
        assert_eq!(content.value.as_deref(), Some("82.53"));
    }

    #[test]
    fn test_configured_palette_skips_invalid_entries() {
        let layout = LayoutConfig {
            palette: vec!["#010203".to_string(), "red".to_string()],
            ..LayoutConfig::default()
        };
        assert_eq!(palette_from_config(&layout), vec![RGBColor(1, 2, 3)]);
    }

    #[test]
    fn test_bad_document_fails_with_dataset_key() {
        let err = Chart::from_config(dataset("movies"), b"\"not a tree\"", &LayoutConfig::default()).unwrap_err();
        assert!(err.is_dataset_load());
        assert!(err.to_string().contains("'movies'"));
    }
}
