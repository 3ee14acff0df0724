//! Category legend.

use crate::color::ColorScale;
use plotters::style::RGBColor;

/// Side of a legend swatch in pixels.
pub const SWATCH_SIZE: f64 = 18.0;

/// One legend row: a category and its colour.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Category, `None` for leaves without one.
    pub category: Option<String>,
    /// Swatch colour.
    pub color: RGBColor,
}

impl LegendEntry {
    /// Text shown next to the swatch.
    #[must_use]
    pub fn label(&self) -> &str {
        self.category.as_deref().unwrap_or("")
    }
}

/// Legend entries in domain order.
#[must_use]
pub fn build_legend(colors: &ColorScale) -> Vec<LegendEntry> {
    colors
        .domain()
        .iter()
        .map(|category| LegendEntry {
            category: category.clone(),
            color: colors.color(category.as_deref()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::TABLEAU10;

    #[test]
    fn test_legend_follows_domain() {
        let mut scale = ColorScale::default();
        scale.set_domain(vec![Some("Wii".to_string()), None, Some("DS".to_string())]);

        let legend = build_legend(&scale);
        assert_eq!(legend.len(), 3);
        assert_eq!(legend[0].label(), "Wii");
        assert_eq!(legend[1].label(), "");
        assert_eq!(legend[2].color, TABLEAU10[2]);
    }

    #[test]
    fn test_empty_domain_has_no_entries() {
        assert!(build_legend(&ColorScale::default()).is_empty());
    }
}
