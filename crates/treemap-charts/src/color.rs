//! Ordinal category colours and per-theme page colours.

use plotters::style::RGBColor;
use std::collections::HashMap;
use treemap_common::Theme;

/// Tableau's ten-colour categorical palette.
pub const TABLEAU10: [RGBColor; 10] = [
    RGBColor(0x4e, 0x79, 0xa7), // Blue
    RGBColor(0xf2, 0x8e, 0x2c), // Orange
    RGBColor(0xe1, 0x57, 0x59), // Red
    RGBColor(0x76, 0xb7, 0xb2), // Teal
    RGBColor(0x59, 0xa1, 0x4f), // Green
    RGBColor(0xed, 0xc9, 0x49), // Yellow
    RGBColor(0xaf, 0x7a, 0xa1), // Purple
    RGBColor(0xff, 0x9d, 0xa7), // Pink
    RGBColor(0x9c, 0x75, 0x5f), // Brown
    RGBColor(0xba, 0xb0, 0xab), // Gray
];

/// Maps categories to palette colours by their position in the domain.
#[derive(Debug, Clone)]
pub struct ColorScale {
    palette: Vec<RGBColor>,
    domain: Vec<Option<String>>,
    index: HashMap<Option<String>, usize>,
}

impl Default for ColorScale {
    fn default() -> Self {
        Self::new(TABLEAU10.to_vec())
    }
}

impl ColorScale {
    /// Creates a scale over `palette` with an empty domain.
    ///
    /// An empty palette falls back to [`TABLEAU10`].
    #[must_use]
    pub fn new(palette: Vec<RGBColor>) -> Self {
        let palette = if palette.is_empty() {
            TABLEAU10.to_vec()
        } else {
            palette
        };
        Self {
            palette,
            domain: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Replaces the domain. Duplicates keep their first position, so calling
    /// this again with the same categories changes nothing.
    pub fn set_domain<I>(&mut self, categories: I)
    where
        I: IntoIterator<Item = Option<String>>,
    {
        self.domain.clear();
        self.index.clear();
        for category in categories {
            if !self.index.contains_key(&category) {
                self.index.insert(category.clone(), self.domain.len());
                self.domain.push(category);
            }
        }
    }

    /// Current domain, in order.
    #[must_use]
    pub fn domain(&self) -> &[Option<String>] {
        &self.domain
    }

    /// Colour of a category. A category outside the domain gets the colour it
    /// would have if it were appended.
    #[must_use]
    pub fn color(&self, category: Option<&str>) -> RGBColor {
        let position = self
            .index
            .get(&category.map(str::to_string))
            .copied()
            .unwrap_or(self.domain.len());
        self.palette[position % self.palette.len()]
    }
}

/// `#rrggbb` form of a colour.
#[must_use]
pub fn to_hex(color: RGBColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.0, color.1, color.2)
}

/// Parses `#rrggbb`, returning `None` for anything else.
#[must_use]
pub fn parse_hex(color_str: &str) -> Option<RGBColor> {
    let hex = color_str.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    Some(RGBColor(
        u8::from_str_radix(hex.get(0..2)?, 16).ok()?,
        u8::from_str_radix(hex.get(2..4)?, 16).ok()?,
        u8::from_str_radix(hex.get(4..6)?, 16).ok()?,
    ))
}

/// Page colours of a theme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemePalette {
    /// Page background.
    pub background: RGBColor,
    /// Title and legend text.
    pub text: RGBColor,
    /// Description text.
    pub muted: RGBColor,
    /// Text drawn on top of tiles.
    pub tile_text: RGBColor,
    /// Tooltip box fill.
    pub tooltip_background: RGBColor,
    /// Tooltip text.
    pub tooltip_text: RGBColor,
}

impl ThemePalette {
    /// Palette for a theme.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: RGBColor(0xf5, 0xf5, 0xf7),
                text: RGBColor(0x22, 0x22, 0x22),
                muted: RGBColor(0x55, 0x55, 0x55),
                tile_text: RGBColor(0x11, 0x11, 0x11),
                tooltip_background: RGBColor(0xff, 0xff, 0xff),
                tooltip_text: RGBColor(0x22, 0x22, 0x22),
            },
            Theme::Dark => Self {
                background: RGBColor(0x12, 0x12, 0x16),
                text: RGBColor(0xee, 0xee, 0xee),
                muted: RGBColor(0xaa, 0xaa, 0xb0),
                tile_text: RGBColor(0x11, 0x11, 0x11),
                tooltip_background: RGBColor(0x2a, 0x2a, 0x30),
                tooltip_text: RGBColor(0xee, 0xee, 0xee),
            },
        }
    }
}
