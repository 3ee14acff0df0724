//! Fitting tile labels into the width of their tile.

use serde::Serialize;
use treemap_common::{grapheme_len, grapheme_slice};
use treemap_config::DEFAULT_CHAR_WIDTH_PX;

/// Appended to the second line when the text does not fit in two lines.
pub const ELLIPSIS: char = '…';

/// How a label is drawn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum FittedLabel {
    /// The whole text on one line.
    Single {
        /// Label text.
        text: String,
    },
    /// Text broken over two lines, the second possibly ending in an ellipsis.
    Split {
        /// First `max_chars` characters.
        line1: String,
        /// Next `max_chars` characters.
        line2: String,
    },
}

/// Estimates how many characters fit a width from a fixed average glyph width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFitter {
    char_width_px: f64,
}

impl Default for LabelFitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHAR_WIDTH_PX)
    }
}

impl LabelFitter {
    /// Creates a fitter for the given average glyph width.
    #[must_use]
    pub const fn new(char_width_px: f64) -> Self {
        Self { char_width_px }
    }

    /// `floor(width / char_width)`. Negative or NaN widths fit nothing.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn max_chars(&self, width_px: f64) -> usize {
        let chars = (width_px / self.char_width_px).floor();
        if chars.is_nan() || chars <= 0.0 {
            0
        } else {
            chars as usize
        }
    }

    /// Fits `text` into `width_px`.
    #[must_use]
    pub fn fit(&self, text: &str, width_px: f64) -> FittedLabel {
        let max = self.max_chars(width_px);
        let len = grapheme_len(text);
        if len <= max {
            return FittedLabel::Single {
                text: text.to_string(),
            };
        }

        let line1 = grapheme_slice(text, 0, max);
        let mut line2 = grapheme_slice(text, max, max.saturating_mul(2));
        if len > max.saturating_mul(2) {
            line2.push(ELLIPSIS);
        }
        FittedLabel::Split { line1, line2 }
    }
}

/// Fits `text` with the default 6.5px glyph width.
#[must_use]
pub fn fit(text: &str, width_px: f64) -> FittedLabel {
    LabelFitter::default().fit(text, width_px)
}
