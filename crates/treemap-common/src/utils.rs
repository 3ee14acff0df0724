//! Shared text helpers.

use unicode_segmentation::UnicodeSegmentation;

/// Number of user-perceived characters (extended grapheme clusters) in `input`.
#[must_use]
pub fn grapheme_len(input: &str) -> usize {
    input.graphemes(true).count()
}

/// Returns the graphemes of `input` in the half-open range `start..end`.
///
/// Out-of-range bounds are clamped, so this never panics.
#[must_use]
pub fn grapheme_slice(input: &str, start: usize, end: usize) -> String {
    if end <= start {
        return String::new();
    }
    input.graphemes(true).skip(start).take(end - start).collect()
}

/// Escapes text for use inside XML character data and attribute values.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Formats a number the way it reads in the source data: `100`, not `100.0`.
#[must_use]
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // also folds -0
        return "0".to_string();
    }
    format!("{value}")
}

/// Formats a pixel coordinate with at most three decimals and no trailing zeros.
#[must_use]
pub fn format_coord(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    format_number(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grapheme_len_counts_clusters() {
        assert_eq!(grapheme_len(""), 0);
        assert_eq!(grapheme_len("abc"), 3);
        // e + combining acute is one cluster
        assert_eq!(grapheme_len("e\u{301}x"), 2);
    }

    #[test]
    fn test_grapheme_slice_clamps() {
        assert_eq!(grapheme_slice("ABCDEF", 2, 4), "CD");
        assert_eq!(grapheme_slice("ABC", 2, 10), "C");
        assert_eq!(grapheme_slice("ABC", 5, 10), "");
        assert_eq!(grapheme_slice("ABC", 2, 1), "");
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(
            escape_xml(r#"Tom & Jerry <"best"> 'ever'"#),
            "Tom &amp; Jerry &lt;&quot;best&quot;&gt; &apos;ever&apos;"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(4.02), "4.02");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_coord() {
        assert_eq!(format_coord(12.345_678), "12.346");
        assert_eq!(format_coord(7.0), "7");
    }
}
