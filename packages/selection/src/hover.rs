//! Hover text codec for map points.
//!
//! Map points carry a hover text of the form `"<label><br><title><value>"`.
//! The segment before the first `<br>` is the district name, which is how
//! lasso events that only carry hover text identify their districts.

/// Separator between hover text segments.
pub const SEPARATOR: &str = "<br>";

/// Composes the hover text for a map point.
#[must_use]
pub fn encode_hover(label: &str, title: &str, value: &str) -> String {
    format!("{label}{SEPARATOR}{title}{value}")
}

/// Extracts the district name from a hover text. A text without a
/// separator is taken whole.
#[must_use]
pub fn decode_district(text: &str) -> &str {
    text.split(SEPARATOR).next().unwrap_or(text).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_first_segment() {
        assert_eq!(decode_district("Leeds<br>West Yorkshire<br>212"), "Leeds");
    }

    #[test]
    fn text_without_separator_is_taken_whole() {
        assert_eq!(decode_district("Leeds"), "Leeds");
        assert_eq!(decode_district(""), "");
    }

    #[test]
    fn encoded_text_decodes_to_label_head() {
        let text = encode_hover("Bristol, City of", "Accidents per 100k: ", "180");
        assert_eq!(text, "Bristol, City of<br>Accidents per 100k: 180");
        assert_eq!(decode_district(&text), "Bristol, City of");
    }
}
