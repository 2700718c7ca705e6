use lazy_static::lazy_static;
use regex::Regex;

/// Fallback color for missing or malformed gradient stops.
pub const DEFAULT_COLOR: &str = "#4f46e5";

lazy_static! {
    static ref HEX_COLOR: Regex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
}

/// Normalizes one gradient stop to `#rrggbb`.
///
/// A missing leading `#` is tolerated; anything that still is not a six-digit
/// hex color afterwards collapses to [`DEFAULT_COLOR`].
pub fn normalize_hex(color: &str) -> String {
    let trimmed = color.trim();
    let candidate = if trimmed.starts_with('#') {
        trimmed.to_string()
    } else {
        format!("#{trimmed}")
    };

    if HEX_COLOR.is_match(&candidate) {
        candidate
    } else {
        DEFAULT_COLOR.to_string()
    }
}

/// Builds the stored form of a three-stop gradient theme.
///
/// Empty stops chain forward before normalization: `from` falls back to the
/// default color, `via` to `from`, `to` to `via`. The result always has the
/// shape `custom:#rrggbb,#rrggbb,#rrggbb`.
pub fn encode_custom_theme(from: &str, via: &str, to: &str) -> String {
    let from = if from.trim().is_empty() {
        DEFAULT_COLOR
    } else {
        from
    };
    let via = if via.trim().is_empty() { from } else { via };
    let to = if to.trim().is_empty() { via } else { to };

    format!(
        "custom:{},{},{}",
        normalize_hex(from),
        normalize_hex(via),
        normalize_hex(to)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hex_gains_a_hash() {
        assert_eq!(normalize_hex("ff0000"), "#ff0000");
    }

    #[test]
    fn valid_colors_pass_through() {
        assert_eq!(normalize_hex("#aaa111"), "#aaa111");
        assert_eq!(normalize_hex("  #00FF00  "), "#00FF00");
    }

    #[test]
    fn wrong_length_collapses_to_default() {
        assert_eq!(normalize_hex("#abc"), DEFAULT_COLOR);
        assert_eq!(normalize_hex("#aabbccdd"), DEFAULT_COLOR);
        assert_eq!(normalize_hex(""), DEFAULT_COLOR);
    }

    #[test]
    fn non_hex_digits_collapse_to_default() {
        assert_eq!(normalize_hex("#zzzzzz"), DEFAULT_COLOR);
        assert_eq!(normalize_hex("#12345g"), DEFAULT_COLOR);
    }

    #[test]
    fn empty_stops_chain_forward() {
        assert_eq!(
            encode_custom_theme("#aaa111", "", ""),
            "custom:#aaa111,#aaa111,#aaa111"
        );
        assert_eq!(
            encode_custom_theme("", "", ""),
            format!("custom:{DEFAULT_COLOR},{DEFAULT_COLOR},{DEFAULT_COLOR}")
        );
    }

    #[test]
    fn distinct_stops_are_kept_in_order() {
        assert_eq!(
            encode_custom_theme("#ff9a9e", "#fad0c4", "#fbc2eb"),
            "custom:#ff9a9e,#fad0c4,#fbc2eb"
        );
    }

    #[test]
    fn invalid_middle_stop_falls_back_alone() {
        assert_eq!(
            encode_custom_theme("#aaa111", "oops", "#bbb222"),
            format!("custom:#aaa111,{DEFAULT_COLOR},#bbb222")
        );
    }
}
