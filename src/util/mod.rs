// src/util/mod.rs
//
// Pure display helpers shared by the service layer and by calling screens.

/// Sentinel shown when a value cannot be formatted.
pub const UNKNOWN: &str = "-";

/// Extract the 4-character year prefix from a date-like string
/// (e.g. "2020-05-01" -> "2020").
///
/// Returns `"-"` for absent input or strings shorter than 4 characters.
pub fn year_prefix(date: Option<&str>) -> String {
    match date {
        Some(s) if s.chars().count() >= 4 => s.chars().take(4).collect(),
        _ => UNKNOWN.to_string(),
    }
}

/// Format a rating to at most one decimal digit, trimming a trailing `.0`
/// (7.25 -> "7.2", 7.0 -> "7").
///
/// Returns `"-"` for absent input.
pub fn format_rating(rating: Option<f32>) -> String {
    match rating {
        Some(r) => {
            let formatted = format!("{:.1}", r);
            formatted
                .strip_suffix(".0")
                .map(str::to_string)
                .unwrap_or(formatted)
        }
        None => UNKNOWN.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_prefix_from_iso_date() {
        assert_eq!(year_prefix(Some("2020-05-01")), "2020");
    }

    #[test]
    fn test_year_prefix_exactly_four_chars() {
        assert_eq!(year_prefix(Some("1999")), "1999");
    }

    #[test]
    fn test_year_prefix_short_string() {
        assert_eq!(year_prefix(Some("20")), "-");
    }

    #[test]
    fn test_year_prefix_empty_and_none() {
        assert_eq!(year_prefix(Some("")), "-");
        assert_eq!(year_prefix(None), "-");
    }

    #[test]
    fn test_format_rating_rounds_to_one_decimal() {
        assert_eq!(format_rating(Some(7.25)), "7.2");
        assert_eq!(format_rating(Some(6.66)), "6.7");
    }

    #[test]
    fn test_format_rating_trims_trailing_zero() {
        assert_eq!(format_rating(Some(7.0)), "7");
    }

    #[test]
    fn test_format_rating_none() {
        assert_eq!(format_rating(None), "-");
    }
}
