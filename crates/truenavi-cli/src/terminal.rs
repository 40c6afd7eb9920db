//! Terminal styling helpers.

/// ANSI escape codes used by the text renderers.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Bold reverse green for the START tag.
    pub const TAG_START: &str = "\x1b[1;7;32m";
    /// Bold reverse magenta for the GOAL tag.
    pub const TAG_GOAL: &str = "\x1b[1;7;35m";
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    pub const GRAY: &str = "\x1b[90m";
    pub const GREEN: &str = "\x1b[32m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_start: &'static str,
    pub tag_goal: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_start: colors::TAG_START,
            tag_goal: colors::TAG_GOAL,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_start: "",
            tag_goal: "",
            white_bold: "",
            gray: "",
            green: "",
        }
    }

    /// Pick [`ColorPalette::colored`] or [`ColorPalette::plain`] from the
    /// environment.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

/// Whether ANSI colors should be written.
///
/// Honors `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    match std::env::var("TERM") {
        Ok(term) => !term.eq_ignore_ascii_case("dumb"),
        Err(_) => true,
    }
}

/// Render a distance in meters for humans: `850 m`, `12.35 km`.
///
/// ```
/// # use truenavi_cli::terminal::format_distance;
/// assert_eq!(format_distance(850.4), "850 m");
/// assert_eq!(format_distance(12_346.0), "12.35 km");
/// assert_eq!(format_distance(1_234_567.0), "1,234.57 km");
/// ```
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        return format!("{:.0} m", meters);
    }
    let km = meters / 1000.0;
    let whole = km.trunc() as u64;
    let fraction = ((km - km.trunc()) * 100.0).round() as u64;
    // Rounding 0.995 up carries into the whole part.
    let (whole, fraction) = if fraction == 100 {
        (whole + 1, 0)
    } else {
        (whole, fraction)
    };
    format!("{}.{:02} km", format_with_separators(whole), fraction)
}

/// Format an integer with thousands separators.
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    let digits = n.to_string();
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_with_separators() {
        assert_eq!(format_with_separators(0), "0");
        assert_eq!(format_with_separators(999), "999");
        assert_eq!(format_with_separators(1000), "1,000");
        assert_eq!(format_with_separators(1234567), "1,234,567");
    }

    #[test]
    fn test_format_distance_meters() {
        assert_eq!(format_distance(0.0), "0 m");
        assert_eq!(format_distance(999.4), "999 m");
    }

    #[test]
    fn test_format_distance_kilometers() {
        assert_eq!(format_distance(111_196.0), "111.20 km");
        assert_eq!(format_distance(1_999.996), "2.00 km");
    }

    #[test]
    fn test_plain_palette_is_empty() {
        let palette = ColorPalette::plain();
        assert!(palette.reset.is_empty());
        assert!(palette.tag_start.is_empty());
    }
}
