/// Render an average rating for display.
///
/// Ratings are only meaningful when at least one rated review contributed,
/// which the aggregators signal with a strictly positive mean.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::format_avg_rating;
///
/// assert_eq!(format_avg_rating(4.25), "4.25");
/// assert_eq!(format_avg_rating(3.0),  "3.00");
/// assert_eq!(format_avg_rating(0.0),  "N/A");
/// ```
pub fn format_avg_rating(avg_rating: f64) -> String {
    if avg_rating > 0.0 {
        format!("{:.2}", avg_rating)
    } else {
        "N/A".to_string()
    }
}

/// Render a fraction as a whole-number percentage.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::format_pct;
///
/// assert_eq!(format_pct(0.25),  "25%");
/// assert_eq!(format_pct(0.333), "33%");
/// assert_eq!(format_pct(0.0),   "0%");
/// assert_eq!(format_pct(1.0),   "100%");
/// ```
pub fn format_pct(fraction: f64) -> String {
    format!("{}%", (fraction * 100.0).round() as i64)
}

/// Render a fractional delta as a signed whole-number percentage.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::format_signed_pct;
///
/// assert_eq!(format_signed_pct(0.12),  "+12%");
/// assert_eq!(format_signed_pct(-0.05), "-5%");
/// assert_eq!(format_signed_pct(0.0),   "+0%");
/// ```
pub fn format_signed_pct(fraction: f64) -> String {
    format!("{:+}%", (fraction * 100.0).round() as i64)
}

/// Render a rating delta with an explicit sign and two decimals.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::format_delta_rating;
///
/// assert_eq!(format_delta_rating(0.3),   "+0.30");
/// assert_eq!(format_delta_rating(-1.25), "-1.25");
/// assert_eq!(format_delta_rating(0.0),   "+0.00");
/// ```
pub fn format_delta_rating(delta: f64) -> String {
    format!("{:+.2}", delta)
}

/// Trim `text` and cut it at `max_chars` characters, appending an ellipsis
/// when anything was removed.
///
/// Counts characters, not bytes, so multi-byte text is never split mid
/// character.
///
/// # Examples
///
/// ```
/// use insight_core::formatting::truncate_text;
///
/// assert_eq!(truncate_text("short", 160), "short");
/// assert_eq!(truncate_text("abcdef", 4), "abcd…");
/// assert_eq!(truncate_text("  padded  ", 160), "padded");
/// ```
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_avg_rating ─────────────────────────────────────────────────

    #[test]
    fn test_format_avg_rating_two_decimals() {
        assert_eq!(format_avg_rating(4.256), "4.26");
        assert_eq!(format_avg_rating(1.0), "1.00");
    }

    #[test]
    fn test_format_avg_rating_zero_is_na() {
        assert_eq!(format_avg_rating(0.0), "N/A");
    }

    // ── format_pct ────────────────────────────────────────────────────────

    #[test]
    fn test_format_pct_rounds() {
        assert_eq!(format_pct(0.666), "67%");
        assert_eq!(format_pct(0.004), "0%");
    }

    #[test]
    fn test_format_pct_zero() {
        assert_eq!(format_pct(0.0), "0%");
    }

    // ── format_signed_pct ─────────────────────────────────────────────────

    #[test]
    fn test_format_signed_pct_positive() {
        assert_eq!(format_signed_pct(0.31), "+31%");
    }

    #[test]
    fn test_format_signed_pct_negative() {
        assert_eq!(format_signed_pct(-0.31), "-31%");
    }

    #[test]
    fn test_format_signed_pct_zero_keeps_plus() {
        assert_eq!(format_signed_pct(0.0), "+0%");
    }

    // ── format_delta_rating ───────────────────────────────────────────────

    #[test]
    fn test_format_delta_rating_signed() {
        assert_eq!(format_delta_rating(1.234), "+1.23");
        assert_eq!(format_delta_rating(-1.234), "-1.23");
    }

    // ── truncate_text ─────────────────────────────────────────────────────

    #[test]
    fn test_truncate_text_short_unchanged() {
        assert_eq!(truncate_text("all fine here", 160), "all fine here");
    }

    #[test]
    fn test_truncate_text_exact_length_unchanged() {
        let text = "x".repeat(160);
        assert_eq!(truncate_text(&text, 160), text);
    }

    #[test]
    fn test_truncate_text_cuts_and_appends_ellipsis() {
        let text = "a".repeat(200);
        let out = truncate_text(&text, 160);
        assert_eq!(out.chars().count(), 161);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn test_truncate_text_trims_trailing_space_before_ellipsis() {
        let text = format!("{} {}", "b".repeat(159), "c".repeat(50));
        let out = truncate_text(&text, 160);
        // The cut lands on the space, which must not survive before the marker.
        assert_eq!(out, format!("{}…", "b".repeat(159)));
    }

    #[test]
    fn test_truncate_text_counts_chars_not_bytes() {
        let text = "é".repeat(200);
        let out = truncate_text(&text, 160);
        assert_eq!(out.chars().count(), 161);
    }
}
