//! Common utilities for report generation.
//!
//! Shared helpers for timestamp formatting, filenames and the tolerant
//! handling of record fields.

use chrono::{DateTime, TimeZone};

/// Rendered in place of any absent or blank display field.
pub const PLACEHOLDER: &str = "N/A";

/// Marker left in unconfigured logo URLs.
pub const LOGO_SENTINEL: &str = "YOUR_LOGO";

/// Format a render time the way the report prints it (e.g. "January 05, 2024 at 03:07 PM").
pub fn format_report_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%B %d, %Y at %I:%M %p").to_string()
}

/// Field value for display, or [`PLACEHOLDER`] when blank.
pub fn display_or_placeholder(value: &str) -> &str {
    if value.trim().is_empty() {
        PLACEHOLDER
    } else {
        value
    }
}

/// The logo URL if it is worth fetching.
pub fn usable_logo_url(logo_url: Option<&str>) -> Option<&str> {
    let url = logo_url?.trim();
    if url.is_empty() || url.contains(LOGO_SENTINEL) {
        None
    } else {
        Some(url)
    }
}

/// Split free text into the lines the report prints, one per newline.
pub fn text_lines(value: &str) -> Vec<String> {
    display_or_placeholder(value)
        .split('\n')
        .map(|line| line.trim_end_matches('\r').to_string())
        .collect()
}

/// Build `<prefix>-<id>.pdf`, keeping the id readable but safe for a header.
pub fn report_filename(prefix: &str, id: &str) -> String {
    let cleaned: String = sanitize_filename::sanitize(id.trim())
        .chars()
        .filter(|ch| !ch.is_control() && *ch != '"' && *ch != ';')
        .collect();
    let safe_id = if cleaned.trim().is_empty() {
        "unknown".to_string()
    } else {
        cleaned.trim().replace(' ', "-")
    };
    format!("{}-{}.pdf", prefix, safe_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn test_format_report_timestamp() {
        let at = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 5, 15, 7, 0)
            .unwrap();
        assert_eq!(format_report_timestamp(&at), "January 05, 2024 at 03:07 PM");
    }

    #[test]
    fn test_display_or_placeholder() {
        assert_eq!(display_or_placeholder(""), "N/A");
        assert_eq!(display_or_placeholder("   "), "N/A");
        assert_eq!(display_or_placeholder("Rm 4"), "Rm 4");
    }

    #[test]
    fn test_usable_logo_url() {
        assert_eq!(usable_logo_url(None), None);
        assert_eq!(usable_logo_url(Some("")), None);
        assert_eq!(usable_logo_url(Some("https://x.test/YOUR_LOGO.png")), None);
        assert_eq!(
            usable_logo_url(Some(" https://x.test/logo.png ")),
            Some("https://x.test/logo.png")
        );
    }

    #[test]
    fn test_text_lines_splits_on_newlines() {
        assert_eq!(text_lines("line1\nline2"), vec!["line1", "line2"]);
        assert_eq!(text_lines("a\r\nb"), vec!["a", "b"]);
        assert_eq!(text_lines(""), vec!["N/A"]);
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(
            report_filename("SDA-MaintenanceReport", "L1"),
            "SDA-MaintenanceReport-L1.pdf"
        );
        assert_eq!(report_filename("R", "a/b"), "R-ab.pdf");
        assert_eq!(report_filename("R", "  "), "R-unknown.pdf");
    }
}
