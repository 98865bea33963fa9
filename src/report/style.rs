//! Cosmetic parameters of the maintenance report.
//!
//! Every layout variant of the report differs only in these values, so the
//! composer takes one `ReportStyle` instead of hard-coding them.

/// An sRGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbColor(pub u8, pub u8, pub u8);

impl RgbColor {
    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        )
    }

    pub const WHITE: RgbColor = RgbColor(0xff, 0xff, 0xff);
}

#[derive(Debug, Clone)]
pub struct ReportStyle {
    pub organization: String,
    pub department: String,
    /// Second footer line, e.g. "Acme School | Facilities".
    pub footer_tagline: String,
    pub title: String,
    pub filename_prefix: String,
    pub confidentiality_notice: String,

    pub primary: RgbColor,
    pub secondary: RgbColor,
    pub light_gray: RgbColor,
    pub medium_gray: RgbColor,
    pub dark_gray: RgbColor,
    pub muted: RgbColor,
    pub caption: RgbColor,

    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Width of banners, tables and boxes. Centered in the content area.
    pub table_width_mm: f32,
    pub photo_max_mm: f32,
    pub logo_size_mm: f32,
    /// Photos per gallery page.
    pub photos_per_page: usize,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            organization: "SOUTH DADE ACADEMY".to_string(),
            department: "Facilities Management Department".to_string(),
            footer_tagline: "South Dade Academy | Facilities Management".to_string(),
            title: "MAINTENANCE SERVICE REPORT".to_string(),
            filename_prefix: "SDA-MaintenanceReport".to_string(),
            confidentiality_notice: "CONFIDENTIAL".to_string(),

            primary: RgbColor(0x00, 0x33, 0x66),
            secondary: RgbColor(0x00, 0x66, 0xcc),
            light_gray: RgbColor(0xf5, 0xf5, 0xf5),
            medium_gray: RgbColor(0xe0, 0xe0, 0xe0),
            dark_gray: RgbColor(0x33, 0x33, 0x33),
            muted: RgbColor(0x99, 0x99, 0x99),
            caption: RgbColor(0x66, 0x66, 0x66),

            page_width_mm: inch(8.5),
            page_height_mm: inch(11.0),
            margin_mm: inch(0.6),
            table_width_mm: inch(7.0),
            photo_max_mm: inch(5.0),
            logo_size_mm: inch(1.0),
            photos_per_page: 2,
        }
    }
}

impl ReportStyle {
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.margin_mm
    }
}

pub fn inch(value: f32) -> f32 {
    value * 25.4
}

pub fn pt(value: f32) -> f32 {
    value * 25.4 / 72.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(RgbColor::from_hex("#003366"), Some(RgbColor(0, 0x33, 0x66)));
        assert_eq!(RgbColor::from_hex("0066cc"), Some(RgbColor(0, 0x66, 0xcc)));
        assert_eq!(RgbColor::from_hex("#03f"), None);
        assert_eq!(RgbColor::from_hex("#zzzzzz"), None);
    }

    #[test]
    fn test_letter_page_with_margins() {
        let style = ReportStyle::default();
        assert!((style.page_width_mm - 215.9).abs() < 0.01);
        assert!((style.page_height_mm - 279.4).abs() < 0.01);
        assert!((style.margin_mm - 15.24).abs() < 0.01);
        assert!(style.table_width_mm <= style.content_width_mm());
    }
}
