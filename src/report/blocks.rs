//! Layout blocks of a report, in reading order.

use super::decoder::ReportImage;

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Vertical gap in millimetres.
    Spacer(f32),
    /// Logo on the left, organization text on the right.
    Header {
        logo: ReportImage,
        organization: String,
        department: String,
    },
    /// Full-width colored bar with centered text.
    Banner(String),
    /// Label/value rows.
    Metadata(Vec<MetadataRow>),
    /// Colored bar introducing a section.
    SectionHeader(String),
    /// Bordered box; one entry per explicit line break.
    Content(Vec<String>),
    /// Framed photo with its caption.
    Photo { image: ReportImage, caption: String },
    PageBreak,
    Footer(Vec<FooterLine>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetadataRow {
    pub label: String,
    pub value: String,
}

impl MetadataRow {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FooterLine {
    pub text: String,
    pub bold: bool,
}

impl FooterLine {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
        }
    }
}
