//! Report composition.
//!
//! `plan` lays a record out as an ordered list of [`Block`]s and decides where
//! the gallery breaks pages; `compose` hands that plan to the PDF engine.

use chrono::{DateTime, Local};

use super::blocks::{Block, FooterLine, MetadataRow};
use super::common::{display_or_placeholder, format_report_timestamp, report_filename, text_lines};
use super::decoder::{decode_bitmap, decode_entry, ReportImage};
use super::engine::PdfEngine;
use super::style::{inch, ReportStyle};
use super::{RenderedDocument, ReportError};
use crate::maintenance_log::models::LogRecord;

const ISSUE_CAPTION: &str = "ISSUE / REQUEST SUMMARY";
const LOCATION_CAPTION: &str = "LOCATION / EQUIPMENT IDENTIFICATION";
const DESCRIPTION_CAPTION: &str = "DETAILED DESCRIPTION";
const GALLERY_CAPTION: &str = "PHOTOGRAPHIC DOCUMENTATION";

/// Stateless, shareable report composer.
#[derive(Debug, Clone, Default)]
pub struct ReportComposer {
    style: ReportStyle,
}

impl ReportComposer {
    pub fn new(style: ReportStyle) -> Self {
        Self { style }
    }

    /// Render `record` as of now. `logo` is the raw downloaded logo, if any.
    pub fn compose(
        &self,
        record: &LogRecord,
        logo: Option<&[u8]>,
    ) -> Result<RenderedDocument, ReportError> {
        self.compose_at(record, logo, &Local::now())
    }

    pub fn compose_at(
        &self,
        record: &LogRecord,
        logo: Option<&[u8]>,
        generated_at: &DateTime<Local>,
    ) -> Result<RenderedDocument, ReportError> {
        let generated = format_report_timestamp(generated_at);
        let blocks = self.plan(record, logo, &generated);

        let title = format!("{} {}", self.style.title, display_or_placeholder(&record.id));
        let rendered = PdfEngine::new(&self.style).render(&title, &blocks)?;

        log::info!(
            "Rendered report {} ({} pages, {} bytes)",
            display_or_placeholder(&record.id),
            rendered.page_count,
            rendered.bytes.len()
        );

        Ok(RenderedDocument {
            filename: report_filename(&self.style.filename_prefix, &record.id),
            pdf: rendered.bytes,
            page_count: rendered.page_count,
        })
    }

    /// Lay out `record` without rendering. `generated` is the printed render time.
    pub fn plan(&self, record: &LogRecord, logo: Option<&[u8]>, generated: &str) -> Vec<Block> {
        let style = &self.style;
        let mut blocks = Vec::new();

        if let Some(logo) = logo.and_then(decode_bitmap) {
            blocks.push(Block::Header {
                logo,
                organization: style.organization.clone(),
                department: style.department.clone(),
            });
        }

        blocks.push(Block::Spacer(inch(0.2)));
        blocks.push(Block::Banner(style.title.clone()));
        blocks.push(Block::Spacer(inch(0.3)));

        blocks.push(Block::Metadata(vec![
            MetadataRow::new("Report ID:", display_or_placeholder(&record.id)),
            MetadataRow::new("Generated:", generated),
            MetadataRow::new(
                "Category:",
                display_or_placeholder(&record.category).to_uppercase(),
            ),
            MetadataRow::new("Reported by:", display_or_placeholder(&record.created_by)),
            MetadataRow::new("Date Reported:", display_or_placeholder(&record.timestamp)),
        ]));
        blocks.push(Block::Spacer(inch(0.25)));

        push_section(&mut blocks, ISSUE_CAPTION, &record.title);
        blocks.push(Block::Spacer(inch(0.15)));
        push_section(&mut blocks, LOCATION_CAPTION, &record.location);
        blocks.push(Block::Spacer(inch(0.15)));
        push_section(&mut blocks, DESCRIPTION_CAPTION, &record.description);

        if !record.images.is_empty() {
            self.push_gallery(&mut blocks, &record.images);
        }

        blocks.push(Block::Spacer(inch(0.3)));
        blocks.push(Block::Footer(vec![
            FooterLine::plain(format!("Generated on {}", generated)),
            FooterLine::plain(style.footer_tagline.clone()),
            FooterLine::bold(style.confidentiality_notice.clone()),
            FooterLine::plain(format!("Document ID: {}", display_or_placeholder(&record.id))),
        ]));

        blocks
    }

    fn push_gallery(&self, blocks: &mut Vec<Block>, images: &[String]) {
        let total = images.len();
        let per_page = self.style.photos_per_page;

        blocks.push(Block::Spacer(inch(0.2)));
        blocks.push(Block::SectionHeader(GALLERY_CAPTION.to_string()));
        blocks.push(Block::Spacer(inch(0.1)));

        let placed: Vec<(usize, ReportImage)> = images
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                let position = index + 1;
                match decode_entry(entry) {
                    Some(image) => Some((position, image)),
                    None => {
                        log::warn!("Photo {} of {} could not be decoded, skipping", position, total);
                        None
                    }
                }
            })
            .collect();

        let last = placed.len();
        for (slot, (position, image)) in placed.into_iter().enumerate() {
            blocks.push(Block::Photo {
                image,
                caption: format!("Photo {} of {}", position, total),
            });
            blocks.push(Block::Spacer(inch(0.15)));

            // Never break after the last photo actually placed.
            if per_page > 0 && position % per_page == 0 && slot + 1 < last {
                blocks.push(Block::PageBreak);
            }
        }
    }
}

fn push_section(blocks: &mut Vec<Block>, caption: &str, body: &str) {
    blocks.push(Block::SectionHeader(caption.to_string()));
    blocks.push(Block::Content(text_lines(body)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes() -> Vec<u8> {
        let img = RgbImage::from_pixel(8, 6, Rgb([10, 120, 200]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    fn photo_uri() -> String {
        format!("data:image/png;base64,{}", BASE64.encode(png_bytes()))
    }

    fn record(images: Vec<String>) -> LogRecord {
        LogRecord {
            id: "L1".to_string(),
            title: "Leak".to_string(),
            category: "it".to_string(),
            location: "Rm 4".to_string(),
            description: "Pipe burst".to_string(),
            created_by: "A. Smith".to_string(),
            timestamp: "2024-01-01".to_string(),
            images,
            logo_url: None,
        }
    }

    fn captions(blocks: &[Block]) -> Vec<String> {
        blocks
            .iter()
            .filter_map(|b| match b {
                Block::Photo { caption, .. } => Some(caption.clone()),
                _ => None,
            })
            .collect()
    }

    fn page_breaks(blocks: &[Block]) -> usize {
        blocks.iter().filter(|b| **b == Block::PageBreak).count()
    }

    fn plan(record: &LogRecord) -> Vec<Block> {
        ReportComposer::default().plan(record, None, "January 01, 2024 at 09:00 AM")
    }

    #[test]
    fn test_no_images_means_no_gallery() {
        let blocks = plan(&record(vec![]));
        assert_eq!(page_breaks(&blocks), 0);
        assert!(!blocks.contains(&Block::SectionHeader(GALLERY_CAPTION.to_string())));
    }

    #[test]
    fn test_gallery_breaks_after_every_second_photo() {
        for n in 1..=7usize {
            let blocks = plan(&record(vec![photo_uri(); n]));
            assert_eq!(page_breaks(&blocks), (n + 1) / 2 - 1, "n = {}", n);
            assert!(!matches!(
                blocks.iter().rev().find(|b| !matches!(b, Block::Spacer(_) | Block::Footer(_))),
                Some(Block::PageBreak)
            ));
        }
    }

    #[test]
    fn test_captions_keep_submitted_positions() {
        let images = vec![
            "###broken###".to_string(),
            photo_uri(),
            "data:image/png;base64,AAAA".to_string(),
            photo_uri(),
        ];
        let blocks = plan(&record(images));
        assert_eq!(captions(&blocks), vec!["Photo 2 of 4", "Photo 4 of 4"]);
        // Position 2 is even and not last, so one break remains.
        assert_eq!(page_breaks(&blocks), 1);
    }

    #[test]
    fn test_no_break_after_last_placed_photo() {
        for images in [
            vec![photo_uri(), photo_uri(), "!!bad!!".to_string()],
            vec![photo_uri(), photo_uri(), "!!bad!!".to_string(), "!!bad!!".to_string()],
        ] {
            let blocks = plan(&record(images.clone()));
            assert_eq!(page_breaks(&blocks), 0, "{} entries", images.len());
            assert_eq!(
                captions(&blocks),
                vec![
                    format!("Photo 1 of {}", images.len()),
                    format!("Photo 2 of {}", images.len())
                ]
            );
        }
    }

    #[test]
    fn test_trailing_bad_entries_add_no_page() {
        let composer = ReportComposer::default();
        let clean = composer.compose(&record(vec![photo_uri(); 2]), None).unwrap();
        let mut images = vec![photo_uri(); 2];
        images.push("!!bad!!".to_string());
        let with_bad = composer.compose(&record(images), None).unwrap();
        assert_eq!(with_bad.page_count, clean.page_count);
    }

    #[test]
    fn test_description_newlines_become_lines() {
        let mut rec = record(vec![]);
        rec.description = "line1\nline2".to_string();
        let blocks = plan(&rec);
        assert!(blocks.contains(&Block::Content(vec![
            "line1".to_string(),
            "line2".to_string()
        ])));
    }

    #[test]
    fn test_missing_fields_render_placeholder() {
        let blocks = plan(&LogRecord::default());
        let Some(Block::Metadata(rows)) = blocks.iter().find(|b| matches!(b, Block::Metadata(_)))
        else {
            panic!("metadata block missing");
        };
        assert_eq!(rows[0].value, "N/A");
        assert_eq!(rows[2].value, "N/A");
        assert!(blocks.contains(&Block::Content(vec!["N/A".to_string()])));
    }

    #[test]
    fn test_metadata_upper_cases_category() {
        let blocks = plan(&record(vec![]));
        let Some(Block::Metadata(rows)) = blocks.iter().find(|b| matches!(b, Block::Metadata(_)))
        else {
            panic!("metadata block missing");
        };
        assert_eq!(rows[2], MetadataRow::new("Category:", "IT"));
        assert_eq!(rows[1].value, "January 01, 2024 at 09:00 AM");
    }

    #[test]
    fn test_header_only_with_decodable_logo() {
        let composer = ReportComposer::default();
        let rec = record(vec![]);

        let without = composer.plan(&rec, None, "now");
        assert!(!matches!(without[0], Block::Header { .. }));

        let garbage = composer.plan(&rec, Some(&b"<html>404</html>"[..]), "now");
        assert!(!matches!(garbage[0], Block::Header { .. }));

        let logo = png_bytes();
        let with = composer.plan(&rec, Some(logo.as_slice()), "now");
        assert!(matches!(with[0], Block::Header { .. }));
    }

    #[test]
    fn test_footer_carries_record_id() {
        let blocks = plan(&record(vec![]));
        let Some(Block::Footer(lines)) = blocks.last() else {
            panic!("footer must close the report");
        };
        assert!(lines.iter().any(|l| l.text.contains("L1")));
        assert!(lines.iter().any(|l| l.bold && l.text == "CONFIDENTIAL"));
    }

    #[test]
    fn test_compose_scenario() {
        let document = ReportComposer::default()
            .compose(&record(vec![]), None)
            .unwrap();
        assert!(document.pdf.starts_with(b"%PDF"));
        assert!(document.filename.contains("L1"));
        assert_eq!(document.filename, "SDA-MaintenanceReport-L1.pdf");
        assert!(document.page_count >= 1);
    }

    #[test]
    fn test_compose_gallery_spans_pages() {
        let document = ReportComposer::default()
            .compose(&record(vec![photo_uri(); 3]), None)
            .unwrap();
        // Photo 3 follows a forced break.
        assert!(document.page_count >= 2);
    }
}
