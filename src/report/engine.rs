//! PDF rendering engine.
//!
//! Draws a block plan top to bottom onto fixed-size pages with the base-14
//! Helvetica faces. Blocks that do not fit the rest of a page move to the next
//! one; content boxes and metadata tables split between lines and rows.

use std::io::BufWriter;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point,
    Polygon, Px, Rgb,
};

use super::blocks::{Block, FooterLine, MetadataRow};
use super::decoder::ReportImage;
use super::measure::{printable, text_width_mm, wrap};
use super::style::{inch, pt, ReportStyle, RgbColor};
use super::ReportError;

const LAYER_NAME: &str = "Layer 1";

// Font sizes and leading in points.
const BANNER_SIZE: f32 = 22.0;
const BANNER_PADDING: f32 = 16.0;
const ORGANIZATION_SIZE: f32 = 16.0;
const DEPARTMENT_SIZE: f32 = 9.0;
const TABLE_SIZE: f32 = 10.0;
const TABLE_LEADING: f32 = 12.0;
const TABLE_PADDING_V: f32 = 10.0;
const SECTION_SIZE: f32 = 12.0;
const SECTION_PADDING_V: f32 = 8.0;
const CONTENT_SIZE: f32 = 11.0;
const CONTENT_LEADING: f32 = 16.0;
const CELL_PADDING: f32 = 12.0;
const CAPTION_SIZE: f32 = 9.0;
const PHOTO_PADDING_TOP: f32 = 15.0;
const PHOTO_CAPTION_GAP: f32 = 6.0;
const PHOTO_PADDING_BOTTOM: f32 = 10.0;
const FOOTER_SIZE: f32 = 7.0;
const FOOTER_PADDING: f32 = 10.0;
const BORDER_WIDTH: f32 = 1.0;

const METADATA_LABEL_WIDTH_IN: f32 = 2.0;

/// Bytes of a finished PDF.
#[derive(Debug)]
pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

pub struct PdfEngine<'a> {
    style: &'a ReportStyle,
}

impl<'a> PdfEngine<'a> {
    pub fn new(style: &'a ReportStyle) -> Self {
        Self { style }
    }

    pub fn render(&self, title: &str, blocks: &[Block]) -> Result<RenderedPdf, ReportError> {
        let style = self.style;
        let (doc, page, layer) = PdfDocument::new(
            printable(title),
            Mm(style.page_width_mm),
            Mm(style.page_height_mm),
            LAYER_NAME,
        );

        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ReportError::Font(e.to_string()))?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ReportError::Font(e.to_string()))?;

        let page_count = {
            let mut canvas = Canvas {
                doc: &doc,
                layer: doc.get_page(page).get_layer(layer),
                regular,
                bold,
                style,
                cursor: style.page_height_mm - style.margin_mm,
                page_count: 1,
                page_has_content: false,
            };
            for (index, block) in blocks.iter().enumerate() {
                canvas.draw(block, &blocks[index + 1..]);
            }
            canvas.page_count
        };

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .map_err(|e| ReportError::Serialize(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| ReportError::Flush(e.into_error()))?;

        Ok(RenderedPdf { bytes, page_count })
    }
}

/// Drawing state for one document: current layer and the top of the free area.
struct Canvas<'d> {
    doc: &'d PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    style: &'d ReportStyle,
    /// Y of the top of the free area, in mm from the page bottom.
    cursor: f32,
    page_count: usize,
    page_has_content: bool,
}

impl Canvas<'_> {
    /// Draw `block`. `following` is the rest of the plan.
    fn draw(&mut self, block: &Block, following: &[Block]) {
        match block {
            Block::Spacer(height) => self.spacer(*height),
            Block::PageBreak => {
                if self.page_has_content {
                    self.new_page();
                }
            }
            Block::Header {
                logo,
                organization,
                department,
            } => self.header(logo, organization, department),
            Block::Banner(text) => self.banner(text),
            Block::Metadata(rows) => self.metadata(rows),
            Block::SectionHeader(text) => self.section_header(text, following),
            Block::Content(lines) => self.content(lines),
            Block::Photo { image, caption } => self.photo(image, caption),
            Block::Footer(lines) => self.footer(lines),
        }
    }

    // --- page bookkeeping ---

    fn top(&self) -> f32 {
        self.style.page_height_mm - self.style.margin_mm
    }

    fn remaining(&self) -> f32 {
        self.cursor - self.style.margin_mm
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(self.style.page_width_mm),
            Mm(self.style.page_height_mm),
            LAYER_NAME,
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = self.top();
        self.page_count += 1;
        self.page_has_content = false;
    }

    /// Move to a fresh page unless `height` fits here or the page is still empty.
    fn ensure(&mut self, height: f32) {
        if height > self.remaining() && self.page_has_content {
            self.new_page();
        }
    }

    fn advance(&mut self, height: f32) {
        self.cursor -= height;
        self.page_has_content = true;
    }

    fn table_left(&self) -> f32 {
        self.style.margin_mm + (self.style.content_width_mm() - self.table_width()) / 2.0
    }

    fn table_width(&self) -> f32 {
        self.style.table_width_mm.min(self.style.content_width_mm())
    }

    // --- blocks ---

    fn spacer(&mut self, height: f32) {
        if self.page_has_content {
            self.cursor = (self.cursor - height).max(self.style.margin_mm);
        }
    }

    fn header(&mut self, logo: &ReportImage, organization: &str, department: &str) {
        let box_size = self.style.logo_size_mm;
        let text_height = pt(ORGANIZATION_SIZE * 1.2 + DEPARTMENT_SIZE * 1.2);
        let height = box_size.max(text_height);
        self.ensure(height);

        let left = self.table_left();
        let right = left + self.table_width();
        let top = self.cursor;

        let (w, h) = logo.fit_within(box_size, box_size);
        self.image(logo, left, top - h, w);

        let org_baseline = top - baseline_offset(ORGANIZATION_SIZE, ORGANIZATION_SIZE * 1.2);
        self.text_right(organization, ORGANIZATION_SIZE, right, org_baseline, true, self.style.primary);
        let dept_baseline = top - pt(ORGANIZATION_SIZE * 1.2)
            - baseline_offset(DEPARTMENT_SIZE, DEPARTMENT_SIZE * 1.2);
        self.text_right(department, DEPARTMENT_SIZE, right, dept_baseline, false, self.style.caption);

        self.advance(height);
    }

    fn banner(&mut self, text: &str) {
        let width = self.table_width();
        let leading = BANNER_SIZE * 1.2;
        let lines = wrap(&printable(text), width - pt(2.0 * CELL_PADDING), BANNER_SIZE, true);
        let height = pt(2.0 * BANNER_PADDING + leading * lines.len() as f32);
        self.ensure(height);

        let left = self.table_left();
        let top = self.cursor;
        self.fill_rect(left, top, width, height, self.style.primary);

        let center = left + width / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let line_top = top - pt(BANNER_PADDING + leading * i as f32);
            let baseline = line_top - baseline_offset(BANNER_SIZE, leading);
            self.text_centered(line, BANNER_SIZE, center, baseline, true, RgbColor::WHITE);
        }

        self.advance(height);
    }

    fn metadata(&mut self, rows: &[MetadataRow]) {
        let left = self.table_left();
        let width = self.table_width();
        let label_width = inch(METADATA_LABEL_WIDTH_IN).min(width / 2.0);
        let value_left = left + label_width;
        let inner = pt(2.0 * CELL_PADDING);

        for row in rows {
            let labels = wrap(&printable(&row.label), label_width - inner, TABLE_SIZE, true);
            let values = wrap(&printable(&row.value), width - label_width - inner, TABLE_SIZE, false);
            let line_count = labels.len().max(values.len());
            let height = pt(2.0 * TABLE_PADDING_V + TABLE_LEADING * line_count as f32);
            self.ensure(height);

            let top = self.cursor;
            self.fill_rect(left, top, width, height, self.style.light_gray);
            self.stroke_rect(left, top, width, height, self.style.medium_gray);
            self.vertical_rule(value_left, top, height, self.style.medium_gray);

            for (i, line) in labels.iter().enumerate() {
                let baseline = top
                    - pt(TABLE_PADDING_V + TABLE_LEADING * i as f32)
                    - baseline_offset(TABLE_SIZE, TABLE_LEADING);
                self.text(line, TABLE_SIZE, left + pt(CELL_PADDING), baseline, true, self.style.secondary);
            }
            for (i, line) in values.iter().enumerate() {
                let baseline = top
                    - pt(TABLE_PADDING_V + TABLE_LEADING * i as f32)
                    - baseline_offset(TABLE_SIZE, TABLE_LEADING);
                self.text(line, TABLE_SIZE, value_left + pt(CELL_PADDING), baseline, false, self.style.dark_gray);
            }

            self.advance(height);
        }
    }

    fn section_header(&mut self, text: &str, following: &[Block]) {
        let width = self.table_width();
        let leading = SECTION_SIZE * 1.2;
        let height = pt(2.0 * SECTION_PADDING_V + leading);
        // The bar stays on the page of whatever it introduces.
        self.ensure(height + self.keep_with_next(following));

        let left = self.table_left();
        let top = self.cursor;
        self.fill_rect(left, top, width, height, self.style.primary);
        let baseline = top - pt(SECTION_PADDING_V) - baseline_offset(SECTION_SIZE, leading);
        let text = printable(text);
        self.text(&text, SECTION_SIZE, left + pt(CELL_PADDING), baseline, true, RgbColor::WHITE);

        self.advance(height);
    }

    fn content(&mut self, lines: &[String]) {
        let left = self.table_left();
        let width = self.table_width();
        let text_width = width - pt(2.0 * CELL_PADDING);

        let visual: Vec<String> = lines
            .iter()
            .flat_map(|line| wrap(&printable(line), text_width, CONTENT_SIZE, false))
            .collect();

        let padding = pt(2.0 * CELL_PADDING);
        let leading = pt(CONTENT_LEADING);
        let mut next = 0;

        while next < visual.len() {
            let mut fit = ((self.remaining() - padding) / leading).floor().max(0.0) as usize;
            if fit == 0 {
                if self.page_has_content {
                    self.new_page();
                    continue;
                }
                fit = 1;
            }

            let take = fit.min(visual.len() - next);
            let height = padding + leading * take as f32;
            let top = self.cursor;
            self.fill_rect(left, top, width, height, RgbColor::WHITE);
            self.stroke_rect(left, top, width, height, self.style.medium_gray);

            for (i, line) in visual[next..next + take].iter().enumerate() {
                let baseline = top
                    - pt(CELL_PADDING + CONTENT_LEADING * i as f32)
                    - baseline_offset(CONTENT_SIZE, CONTENT_LEADING);
                self.text(line, CONTENT_SIZE, left + pt(CELL_PADDING), baseline, false, self.style.dark_gray);
            }

            self.advance(height);
            next += take;
            if next < visual.len() {
                self.new_page();
            }
        }
    }

    /// Room the first piece of the next non-spacer block needs, spacers included.
    fn keep_with_next(&self, following: &[Block]) -> f32 {
        let mut gap = 0.0;
        for block in following {
            match block {
                Block::Spacer(height) => gap += height,
                Block::Content(_) => return gap + pt(2.0 * CELL_PADDING + CONTENT_LEADING),
                Block::Photo { image, .. } => return gap + self.photo_height(image),
                _ => return 0.0,
            }
        }
        0.0
    }

    fn photo_size(&self, image: &ReportImage) -> (f32, f32) {
        let max = self.style.photo_max_mm.min(self.table_width());
        image.fit_within(max, max)
    }

    fn photo_height(&self, image: &ReportImage) -> f32 {
        let (_, img_h) = self.photo_size(image);
        pt(PHOTO_PADDING_TOP) + img_h
            + pt(PHOTO_CAPTION_GAP + CAPTION_SIZE * 1.2 + PHOTO_PADDING_BOTTOM)
    }

    fn photo(&mut self, image: &ReportImage, caption: &str) {
        let left = self.table_left();
        let width = self.table_width();
        let (img_w, img_h) = self.photo_size(image);
        let caption_leading = CAPTION_SIZE * 1.2;
        let height = self.photo_height(image);
        self.ensure(height);

        let top = self.cursor;
        self.fill_rect(left, top, width, height, RgbColor::WHITE);
        self.stroke_rect(left, top, width, height, self.style.medium_gray);

        let center = left + width / 2.0;
        let img_top = top - pt(PHOTO_PADDING_TOP);
        self.image(image, center - img_w / 2.0, img_top - img_h, img_w);

        let caption_top = img_top - img_h - pt(PHOTO_CAPTION_GAP);
        let baseline = caption_top - baseline_offset(CAPTION_SIZE, caption_leading);
        let caption = printable(caption);
        self.text_centered(&caption, CAPTION_SIZE, center, baseline, false, self.style.caption);

        self.advance(height);
    }

    fn footer(&mut self, lines: &[FooterLine]) {
        let left = self.table_left();
        let width = self.table_width();
        let leading = FOOTER_SIZE * 1.2;
        let height = pt(2.0 * FOOTER_PADDING + leading * lines.len() as f32);
        self.ensure(height);

        let top = self.cursor;
        self.fill_rect(left, top, width, height, self.style.light_gray);
        self.stroke_rect(left, top, width, height, self.style.medium_gray);

        let center = left + width / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let baseline = top
                - pt(FOOTER_PADDING + leading * i as f32)
                - baseline_offset(FOOTER_SIZE, leading);
            let text = printable(&line.text);
            self.text_centered(&text, FOOTER_SIZE, center, baseline, line.bold, self.style.muted);
        }

        self.advance(height);
    }

    // --- primitives ---

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn text(&self, text: &str, size: f32, x: f32, baseline: f32, bold: bool, color: RgbColor) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer
            .use_text(text, size, Mm(x), Mm(baseline), self.font(bold));
    }

    fn text_centered(&self, text: &str, size: f32, center: f32, baseline: f32, bold: bool, color: RgbColor) {
        let x = center - text_width_mm(text, size, bold) / 2.0;
        self.text(text, size, x, baseline, bold, color);
    }

    fn text_right(&self, text: &str, size: f32, right: f32, baseline: f32, bold: bool, color: RgbColor) {
        let text = printable(text);
        let x = right - text_width_mm(&text, size, bold);
        self.text(&text, size, x, baseline, bold, color);
    }

    fn fill_rect(&self, x: f32, top: f32, width: f32, height: f32, color: RgbColor) {
        self.layer.set_fill_color(pdf_color(color));
        self.layer.add_polygon(Polygon {
            rings: vec![rect_points(x, top, width, height)],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    fn stroke_rect(&self, x: f32, top: f32, width: f32, height: f32, color: RgbColor) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(BORDER_WIDTH);
        self.layer.add_line(Line {
            points: rect_points(x, top, width, height),
            is_closed: true,
        });
    }

    fn vertical_rule(&self, x: f32, top: f32, height: f32, color: RgbColor) {
        self.layer.set_outline_color(pdf_color(color));
        self.layer.set_outline_thickness(BORDER_WIDTH);
        self.layer.add_line(Line {
            points: vec![
                (Point::new(Mm(x), Mm(top)), false),
                (Point::new(Mm(x), Mm(top - height)), false),
            ],
            is_closed: false,
        });
    }

    fn image(&self, image: &ReportImage, x: f32, bottom: f32, width: f32) {
        let xobject = ImageXObject {
            width: Px(image.width as usize),
            height: Px(image.height as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: image.rgb.clone(),
            image_filter: None,
            clipping_bbox: None,
            smask: None,
        };

        // DPI that maps the pixel width onto the requested physical width.
        let dpi = image.width as f32 / (width / 25.4);

        Image::from(xobject).add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(bottom)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
    }
}

fn pdf_color(color: RgbColor) -> Color {
    let (r, g, b) = color.to_unit();
    Color::Rgb(Rgb::new(r, g, b, None))
}

fn rect_points(x: f32, top: f32, width: f32, height: f32) -> Vec<(Point, bool)> {
    vec![
        (Point::new(Mm(x), Mm(top - height)), false),
        (Point::new(Mm(x + width), Mm(top - height)), false),
        (Point::new(Mm(x + width), Mm(top)), false),
        (Point::new(Mm(x), Mm(top)), false),
    ]
}

/// Distance in mm from the top of a line box to the baseline, glyphs centered.
fn baseline_offset(size: f32, leading: f32) -> f32 {
    // Helvetica ascender 718, descender 207 (per 1000 em).
    let glyph_height = size * 0.925;
    pt((leading - glyph_height) / 2.0 + size * 0.718)
}
