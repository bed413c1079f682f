//! Session export: every report in the ledger laid out into one PDF.
//!
//! Layout runs in two steps. [`plan_pages`] is pure arithmetic over image
//! sizes and metadata line counts, producing a [`PlacedReport`] per report.
//! [`export_document`] then writes the plan with `lopdf`: report JPEGs are
//! embedded untouched as `DCTDecode` image objects and text uses the
//! built-in Helvetica font, so no font data is embedded.
//!
//! Coordinates in the plan run top-down from the page's top edge, the way
//! the page is read. They are flipped to PDF's bottom-up space only when the
//! content stream is written.
//!
//! Each report occupies, top to bottom:
//!
//! ```text
//! margin
//! Delivery Report: {id}        16pt title, baseline here
//! 20pt gap
//! ┌──────────────────────┐
//! │ report image          │    full content width, aspect preserved
//! └──────────────────────┘
//! 10pt gap
//! Date: …                      10pt metadata, first baseline here
//! Location: …
//! margin (+ margin between reports)
//! ```

use crate::config::ExportConfig;
use crate::imaging::Rect;
use crate::metadata::report_metadata_lines;
use crate::types::Report;
use log::{debug, info};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No reports to export")]
    NoReports,
    #[error("Report \"{0}\" has an empty image")]
    EmptyImage(String),
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Page geometry and typography of the exported document, in points.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub title_size: f64,
    /// Space between the title baseline and the top of the image.
    pub title_gap: f64,
    /// Space between the bottom of the image and the metadata block.
    pub image_gap: f64,
    pub metadata_size: f64,
    pub metadata_line_height: f64,
    pub title_color: [u8; 3],
    pub metadata_color: [u8; 3],
}

impl Default for PageLayout {
    /// A4 portrait with 20pt margins.
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            margin: 20.0,
            title_size: 16.0,
            title_gap: 20.0,
            image_gap: 10.0,
            metadata_size: 10.0,
            metadata_line_height: 1.15,
            title_color: [40, 40, 40],
            metadata_color: [100, 100, 100],
        }
    }
}

impl PageLayout {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            page_width: config.page_width as f64,
            page_height: config.page_height as f64,
            margin: config.margin as f64,
            ..Self::default()
        }
    }

    /// Width every report image is scaled to.
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    fn metadata_block_height(&self, lines: usize) -> f64 {
        lines as f64 * self.metadata_size * self.metadata_line_height
    }
}

/// What [`plan_pages`] needs to know about one report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportExtent {
    pub image_width: u32,
    pub image_height: u32,
    pub metadata_lines: usize,
}

impl ReportExtent {
    pub fn of(report: &Report) -> Self {
        Self {
            image_width: report.image.width,
            image_height: report.image.height,
            metadata_lines: report_metadata_lines(&report.metadata).len(),
        }
    }
}

/// Where one report lands. All y values are measured down from the top
/// edge of its page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedReport {
    pub index: usize,
    /// Zero-based page number.
    pub page: usize,
    pub title_baseline: f64,
    pub image: Rect,
    /// Baseline of the first metadata line.
    pub metadata_baseline: f64,
}

/// Lay reports out top to bottom, starting a new page when a report's
/// image would cross the bottom margin.
///
/// A report that is first on its page is never moved, even if it does not
/// fit, so every page holds at least one report and an oversized image
/// cannot cause an endless run of blank pages.
pub fn plan_pages(extents: &[ReportExtent], layout: &PageLayout) -> Vec<PlacedReport> {
    let image_width = layout.content_width();
    let mut placed = Vec::with_capacity(extents.len());
    let mut page = 0;
    let mut cursor = layout.margin;
    let mut first_on_page = true;

    for (index, extent) in extents.iter().enumerate() {
        let image_height =
            extent.image_height as f64 * image_width / extent.image_width.max(1) as f64;

        if cursor + image_height + layout.margin > layout.page_height && !first_on_page {
            page += 1;
            cursor = layout.margin;
        }

        let title_baseline = cursor;
        cursor += layout.title_gap;

        let image = Rect::new(layout.margin, cursor, image_width, image_height);
        cursor += image_height + layout.image_gap;

        let metadata_baseline = cursor;
        cursor += layout.metadata_block_height(extent.metadata_lines) + layout.margin;
        if index + 1 < extents.len() {
            cursor += layout.margin;
        }

        placed.push(PlacedReport {
            index,
            page,
            title_baseline,
            image,
            metadata_baseline,
        });
        first_on_page = false;
    }
    placed
}

/// A finished PDF, ready to write.
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub page_count: usize,
}

pub fn report_title(report: &Report) -> String {
    format!("Delivery Report: {}", report.id)
}

/// Render all `reports`, in order, into one PDF.
pub fn export_document(
    reports: &[Report],
    layout: &PageLayout,
    filename: &str,
) -> Result<ExportedDocument, ExportError> {
    if reports.is_empty() {
        return Err(ExportError::NoReports);
    }
    if let Some(empty) = reports
        .iter()
        .find(|r| r.image.bytes.is_empty() || r.image.width == 0 || r.image.height == 0)
    {
        return Err(ExportError::EmptyImage(empty.id.clone()));
    }

    let extents: Vec<ReportExtent> = reports.iter().map(ReportExtent::of).collect();
    let plan = plan_pages(&extents, layout);
    let page_count = plan.last().map_or(0, |p| p.page + 1);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::with_capacity(page_count);
    for page in 0..page_count {
        let on_page: Vec<&PlacedReport> = plan.iter().filter(|p| p.page == page).collect();
        let mut operations = Vec::new();
        let mut xobjects = lopdf::Dictionary::new();

        for placed in on_page {
            let report = &reports[placed.index];
            let name = format!("Im{}", placed.index);
            xobjects.set(name.as_bytes(), add_jpeg(&mut doc, report));
            write_report(&mut operations, report, placed, &name, layout);
        }

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
                "XObject" => xobjects,
            },
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count as i64,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                (layout.page_width as f32).into(),
                (layout.page_height as f32).into(),
            ],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal("Delivery Journey Report"),
        "Creator" => Object::string_literal(concat!("delivery-collage ", env!("CARGO_PKG_VERSION"))),
    });
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    info!(
        "Exported {} report(s) on {} page(s), {} bytes",
        reports.len(),
        page_count,
        bytes.len()
    );
    Ok(ExportedDocument {
        bytes,
        filename: filename.to_string(),
        page_count,
    })
}

/// Embed a report's JPEG as an image XObject.
fn add_jpeg(doc: &mut Document, report: &Report) -> ObjectId {
    let stream = Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => report.image.width as i64,
            "Height" => report.image.height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
            "Filter" => "DCTDecode",
        },
        report.image.bytes.to_vec(),
    )
    .with_compression(false);
    doc.add_object(stream)
}

/// Title, image and metadata block of one report.
fn write_report(
    ops: &mut Vec<Operation>,
    report: &Report,
    placed: &PlacedReport,
    image_name: &str,
    layout: &PageLayout,
) {
    let flip = |y: f64| (layout.page_height - y) as f32;
    let x = layout.margin as f32;

    text_block(
        ops,
        &[report_title(report)],
        x,
        flip(placed.title_baseline),
        layout.title_size as f32,
        0.0,
        layout.title_color,
    );

    let rect = placed.image;
    ops.push(Operation::new("q", vec![]));
    ops.push(Operation::new(
        "cm",
        vec![
            (rect.width as f32).into(),
            0.into(),
            0.into(),
            (rect.height as f32).into(),
            (rect.x as f32).into(),
            flip(rect.bottom()).into(),
        ],
    ));
    ops.push(Operation::new("Do", vec![image_name.into()]));
    ops.push(Operation::new("Q", vec![]));

    text_block(
        ops,
        &report_metadata_lines(&report.metadata),
        x,
        flip(placed.metadata_baseline),
        layout.metadata_size as f32,
        (layout.metadata_size * layout.metadata_line_height) as f32,
        layout.metadata_color,
    );
    debug!(
        "Placed \"{}\" on page {} at y={:.1}",
        report.id,
        placed.page + 1,
        placed.title_baseline
    );
}

/// Lines of Helvetica text, first baseline at (`x`, `y`) in PDF space.
fn text_block(
    ops: &mut Vec<Operation>,
    lines: &[String],
    x: f32,
    y: f32,
    size: f32,
    leading: f32,
    color: [u8; 3],
) {
    let [r, g, b] = color.map(|c| c as f32 / 255.0);
    ops.push(Operation::new("BT", vec![]));
    ops.push(Operation::new("Tf", vec!["F1".into(), size.into()]));
    ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    ops.push(Operation::new("Td", vec![x.into(), y.into()]));
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push(Operation::new("Td", vec![0.into(), (-leading).into()]));
        }
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(line))],
        ));
    }
    ops.push(Operation::new("ET", vec![]));
}

/// Encode text for a WinAnsi font; characters outside it become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    let mut buf = [0u8; 4];
    text.chars()
        .flat_map(|ch| {
            let encoded =
                Document::encode_text(Some("WinAnsiEncoding"), ch.encode_utf8(&mut buf));
            if encoded.is_empty() { vec![b'?'] } else { encoded }
        })
        .collect()
}
