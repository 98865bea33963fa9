//! Report module - turns a maintenance log record into a paginated PDF.
//!
//! - `fetcher` - best-effort logo download
//! - `decoder` - embedded photo decoding
//! - `composer` - record to ordered layout blocks
//! - `engine` - layout blocks to PDF pages
//! - `handlers` - the `/generate-pdf` endpoint

pub mod blocks;
pub mod common;
pub mod composer;
pub mod decoder;
pub mod engine;
pub mod fetcher;
pub mod handlers;
pub mod measure;
pub mod style;

pub use composer::ReportComposer;
pub use fetcher::LogoFetcher;
pub use style::ReportStyle;

use thiserror::Error;

/// Errors that can occur while rendering a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to load built-in font: {0}")]
    Font(String),
    #[error("failed to serialize PDF: {0}")]
    Serialize(String),
    #[error("failed to flush PDF buffer: {0}")]
    Flush(#[source] std::io::Error),
    #[error("report worker failed: {0}")]
    Worker(String),
}

/// Result of a successful report render.
#[derive(Debug)]
pub struct RenderedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
    pub page_count: usize,
}
