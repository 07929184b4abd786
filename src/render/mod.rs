//! HTML to PDF rendering
//!
//! Defines the rendering seam of the service: the page geometry types, the
//! `RenderJob` handed to an engine, and the `HtmlRenderer` trait that the
//! production Chromium engine in [`chrome`] implements. Keeping the engine
//! behind a trait lets route tests substitute a scripted renderer that
//! never launches a browser.

pub mod chrome;

use std::fmt;
use std::path::PathBuf;

use async_trait::async_trait;
use headless_chrome::types::PrintToPdfOptions;
use thiserror::Error;

pub use chrome::ChromiumRenderer;

/// Millimetres per inch; DevTools takes paper dimensions in inches.
const MM_PER_INCH: f64 = 25.4;

/// Result alias for rendering operations
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors raised while rendering a document
#[derive(Error, Debug)]
pub enum RenderError {
    /// The document could not be staged for the engine.
    #[error("failed to stage document: {0}")]
    Stage(#[from] std::io::Error),

    /// The engine itself failed: browser launch, navigation or printing.
    #[error(transparent)]
    Engine(#[from] anyhow::Error),

    /// The engine reported success but produced no bytes.
    #[error("render engine produced an empty document")]
    EmptyOutput,
}

impl RenderError {
    /// Full failure trace: the error message followed by every cause in the
    /// chain, one per line.
    pub fn trace(&self) -> String {
        match self {
            RenderError::Engine(err) => format!("{err:?}"),
            other => {
                let mut trace = other.to_string();
                let mut source = std::error::Error::source(other);
                while let Some(cause) = source {
                    trace.push_str("\ncaused by: ");
                    trace.push_str(&cause.to_string());
                    source = cause.source();
                }
                trace
            }
        }
    }
}

/// Supported output page sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    A4,
    A3,
}

impl PageSize {
    /// Natural (portrait) page dimensions in millimetres.
    pub fn dimensions_mm(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (210.0, 297.0),
            PageSize::A3 => (297.0, 420.0),
        }
    }

    /// Parse a `pageSize` query value. Matching is case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "a4" => Some(PageSize::A4),
            "a3" => Some(PageSize::A3),
            _ => None,
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::A4 => write!(f, "A4"),
            PageSize::A3 => write!(f, "A3"),
        }
    }
}

/// Page orientation of the output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Parse an `orientation` query value. Matching is case-insensitive.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "portrait" => Some(Orientation::Portrait),
            "landscape" => Some(Orientation::Landscape),
            _ => None,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Landscape => write!(f, "landscape"),
        }
    }
}

/// Concrete page geometry for one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageGeometry {
    size: PageSize,
    orientation: Orientation,
}

impl PageGeometry {
    pub fn new(size: PageSize, orientation: Orientation) -> Self {
        Self { size, orientation }
    }

    pub fn size(&self) -> PageSize {
        self.size
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Output dimensions in millimetres. Landscape rotates the natural
    /// portrait dimensions of the page.
    pub fn dimensions_mm(&self) -> (f64, f64) {
        let (width, height) = self.size.dimensions_mm();
        match self.orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        }
    }

    /// DevTools print options for this geometry.
    ///
    /// The geometry acts as the document's default page: an explicit
    /// `@page` rule in the document still wins via `prefer_css_page_size`.
    /// Output is tagged for accessibility. Orientation is already folded
    /// into the paper dimensions, so the `landscape` flag stays unset.
    pub fn print_options(&self) -> PrintToPdfOptions {
        let (width_mm, height_mm) = self.dimensions_mm();
        PrintToPdfOptions {
            paper_width: Some(width_mm / MM_PER_INCH),
            paper_height: Some(height_mm / MM_PER_INCH),
            print_background: Some(true),
            prefer_css_page_size: Some(true),
            generate_tagged_pdf: Some(true),
            ..Default::default()
        }
    }
}

/// One prepared conversion: the HTML document, the page geometry to print
/// with, and the directory holding the request's staged auxiliary assets.
/// The directory doubles as the base for resolving relative references
/// from the document.
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub html: Vec<u8>,
    pub geometry: PageGeometry,
    pub assets_dir: PathBuf,
}

/// A rendering engine that turns one HTML document into PDF bytes.
#[async_trait]
pub trait HtmlRenderer: Send + Sync {
    /// Render `job` into a complete PDF document.
    async fn render(&self, job: RenderJob) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn a4_portrait_is_the_default_geometry() {
        let geometry = PageGeometry::default();
        assert_eq!(geometry, PageGeometry::new(PageSize::A4, Orientation::Portrait));
        assert_eq!(geometry.dimensions_mm(), (210.0, 297.0));
    }

    #[test]
    fn landscape_rotates_the_page() {
        let geometry = PageGeometry::new(PageSize::A3, Orientation::Landscape);
        assert_eq!(geometry.dimensions_mm(), (420.0, 297.0));
    }

    #[test]
    fn a3_is_larger_than_a4() {
        assert_eq!(PageSize::A3.dimensions_mm(), (297.0, 420.0));
    }

    #[test]
    fn page_size_parsing_ignores_case() {
        assert_eq!(PageSize::parse("A4"), Some(PageSize::A4));
        assert_eq!(PageSize::parse("a3"), Some(PageSize::A3));
        assert_eq!(PageSize::parse("A3"), Some(PageSize::A3));
    }

    #[test]
    fn unknown_page_sizes_do_not_parse() {
        assert_eq!(PageSize::parse("letter"), None);
        assert_eq!(PageSize::parse("a5"), None);
        assert_eq!(PageSize::parse(""), None);
    }

    #[test]
    fn orientation_parsing_ignores_case() {
        assert_eq!(Orientation::parse("Portrait"), Some(Orientation::Portrait));
        assert_eq!(Orientation::parse("LANDSCAPE"), Some(Orientation::Landscape));
        assert_eq!(Orientation::parse("sideways"), None);
    }

    #[test]
    fn print_options_convert_millimetres_to_inches() {
        let options = PageGeometry::default().print_options();
        let width = options.paper_width.unwrap();
        let height = options.paper_height.unwrap();
        assert!((width - 8.27).abs() < 0.01, "A4 width was {width}in");
        assert!((height - 11.69).abs() < 0.01, "A4 height was {height}in");
    }

    #[test]
    fn print_options_fold_orientation_into_the_dimensions() {
        let options =
            PageGeometry::new(PageSize::A3, Orientation::Landscape).print_options();
        let width = options.paper_width.unwrap();
        let height = options.paper_height.unwrap();
        assert!((width - 16.54).abs() < 0.01, "A3 landscape width was {width}in");
        assert!((height - 11.69).abs() < 0.01, "A3 landscape height was {height}in");
        assert_eq!(options.landscape, None);
    }

    #[test]
    fn print_options_request_a_tagged_document() {
        let options = PageGeometry::default().print_options();
        assert_eq!(options.generate_tagged_pdf, Some(true));
        assert_eq!(options.print_background, Some(true));
        assert_eq!(options.prefer_css_page_size, Some(true));
    }

    #[test]
    fn engine_trace_lists_every_cause() {
        let err: anyhow::Error = anyhow::anyhow!("tab crashed");
        let err = RenderError::Engine(err.context("printing failed"));

        let trace = err.trace();
        assert!(trace.contains("printing failed"), "trace was: {trace}");
        assert!(trace.contains("tab crashed"), "trace was: {trace}");
    }

    #[test]
    fn stage_trace_carries_the_io_message() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory");
        let trace = RenderError::Stage(io).trace();
        assert!(trace.contains("no such directory"), "trace was: {trace}");
    }

    #[test]
    fn context_chains_survive_the_conversion_to_engine_errors() {
        let result: anyhow::Result<()> =
            Err(anyhow::anyhow!("socket closed")).context("browser handshake failed");
        let err = RenderError::from(result.unwrap_err());
        assert!(err.to_string().contains("browser handshake failed"));
    }
}
