//! Chromium rendering engine
//!
//! Converts HTML to PDF by driving a headless Chromium over the DevTools
//! protocol. The document is written into the job's asset directory and
//! loaded from a `file://` URL, so relative image, stylesheet and
//! `@font-face` references resolve against the staged assets. A fresh
//! browser is launched per job on the blocking pool and torn down with it,
//! keeping concurrent conversions isolated from one another.

use std::path::PathBuf;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use url::Url;

use crate::config::RendererConfig;

use super::{HtmlRenderer, RenderError, RenderJob, Result};

/// Filename the HTML document is staged under inside the asset directory.
const DOC_FILE_NAME: &str = "doc.html";

/// Production renderer backed by headless Chromium.
pub struct ChromiumRenderer {
    chrome_binary: Option<PathBuf>,
}

impl ChromiumRenderer {
    pub fn new(config: RendererConfig) -> Self {
        Self {
            chrome_binary: config.chrome_binary,
        }
    }
}

#[async_trait]
impl HtmlRenderer for ChromiumRenderer {
    async fn render(&self, job: RenderJob) -> Result<Vec<u8>> {
        let chrome_binary = self.chrome_binary.clone();
        tokio::task::spawn_blocking(move || print_job(chrome_binary, &job))
            .await
            .map_err(|e| RenderError::Engine(anyhow!("render task aborted: {e}")))?
    }
}

/// Run one conversion start to finish. Blocking; must stay off the async
/// runtime threads.
fn print_job(chrome_binary: Option<PathBuf>, job: &RenderJob) -> Result<Vec<u8>> {
    let doc_path = job.assets_dir.join(DOC_FILE_NAME);
    std::fs::write(&doc_path, &job.html)?;

    let (width_mm, height_mm) = job.geometry.dimensions_mm();
    tracing::debug!(
        page_size = %job.geometry.size(),
        orientation = %job.geometry.orientation(),
        width_mm,
        height_mm,
        "Printing document via headless Chromium"
    );

    let url = Url::from_file_path(&doc_path).map_err(|_| {
        RenderError::Engine(anyhow!(
            "document path {} cannot be expressed as a file URL",
            doc_path.display()
        ))
    })?;

    let browser = launch_browser(chrome_binary)?;
    let tab = browser.new_tab().context("failed to open a browser tab")?;

    tab.navigate_to(url.as_str())
        .context("failed to load the document")?;
    tab.wait_until_navigated()
        .context("document did not finish loading")?;

    let pdf = tab
        .print_to_pdf(Some(job.geometry.print_options()))
        .context("printing to PDF failed")?;

    if pdf.is_empty() {
        return Err(RenderError::EmptyOutput);
    }

    tracing::debug!(pdf_bytes = pdf.len(), "Chromium print complete");
    Ok(pdf)
}

fn launch_browser(chrome_binary: Option<PathBuf>) -> Result<Browser> {
    let options = LaunchOptions::default_builder()
        .path(chrome_binary)
        .build()
        .map_err(|e| RenderError::Engine(anyhow!("could not assemble launch options: {e}")))?;

    let browser = Browser::new(options).context("failed to launch headless Chromium")?;
    Ok(browser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::PageGeometry;

    fn job_in(dir: &tempfile::TempDir, html: &[u8]) -> RenderJob {
        RenderJob {
            html: html.to_vec(),
            geometry: PageGeometry::default(),
            assets_dir: dir.path().to_path_buf(),
        }
    }

    #[tokio::test]
    async fn missing_browser_binary_is_an_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChromiumRenderer::new(RendererConfig {
            chrome_binary: Some(PathBuf::from("/nonexistent/chromium")),
        });

        let err = renderer
            .render(job_in(&dir, b"<html></html>"))
            .await
            .unwrap_err();
        assert!(matches!(err, RenderError::Engine(_)), "got: {err}");
    }

    #[tokio::test]
    async fn unwritable_asset_directory_is_a_staging_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job_in(&dir, b"<html></html>");
        job.assets_dir = dir.path().join("does-not-exist");

        let renderer = ChromiumRenderer::new(RendererConfig::default());
        let err = renderer.render(job).await.unwrap_err();
        assert!(matches!(err, RenderError::Stage(_)), "got: {err}");
    }

    /// Needs a locally installed Chromium; run with `cargo test -- --ignored`.
    #[tokio::test]
    #[ignore]
    async fn prints_a_minimal_document() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = ChromiumRenderer::new(RendererConfig::default());

        let pdf = renderer
            .render(job_in(&dir, b"<html><body><p>hola</p></body></html>"))
            .await
            .unwrap();
        assert!(pdf.starts_with(b"%PDF"), "output did not look like a PDF");
    }
}
