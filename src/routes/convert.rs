//! HTML to PDF conversion endpoint
//!
//! `POST /api/convert?client=<id>&key=<key>&orientation=<o>&pageSize=<s>`
//!
//! The multipart body carries the HTML document in a part filenamed
//! `doc.html`, plus any number of auxiliary parts (images, stylesheets,
//! fonts) referenced from it. Auxiliary parts are staged under their
//! declared filenames into a per-request workspace that the renderer uses
//! to resolve relative references; the workspace is gone again by the time
//! the response goes out, whatever the outcome.
//!
//! Requests that fail the client key check are answered with an empty 404,
//! keeping the endpoint invisible to probes.

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::render::{Orientation, PageGeometry, PageSize, RenderJob};
use crate::state::AppState;
use crate::workspace::Workspace;

/// Filename that designates the HTML document part of the upload.
pub const DOC_FILE_NAME: &str = "doc.html";

/// Upload cap. Conversions ship fonts and images alongside the document,
/// so this sits well above typical document sizes.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Create the convert router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/convert", post(convert))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Query parameters of the convert endpoint. Credentials default to empty
/// strings so absent and wrong values share one rejection path.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertQuery {
    #[serde(default)]
    pub client: String,
    #[serde(default)]
    pub key: String,
    pub orientation: Option<String>,
    pub page_size: Option<String>,
}

/// One buffered file part of the upload.
struct FilePart {
    file_name: String,
    contents: Bytes,
}

/// The upload split into the document and its auxiliary assets.
struct UploadedForm {
    document: Option<Bytes>,
    assets: Vec<FilePart>,
}

/// Handle one conversion request.
///
/// The raw request is taken whole so that nothing touches the body before
/// the credential check: an unauthenticated caller gets the same empty 404
/// whether the body is multipart, plain text or absent. The multipart
/// stream is only built, and therefore the content type only judged, once
/// the caller is known.
async fn convert(
    State(state): State<AppState>,
    Query(params): Query<ConvertQuery>,
    request: Request,
) -> Result<Response> {
    if !state.client_keys().authorize(&params.client, &params.key) {
        tracing::warn!(client = %params.client, "Rejected conversion request with unknown credentials");
        return Err(AppError::Unauthorized);
    }

    let geometry = PageGeometry::new(
        parse_page_size(params.page_size.as_deref())?,
        parse_orientation(params.orientation.as_deref())?,
    );

    let multipart = Multipart::from_request(request, &()).await?;
    let form = collect_form(multipart).await?;
    let Some(html) = form.document else {
        return Err(AppError::MissingDocument);
    };

    let conversion_id = Uuid::new_v4();
    tracing::info!(
        %conversion_id,
        client = %params.client,
        page_size = %geometry.size(),
        orientation = %geometry.orientation(),
        assets = form.assets.len(),
        html_bytes = html.len(),
        "Converting document"
    );

    let workspace = Workspace::create()?;
    for part in &form.assets {
        workspace.stage(&part.file_name, &part.contents).await?;
    }

    let job = RenderJob {
        html: html.to_vec(),
        geometry,
        assets_dir: workspace.path().to_path_buf(),
    };
    let pdf = state.renderer().render(job).await?;

    tracing::info!(%conversion_id, pdf_bytes = pdf.len(), "Conversion complete");

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/pdf")
        .body(Body::from(pdf))
        .expect("hardcoded headers cannot fail"))
}

/// Buffer every file part of the form. The first part filenamed `doc.html`
/// becomes the document; later parts under that filename are discarded.
/// Parts without a filename are plain form fields and are skipped.
async fn collect_form(mut multipart: Multipart) -> Result<UploadedForm> {
    let mut document = None;
    let mut assets = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let contents = field.bytes().await?;

        if file_name == DOC_FILE_NAME {
            if document.is_none() {
                document = Some(contents);
            }
        } else {
            assets.push(FilePart {
                file_name,
                contents,
            });
        }
    }

    Ok(UploadedForm { document, assets })
}

fn parse_page_size(value: Option<&str>) -> Result<PageSize> {
    match value {
        None => Ok(PageSize::default()),
        Some(raw) => PageSize::parse(raw).ok_or_else(|| AppError::InvalidParameter {
            name: "pageSize",
            value: raw.to_string(),
        }),
    }
}

fn parse_orientation(value: Option<&str>) -> Result<Orientation> {
    match value {
        None => Ok(Orientation::default()),
        Some(raw) => Orientation::parse(raw).ok_or_else(|| AppError::InvalidParameter {
            name: "orientation",
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_parameters_fall_back_to_defaults() {
        assert_eq!(parse_page_size(None).unwrap(), PageSize::A4);
        assert_eq!(parse_orientation(None).unwrap(), Orientation::Portrait);
    }

    #[test]
    fn parameters_parse_case_insensitively() {
        assert_eq!(parse_page_size(Some("a3")).unwrap(), PageSize::A3);
        assert_eq!(
            parse_orientation(Some("Landscape")).unwrap(),
            Orientation::Landscape
        );
    }

    #[test]
    fn unsupported_values_are_rejected_with_the_parameter_name() {
        let err = parse_page_size(Some("letter")).unwrap_err();
        assert!(err.to_string().contains("pageSize"));
        assert!(err.to_string().contains("letter"));

        let err = parse_orientation(Some("diagonal")).unwrap_err();
        assert!(err.to_string().contains("orientation"));
    }
}
