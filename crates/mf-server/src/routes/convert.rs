//! `POST /convert` -- upload a video, receive its audio as an MP3 download.
//!
//! Each request gets its own [`Scratch`] directory. The scratch guard is
//! dropped on every error path, and on success it is moved into the response
//! body stream so the files are removed once the body has been sent (or the
//! client went away).

use std::path::Path;

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use tokio::io::AsyncWriteExt;
use tokio_stream::StreamExt;
use tokio_util::io::ReaderStream;

use mf_av::{extract_mp3, ExtractOptions, Scratch};
use mf_core::{content_disposition, download_name, ConversionId, Error};

use crate::context::AppContext;
use crate::error::AppError;

/// Multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

const MP3_CONTENT_TYPE: &str = "audio/mpeg";

/// `POST /convert`
pub async fn convert(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let redact = ctx.config.server.redact_errors;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::new(upload_error(e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            tracing::debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        return convert_upload(&ctx, field)
            .await
            .map_err(|e| AppError::new(e).redacted(redact));
    }

    Err(AppError::new(Error::MissingFile))
}

async fn convert_upload(ctx: &AppContext, mut field: Field<'_>) -> mf_core::Result<Response> {
    let filename = match field.file_name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err(Error::MissingFile),
    };
    let download = download_name(&filename);

    let id = ConversionId::new();
    let scratch = Scratch::create_in(&ctx.config.server.scratch_root(), id)?;

    let bytes = persist_upload(&mut field, &scratch.input()).await?;
    tracing::info!(
        conversion_id = %id,
        filename = %filename,
        bytes,
        "Upload stored"
    );

    let options = ExtractOptions::from(&ctx.config.conversion);
    extract_mp3(&ctx.tools, &scratch.input(), &scratch.output(), &options).await?;

    attachment_response(scratch, &download).await
}

/// Stream the field body into `path`, returning the number of bytes written.
async fn persist_upload(field: &mut Field<'_>, path: &Path) -> mf_core::Result<u64> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written = 0u64;

    while let Some(chunk) = field.chunk().await.map_err(upload_error)? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }

    file.flush().await?;
    Ok(written)
}

/// Build the download response; `scratch` lives until the body is finished.
async fn attachment_response(scratch: Scratch, download: &str) -> mf_core::Result<Response> {
    let file = tokio::fs::File::open(scratch.output()).await?;
    let len = file.metadata().await?.len();
    let id = scratch.id();

    let body = async_stream::stream! {
        let _scratch = scratch;
        let mut chunks = ReaderStream::new(file);
        while let Some(chunk) = chunks.next().await {
            yield chunk;
        }
    };

    tracing::info!(conversion_id = %id, download = %download, bytes = len, "Sending MP3");

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, MP3_CONTENT_TYPE)
        .header(header::CONTENT_LENGTH, len)
        .header(header::CONTENT_DISPOSITION, content_disposition(download))
        .body(Body::from_stream(body))
        .map_err(|e| Error::Internal(format!("failed to build response: {e}")))
}

/// Every multipart failure is a 400 upload error, including a body-limit
/// breach that axum would otherwise report as 413.
fn upload_error(e: MultipartError) -> Error {
    tracing::debug!(status = %e.status(), "Multipart upload rejected: {}", e.body_text());
    Error::Upload(e.body_text())
}
