//! Upload page handlers.

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::SignedCookieJar;

use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::{flash, page};
use crate::UploadError;

/// Form field carrying the uploaded files.
pub const FILE_FIELD: &str = "file";

/// Flash message for a submission without any file parts.
pub const NO_FILE_SELECTED: &str = "No file selected.";

/// One file part of a submitted form.
struct FilePart {
    filename: String,
    content: Bytes,
}

/// GET / - Show the upload form, pending flash messages and stored files.
pub async fn index(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Html<String>), ApiError> {
    let files = state.store.list().await?;

    let (jar, messages) = flash::take(jar, &state.flash_cookie);

    Ok((jar, Html(page::render_index(&messages, &files))))
}

/// POST / - Store every file part of the form, then redirect back to the page.
///
/// The reported count is the number of `file` parts received, including
/// empty slots that were skipped.
pub async fn upload(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    multipart: Option<Multipart>,
) -> Result<(SignedCookieJar, Redirect), ApiError> {
    let parts = match multipart {
        Some(multipart) => collect_file_parts(multipart).await?,
        None => Vec::new(),
    };

    if parts.is_empty() {
        tracing::debug!("Upload form submitted without file parts");
        let jar = flash::push(jar, &state.flash_cookie, NO_FILE_SELECTED);
        return Ok((jar, Redirect::to("/")));
    }

    let mut failed = 0;
    for part in &parts {
        if part.filename.is_empty() {
            continue;
        }

        match state.store.save(&part.filename, &part.content).await {
            Ok(stored_name) => {
                tracing::info!(
                    filename = %stored_name,
                    size = part.content.len(),
                    "Stored upload"
                );
            }
            Err(UploadError::Validation(msg)) => {
                tracing::warn!("Skipping upload: {}", msg);
            }
            Err(e) => {
                tracing::error!(filename = %part.filename, "Failed to save upload: {}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        return Err(ApiError::internal("Failed to save uploaded file"));
    }

    let message = format!("Successfully uploaded {} file(s).", parts.len());
    let jar = flash::push(jar, &state.flash_cookie, message);

    Ok((jar, Redirect::to("/")))
}

/// Read every `file` part of the form into memory, in the order received.
///
/// Fields without a filename are plain form values and are ignored. The
/// whole form is read before anything is written, so a malformed body
/// leaves the store untouched.
async fn collect_file_parts(mut multipart: Multipart) -> Result<Vec<FilePart>, ApiError> {
    let mut parts = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let content = field.bytes().await.map_err(multipart_error)?;
        parts.push(FilePart { filename, content });
    }

    Ok(parts)
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!("Upload rejected: {}", e);
        ApiError::payload_too_large("Request body too large")
    } else {
        tracing::warn!("Failed to read multipart data: {}", e);
        ApiError::bad_request("Invalid multipart data")
    }
}
