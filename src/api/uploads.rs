//! Image upload endpoint.

use axum::{
    body::Bytes,
    extract::{Multipart, State},
};
use serde::Serialize;

use super::{error, success, ApiResult};
use crate::auth::AdminAccess;
use crate::errors::AppError;
use crate::AppState;

/// Public path prefix uploaded files are served under.
pub const UPLOADS_PATH: &str = "/uploads";

#[derive(Debug, Serialize)]
pub struct UploadedFile {
    pub url: String,
}

/// File extension for an image content type (`image/svg+xml` -> `svg`).
fn image_extension(content_type: &str) -> Option<String> {
    let subtype = content_type.strip_prefix("image/")?;
    let subtype = subtype.split(['+', ';']).next().unwrap_or(subtype).trim();
    let extension = match subtype {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "x-icon" | "vnd.microsoft.icon" => "ico".to_string(),
        other => other.to_ascii_lowercase(),
    };
    if extension.is_empty() || !extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(extension)
}

/// Keep only characters that are safe in a file name.
fn file_prefix(kind: &str) -> String {
    let cleaned: String = kind
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .take(32)
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

/// POST /api/upload - Store an image and return its public URL.
pub async fn upload_image(
    _admin: AdminAccess,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<UploadedFile> {
    let mut file: Option<(String, Bytes)> = None;
    let mut kind = String::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error(AppError::BadRequest(e.body_text()), 0),
        };

        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let content_type = field.content_type().unwrap_or_default().to_string();
                match field.bytes().await {
                    Ok(bytes) => file = Some((content_type, bytes)),
                    Err(e) => return error(AppError::BadRequest(e.body_text()), 0),
                }
            }
            Some("type") => match field.text().await {
                Ok(text) => kind = text,
                Err(e) => return error(AppError::BadRequest(e.body_text()), 0),
            },
            _ => {}
        }
    }

    let Some((content_type, bytes)) = file else {
        return error(AppError::Validation("file is required".to_string()), 0);
    };
    let Some(extension) = image_extension(&content_type) else {
        return error(
            AppError::Validation("Please upload an image file".to_string()),
            0,
        );
    };
    if bytes.is_empty() {
        return error(AppError::Validation("Uploaded file is empty".to_string()), 0);
    }
    if bytes.len() > state.config.max_upload_bytes {
        return error(
            AppError::Validation(format!(
                "File exceeds the maximum size of {} bytes",
                state.config.max_upload_bytes
            )),
            0,
        );
    }

    let name = format!("{}-{}.{}", file_prefix(&kind), uuid::Uuid::new_v4(), extension);
    let path = state.config.upload_dir.join(&name);
    if let Err(e) = tokio::fs::create_dir_all(&state.config.upload_dir).await {
        return error(e.into(), 0);
    }
    if let Err(e) = tokio::fs::write(&path, &bytes).await {
        return error(e.into(), 0);
    }

    tracing::info!(file = %name, bytes = bytes.len(), "Image uploaded");
    success(
        UploadedFile {
            url: format!("{}/{}", UPLOADS_PATH, name),
        },
        0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/png").as_deref(), Some("png"));
        assert_eq!(image_extension("image/jpeg").as_deref(), Some("jpg"));
        assert_eq!(image_extension("image/svg+xml").as_deref(), Some("svg"));
        assert_eq!(image_extension("text/html"), None);
        assert_eq!(image_extension("image/../x"), None);
    }

    #[test]
    fn test_file_prefix() {
        assert_eq!(file_prefix("sponsor"), "sponsor");
        assert_eq!(file_prefix("../Logo!"), "logo");
        assert_eq!(file_prefix(""), "image");
    }
}
