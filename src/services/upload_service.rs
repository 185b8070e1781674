use std::path::PathBuf;

use uuid::Uuid;

use crate::{
    dto::uploads::{ImageFolder, UploadedImage},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_any_role},
    models::Role,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// A file taken out of a multipart form, not yet validated.
#[derive(Debug)]
pub struct ImageUpload {
    pub folder: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// File extension for an image content type. Falls back to the client file
/// name for image types without a well-known extension.
pub fn extension_for(content_type: &str, file_name: Option<&str>) -> String {
    let known = match content_type {
        "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "image/bmp" => Some("bmp"),
        "image/avif" => Some("avif"),
        _ => None,
    };
    if let Some(ext) = known {
        return ext.to_string();
    }

    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "img".to_string())
}

/// Checks type and size, returning the normalized content type.
pub fn validate_image(content_type: Option<&str>, size: usize, max_bytes: usize) -> AppResult<String> {
    let content_type = content_type
        .map(|c| c.trim().to_ascii_lowercase())
        .unwrap_or_default();
    if !content_type.starts_with("image/") {
        return Err(AppError::BadRequest("Only image files can be uploaded".into()));
    }
    if size == 0 {
        return Err(AppError::BadRequest("File is empty".into()));
    }
    if size > max_bytes {
        return Err(AppError::PayloadTooLarge);
    }
    Ok(content_type)
}

/// Relative storage path `folder/user_id/name.ext`, also the URL suffix.
pub fn object_path(folder: ImageFolder, user_id: Uuid, ext: &str) -> String {
    format!("{}/{}/{}.{}", folder.as_str(), user_id, Uuid::new_v4(), ext)
}

pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    upload: ImageUpload,
) -> AppResult<ApiResponse<UploadedImage>> {
    ensure_any_role(user, &[Role::Admin, Role::Store])?;
    let folder = upload.folder.trim().parse::<ImageFolder>()?;
    let content_type = validate_image(
        upload.content_type.as_deref(),
        upload.bytes.len(),
        state.config.max_upload_bytes,
    )?;

    let ext = extension_for(&content_type, upload.file_name.as_deref());
    let path = object_path(folder, user.user_id, &ext);
    let target = PathBuf::from(&state.config.upload_dir).join(&path);

    if let Some(dir) = target.parent() {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("creating upload dir: {e}")))?;
    }
    tokio::fs::write(&target, &upload.bytes)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("writing upload: {e}")))?;

    let size = upload.bytes.len();
    tracing::info!(user_id = %user.user_id, path = %path, size, "image uploaded");

    Ok(ApiResponse::success(
        "Uploaded",
        UploadedImage {
            url: format!("{}/{}", state.config.public_upload_url, path),
            path,
            size,
            content_type,
        },
        Some(Meta::empty()),
    ))
}
