use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::uploads::UploadedImage,
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::upload_service::{self, ImageUpload},
    state::AppState,
};

// The size cap is enforced by the request body layer and the service.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(upload_image))
        .layer(DefaultBodyLimit::disable())
}

#[utoipa::path(
    post,
    path = "/api/uploads",
    request_body(
        content_type = "multipart/form-data",
        description = "Fields: folder (products, banners, categories, stores) and file"
    ),
    responses(
        (status = 201, description = "Image stored, public URL returned", body = ApiResponse<UploadedImage>),
        (status = 400, description = "Missing file, unknown folder or not an image"),
        (status = 403, description = "Forbidden"),
        (status = 413, description = "Image larger than the upload limit"),
    ),
    security(("bearer_auth" = [])),
    tag = "Uploads"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<UploadedImage>>)> {
    let mut folder = String::new();
    let mut file: Option<(Option<String>, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "folder" => {
                folder = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
            }
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.body_text()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let Some((file_name, content_type, bytes)) = file else {
        return Err(AppError::BadRequest("No file provided".into()));
    };

    let upload = ImageUpload {
        folder,
        file_name,
        content_type,
        bytes,
    };
    let resp = upload_service::upload_image(&state, &user, upload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
