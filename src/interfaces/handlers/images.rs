use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{
    entities::image::{ImageUpload, ImageUploadForm, OwnerEmailQuery, RequesterQuery},
    errors::AppError,
    query::ImageQuery,
    AppState,
};

#[instrument(skip(state, form, query))]
pub async fn upload_image(
    state: web::Data<AppState>,
    form: MultipartForm<ImageUploadForm>,
    query: web::Query<OwnerEmailQuery>,
) -> Result<impl Responder, AppError> {
    let image_handler = &state.images;

    let upload = read_upload(form.into_inner().file, query.into_inner().email).await?;
    let response = image_handler.upload(upload).await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(state, query))]
pub async fn list_images(
    state: web::Data<AppState>,
    query: web::Query<ImageQuery>,
) -> Result<impl Responder, AppError> {
    let image_handler = &state.images;
    let params = query.into_inner();

    let user_email = params
        .user_email
        .clone()
        .ok_or_else(|| AppError::InvalidInput("userEmail is required".to_string()))?;

    let images = image_handler.list_for_owner(&user_email, &params).await?;

    Ok(HttpResponse::Ok().json(images))
}

#[instrument(skip(image_id, state, query))]
pub async fn download_image(
    image_id: web::Path<String>,
    state: web::Data<AppState>,
    query: web::Query<RequesterQuery>,
) -> Result<impl Responder, AppError> {
    let image_handler = &state.images;

    let download = image_handler.download(&image_id, &query.user_email).await?;

    Ok(HttpResponse::Ok()
        .content_type(download.content_type)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(download.file_name)],
        })
        .body(download.data))
}

/// Unwraps the multipart part into the ingestion input, reading the spooled
/// temp file back into memory. The part must carry a content type and a
/// file name.
async fn read_upload(file: TempFile, owner_email: String) -> Result<ImageUpload, AppError> {
    let content_type = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string())
        .ok_or_else(|| AppError::InvalidInput("File part is missing a content type".to_string()))?;

    let original_file_name = file
        .file_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| AppError::InvalidInput("File part is missing a file name".to_string()))?;

    let data = tokio::fs::read(file.file.path()).await?;

    Ok(ImageUpload {
        data,
        content_type,
        original_file_name,
        owner_email,
    })
}
