use crate::entities::image::ImageWithOwner;
use crate::errors::AppError;

/// Download gate: only the owning account may fetch the payload. The
/// requester email must match the stored owner email exactly.
pub fn authorize_download(image: &ImageWithOwner, requester_email: &str) -> Result<(), AppError> {
    if image.owner_email == requester_email {
        Ok(())
    } else {
        Err(AppError::ForbiddenAccess)
    }
}
