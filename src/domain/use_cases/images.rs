use chrono::Utc;
use tracing::{error, warn};

use crate::access::authorize_download;
use crate::constants::is_allowed_image_type;
use crate::entities::event::NotificationEvent;
use crate::entities::image::{
    ImageDownload, ImageInsert, ImageResponse, ImageUpload, ImageUploadedResponse,
};
use crate::errors::AppError;
use crate::query::{ImageFilter, ImageQuery, QueryScope};
use crate::repositories::account::AccountRepository;
use crate::repositories::events::EventPublisher;
use crate::repositories::image::ImageRepository;
use crate::repositories::payload::PayloadStore;
use crate::utils::valid_uuid::valid_uuid;

pub struct ImageHandler<I, A, S, P>
where
    I: ImageRepository,
    A: AccountRepository,
    S: PayloadStore,
    P: EventPublisher,
{
    pub image_repo: I,
    pub account_repo: A,
    pub payloads: S,
    pub events: P,
}

impl<I, A, S, P> ImageHandler<I, A, S, P>
where
    I: ImageRepository,
    A: AccountRepository,
    S: PayloadStore,
    P: EventPublisher,
{
    pub fn new(image_repo: I, account_repo: A, payloads: S, events: P) -> Self {
        ImageHandler {
            image_repo,
            account_repo,
            payloads,
            events,
        }
    }

    /// Ingests one image: validate, resolve the owner, persist payload then
    /// metadata, notify. Rejections happen before any side effect.
    pub async fn upload(&self, upload: ImageUpload) -> Result<ImageUploadedResponse, AppError> {
        if !is_allowed_image_type(&upload.content_type) {
            return Err(AppError::InvalidInput(format!(
                "Unsupported content type: {}",
                upload.content_type
            )));
        }

        if let Some(kind) = infer::get(&upload.data) {
            if kind.mime_type() != upload.content_type {
                warn!(
                    declared = %upload.content_type,
                    sniffed = %kind.mime_type(),
                    "declared content type does not match payload magic bytes"
                );
            }
        }

        let owner = self
            .account_repo
            .get_account_by_email(&upload.owner_email)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Account {} not found", upload.owner_email))
            })?;

        let storage_key = self.payloads.put(&upload.data).await?;

        let insert = ImageInsert {
            name: upload.original_file_name.clone(),
            original_file_name: upload.original_file_name,
            // Recorded size is what actually arrived, not what the client
            // declared.
            file_size: upload.data.len() as i64,
            content_type: upload.content_type,
            storage_key,
            upload_date: Utc::now(),
            owner_id: owner.id,
        };
        let record = self.image_repo.insert_image(&insert).await?;

        // The stored record stands even when the notification cannot go
        // out; the caller sees the failed side-channel as a 500.
        self.events
            .publish(&NotificationEvent::upload_complete(
                &owner.email,
                record.file_size,
            ))
            .await?;

        Ok(ImageUploadedResponse {
            id: record.id,
            message: "Image uploaded successfully".to_string(),
        })
    }

    /// Owner-scoped listing. Parameters are validated first, so caller
    /// faults surface even for unknown accounts. Without a complete filter
    /// group the answer is the empty set and the image table is not queried.
    pub async fn list_for_owner(
        &self,
        user_email: &str,
        params: &ImageQuery,
    ) -> Result<Vec<ImageResponse>, AppError> {
        let filter = params.filter()?;
        let sort = params.sort()?;

        let owner = self
            .account_repo
            .get_account_by_email(user_email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account {user_email} not found")))?;

        if filter == ImageFilter::Unfiltered {
            return Ok(Vec::new());
        }

        let records = self
            .image_repo
            .find_images(&filter, &QueryScope::Owner(owner.id), &sort)
            .await?;
        Ok(records.into_iter().map(ImageResponse::from).collect())
    }

    /// Moderator listing across all owners; no filter means everything.
    pub async fn list_all(&self, params: &ImageQuery) -> Result<Vec<ImageResponse>, AppError> {
        let filter = params.filter()?;
        let sort = params.sort()?;

        let records = self
            .image_repo
            .find_images(&filter, &QueryScope::Global, &sort)
            .await?;
        Ok(records.into_iter().map(ImageResponse::from).collect())
    }

    /// Returns a stored image to its owner, with the metadata the response
    /// headers are built from.
    pub async fn download(
        &self,
        image_id: &str,
        user_email: &str,
    ) -> Result<ImageDownload, AppError> {
        let id = valid_uuid(image_id)?;

        let image = self
            .image_repo
            .get_image_with_owner(&id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image {id} not found")))?;

        authorize_download(&image, user_email)?;

        let data = match self.payloads.get(&image.image.storage_key).await {
            Ok(data) => data,
            // The row exists, so a missing payload is storage inconsistency,
            // not a caller-visible absence.
            Err(AppError::NotFound(_)) => {
                return Err(AppError::InternalError(format!(
                    "Payload missing for image {id}"
                )));
            }
            Err(e) => return Err(e),
        };

        // Payload is already committed to this response; a dead channel
        // must not turn a served download into an error.
        if let Err(e) = self
            .events
            .publish(&NotificationEvent::download_complete(
                user_email,
                &image.image.original_file_name,
                image.image.file_size,
            ))
            .await
        {
            error!("Download notification failed: {e}");
        }

        Ok(ImageDownload {
            file_name: image.image.original_file_name,
            content_type: image.image.content_type,
            data,
        })
    }
}
