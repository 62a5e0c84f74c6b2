use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageRecord {
    pub id: Uuid,
    pub name: String,
    pub original_file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub storage_key: String,
    pub upload_date: DateTime<Utc>,
    pub owner_id: Uuid,
}

#[derive(Debug)]
pub struct ImageInsert {
    pub name: String,
    pub original_file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub storage_key: String,
    pub upload_date: DateTime<Utc>,
    pub owner_id: Uuid,
}

/// Image row joined with its owner's email, used by the download path
/// to enforce ownership before any payload is read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ImageWithOwner {
    #[sqlx(flatten)]
    pub image: ImageRecord,
    pub owner_email: String,
}

// ───── API Request Models ────────────────────────────────────────────

#[derive(Debug, MultipartForm)]
pub struct ImageUploadForm {
    #[multipart(rename = "file", limit = "10MB")]
    pub file: TempFile,
}

#[derive(Debug, Deserialize)]
pub struct OwnerEmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequesterQuery {
    pub user_email: String,
}

/// Ingestion input after the multipart layer has been unwrapped.
#[derive(Debug)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub content_type: String,
    pub original_file_name: String,
    pub owner_email: String,
}

// ───── API Response Models ──────────────────────────────────────────

/// The only externally visible image representation. Payload bytes and
/// storage internals have no field here and can never serialize out.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: Uuid,
    pub name: String,
    pub original_file_name: String,
    pub file_size: i64,
    pub content_type: String,
    pub upload_date: DateTime<Utc>,
}

impl From<ImageRecord> for ImageResponse {
    fn from(record: ImageRecord) -> Self {
        ImageResponse {
            id: record.id,
            name: record.name,
            original_file_name: record.original_file_name,
            file_size: record.file_size,
            content_type: record.content_type,
            upload_date: record.upload_date,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ImageUploadedResponse {
    pub id: Uuid,
    pub message: String,
}

/// Payload plus the headers the download response is built from.
#[derive(Debug)]
pub struct ImageDownload {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ImageRecord {
        ImageRecord {
            id: Uuid::new_v4(),
            name: "sunset.png".to_string(),
            original_file_name: "sunset.png".to_string(),
            file_size: 2048,
            content_type: "image/png".to_string(),
            storage_key: Uuid::new_v4().to_string(),
            upload_date: Utc::now(),
            owner_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn response_exposes_exactly_the_public_fields() {
        let response = ImageResponse::from(sample_record());
        let value = serde_json::to_value(&response).unwrap();
        let object = value.as_object().unwrap();

        let mut keys: Vec<&str> = object.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "contentType",
                "fileSize",
                "id",
                "name",
                "originalFileName",
                "uploadDate",
            ]
        );
    }

    #[test]
    fn response_preserves_metadata_values() {
        let record = sample_record();
        let response = ImageResponse::from(record.clone());

        assert_eq!(response.id, record.id);
        assert_eq!(response.file_size, 2048);
        assert_eq!(response.content_type, "image/png");
        assert_eq!(response.original_file_name, "sunset.png");
    }
}
