use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::image::{ImageInsert, ImageRecord, ImageWithOwner},
    errors::AppError,
    query::{ImageFilter, ImageSort, QueryScope},
    repositories::sqlx_repo::SqlxImageRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn insert_image(&self, image: &ImageInsert) -> Result<ImageRecord, AppError>;
    async fn get_image_with_owner(&self, id: &Uuid) -> Result<Option<ImageWithOwner>, AppError>;
    /// Runs the resolved filter inside the given scope, sorted as requested.
    /// Everything executes in SQL through bound parameters.
    async fn find_images(
        &self,
        filter: &ImageFilter,
        scope: &QueryScope,
        sort: &ImageSort,
    ) -> Result<Vec<ImageRecord>, AppError>;
    /// Every storage key currently referenced by a metadata row. Used by the
    /// orphan sweep.
    async fn list_storage_keys(&self) -> Result<Vec<String>, AppError>;
}

impl SqlxImageRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxImageRepo { pool }
    }
}

#[async_trait]
impl ImageRepository for SqlxImageRepo {
    async fn insert_image(&self, image: &ImageInsert) -> Result<ImageRecord, AppError> {
        let record = sqlx::query_as::<_, ImageRecord>(
            r#"
            INSERT INTO images
                (name, original_file_name, file_size, content_type, storage_key, upload_date, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&image.name)
        .bind(&image.original_file_name)
        .bind(image.file_size)
        .bind(&image.content_type)
        .bind(&image.storage_key)
        .bind(image.upload_date)
        .bind(image.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(record)
    }

    async fn get_image_with_owner(&self, id: &Uuid) -> Result<Option<ImageWithOwner>, AppError> {
        let image = sqlx::query_as::<_, ImageWithOwner>(
            r#"
            SELECT i.*, u.email AS owner_email
            FROM images i
            JOIN users u ON u.id = i.owner_id
            WHERE i.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    async fn find_images(
        &self,
        filter: &ImageFilter,
        scope: &QueryScope,
        sort: &ImageSort,
    ) -> Result<Vec<ImageRecord>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM images WHERE TRUE");

        match filter {
            ImageFilter::Ids(ids) => {
                builder.push(" AND id = ANY(").push_bind(ids.clone()).push(")");
            }
            ImageFilter::SizeBetween { min, max } => {
                builder.push(" AND file_size BETWEEN ").push_bind(*min);
                builder.push(" AND ").push_bind(*max);
            }
            ImageFilter::UploadedBetween { start, end } => {
                builder.push(" AND upload_date >= ").push_bind(*start);
                builder.push(" AND upload_date < ").push_bind(*end);
            }
            ImageFilter::Unfiltered => {}
        }

        if let QueryScope::Owner(owner_id) = scope {
            builder.push(" AND owner_id = ").push_bind(*owner_id);
        }

        // Sort identifiers come from a closed enum, never from the caller.
        builder.push(" ORDER BY ");
        builder.push(sort.field.column());
        builder.push(sort.order.sql());

        let query = builder.build_query_as::<ImageRecord>();
        let records: Vec<ImageRecord> = query.fetch_all(&self.pool).await?;

        Ok(records)
    }

    async fn list_storage_keys(&self) -> Result<Vec<String>, AppError> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT storage_key FROM images")
            .fetch_all(&self.pool)
            .await?;

        Ok(keys)
    }
}
