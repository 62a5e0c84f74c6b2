use std::collections::HashSet;

use tokio::time::{interval, Duration};

use crate::errors::AppError;
use crate::repositories::image::ImageRepository;
use crate::repositories::sqlx_repo::SqlxImageRepo;
use crate::storage::fs::FsPayloadStore;

/// Payload files younger than this are presumed to belong to an upload
/// whose metadata row has not committed yet.
const ORPHAN_MIN_AGE: Duration = Duration::from_secs(60 * 60);

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub async fn start_orphan_sweep(repo: SqlxImageRepo, store: FsPayloadStore) {
    let mut interval = interval(SWEEP_INTERVAL);

    loop {
        interval.tick().await;

        match sweep_orphans(&repo, &store, ORPHAN_MIN_AGE).await {
            Ok(0) => {}
            Ok(count) => tracing::info!("Swept {} orphaned payload files", count),
            Err(e) => tracing::error!("Orphan sweep failed: {}", e),
        }
    }
}

/// Deletes payload files old enough to be settled that no metadata row
/// references. A failed upload leaves such a file behind when the payload
/// write lands but the insert does not.
pub async fn sweep_orphans<I: ImageRepository>(
    repo: &I,
    store: &FsPayloadStore,
    min_age: Duration,
) -> Result<u64, AppError> {
    let referenced: HashSet<String> = repo.list_storage_keys().await?.into_iter().collect();

    let mut swept = 0;
    for locator in store.stale_locators(min_age).await? {
        if referenced.contains(&locator) {
            continue;
        }
        store.remove(&locator).await?;
        swept += 1;
    }

    Ok(swept)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::*;
    use crate::repositories::image::MockImageRepository;
    use crate::repositories::payload::PayloadStore;

    fn scratch_store() -> (FsPayloadStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("sweep-test-{}", Uuid::new_v4()));
        (FsPayloadStore::new(&dir), dir)
    }

    #[tokio::test]
    async fn removes_only_unreferenced_payloads() {
        let (store, dir) = scratch_store();

        let referenced = store.put(b"kept").await.unwrap();
        let orphaned = store.put(b"left behind").await.unwrap();

        let mut repo = MockImageRepository::new();
        let keys = vec![referenced.clone()];
        repo.expect_list_storage_keys()
            .returning(move || Ok(keys.clone()));

        let swept = sweep_orphans(&repo, &store, Duration::ZERO).await.unwrap();

        assert_eq!(swept, 1);
        assert!(store.get(&referenced).await.is_ok());
        assert!(matches!(
            store.get(&orphaned).await.unwrap_err(),
            AppError::NotFound(_)
        ));
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn young_payloads_survive_the_sweep() {
        let (store, dir) = scratch_store();

        // Freshly written, so it stays under any non-zero age gate.
        let in_flight = store.put(b"upload in progress").await.unwrap();

        let mut repo = MockImageRepository::new();
        repo.expect_list_storage_keys().returning(|| Ok(Vec::new()));

        let swept = sweep_orphans(&repo, &store, Duration::from_secs(3600))
            .await
            .unwrap();

        assert_eq!(swept, 0);
        assert!(store.get(&in_flight).await.is_ok());
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn sweeping_an_empty_store_is_a_no_op() {
        let (store, dir) = scratch_store();

        let mut repo = MockImageRepository::new();
        repo.expect_list_storage_keys().returning(|| Ok(Vec::new()));

        let swept = sweep_orphans(&repo, &store, Duration::ZERO).await.unwrap();

        assert_eq!(swept, 0);
        std::fs::remove_dir_all(dir).ok();
    }
}
