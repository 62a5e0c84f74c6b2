use redis::Client as RedisClient;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;

pub use domain::{access, entities, query, use_cases};
pub use interfaces::{handlers, repositories, routes};
pub use infrastructure::{auth, bus, db, storage, utils};

use bus::redis::RedisEventBus;
use errors::AppError;
use repositories::sqlx_repo::{SqlxAccountRepo, SqlxImageRepo};
use storage::fs::FsPayloadStore;
use use_cases::accounts::AccountHandler;
use use_cases::images::ImageHandler;

pub struct AppState {
    pub images: AppImageHandler,
    pub accounts: AppAccountHandler,
    pub redis_client: RedisClient,
}

pub type AppImageHandler =
    ImageHandler<SqlxImageRepo, SqlxAccountRepo, FsPayloadStore, RedisEventBus>;
pub type AppAccountHandler = AccountHandler<SqlxAccountRepo, RedisEventBus>;

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Result<Self, AppError> {
        let redis_client = RedisClient::open(config.redis_url.as_str())?;
        let events = RedisEventBus::new(redis_client.clone(), config.mail_channel.as_str());

        let images = ImageHandler::new(
            SqlxImageRepo::new(pool.clone()),
            SqlxAccountRepo::new(pool.clone()),
            FsPayloadStore::new(config.upload_dir.as_str()),
            events.clone(),
        );
        let accounts = AccountHandler::new(SqlxAccountRepo::new(pool), events);

        Ok(AppState {
            images,
            accounts,
            redis_client,
        })
    }
}
