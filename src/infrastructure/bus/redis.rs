use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tracing::debug;

use crate::entities::event::NotificationEvent;
use crate::errors::AppError;
use crate::repositories::events::EventPublisher;

/// Publishes notification events on a Redis pub/sub channel. Subscribers
/// that are offline miss the message; the channel carries no durability.
#[derive(Clone)]
pub struct RedisEventBus {
    client: Client,
    channel: String,
}

impl RedisEventBus {
    pub fn new(client: Client, channel: impl Into<String>) -> Self {
        RedisEventBus {
            client,
            channel: channel.into(),
        }
    }
}

#[async_trait]
impl EventPublisher for RedisEventBus {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), AppError> {
        let payload = serde_json::to_vec(event)?;

        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let receivers: i64 = conn.publish(&self.channel, payload).await?;

        debug!(
            channel = %self.channel,
            recipient = %event.recipient,
            receivers,
            "published notification event"
        );
        Ok(())
    }
}
