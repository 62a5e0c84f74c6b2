use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::{entities::event::NotificationEvent, errors::AppError};

/// Outbound side of the notification channel. Delivery is fire-and-forget;
/// implementations must not block the request path beyond the publish itself.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &NotificationEvent) -> Result<(), AppError>;
}
