use crate::domains::notification::repository::NotificationRepository;
use crate::domains::notification::types::NewNotification;
use crate::errors::DomainResult;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Destination for platform-generated notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, account_id: Uuid, message: String) -> DomainResult<()>;
}

/// Stores notifications in the account's inbox.
pub struct InboxNotificationSink {
    repo: Arc<dyn NotificationRepository>,
}

impl InboxNotificationSink {
    pub fn new(repo: Arc<dyn NotificationRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl NotificationSink for InboxNotificationSink {
    async fn notify(&self, account_id: Uuid, message: String) -> DomainResult<()> {
        self.repo
            .create(&NewNotification { user_id: account_id, message })
            .await
            .map(|_| ())
    }
}

/// Best-effort delivery, called once the primary write has committed.
///
/// A failed notification is logged and dropped; it never turns a successful
/// operation into an error.
#[derive(Clone)]
pub struct NotificationDispatcher {
    sink: Arc<dyn NotificationSink>,
}

impl NotificationDispatcher {
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        Self { sink }
    }

    pub async fn dispatch(&self, account_id: Uuid, message: impl Into<String>) {
        let message = message.into();
        if let Err(e) = self.sink.notify(account_id, message).await {
            log::warn!("Dropping notification for account {}: {}", account_id, e);
        }
    }
}
