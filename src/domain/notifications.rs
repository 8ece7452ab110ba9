use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<EmailAttachment>,
}

/// Delivery of composed messages. Failures are reported, never retried here.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, email: OutboundEmail) -> Result<(), anyhow::Error>;
}
