use crate::config::SmtpConfig;
use crate::domain::notifications::{NotificationDispatcher, OutboundEmail};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// Delivers messages through an authenticated STARTTLS relay.
pub struct SmtpDispatcher {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpDispatcher {
    pub fn new(config: &SmtpConfig, sender_name: &str) -> Result<Self, anyhow::Error> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = Mailbox::new(Some(sender_name.to_string()), config.from.parse()?);
        Ok(Self { transport, from })
    }
}

/// Builds the MIME message: an HTML body plus any attachments.
pub fn build_message(from: &Mailbox, email: &OutboundEmail) -> Result<Message, anyhow::Error> {
    let builder = Message::builder()
        .from(from.clone())
        .to(email.to.parse()?)
        .subject(email.subject.clone());

    if email.attachments.is_empty() {
        return Ok(builder.header(ContentType::TEXT_HTML).body(email.html_body.clone())?);
    }

    let mut parts = MultiPart::mixed().singlepart(SinglePart::html(email.html_body.clone()));
    for attachment in &email.attachments {
        parts = parts.singlepart(
            Attachment::new(attachment.filename.clone())
                .body(attachment.bytes.clone(), ContentType::parse(&attachment.content_type)?),
        );
    }
    Ok(builder.multipart(parts)?)
}

#[async_trait]
impl NotificationDispatcher for SmtpDispatcher {
    async fn dispatch(&self, email: OutboundEmail) -> Result<(), anyhow::Error> {
        let message = build_message(&self.from, &email)?;
        self.transport.send(message).await?;
        tracing::debug!(to = %email.to, subject = %email.subject, "e-mail sent");
        Ok(())
    }
}

/// Used when no SMTP relay is configured: every delivery fails and is counted as such.
pub struct DisabledDispatcher;

#[async_trait]
impl NotificationDispatcher for DisabledDispatcher {
    async fn dispatch(&self, email: OutboundEmail) -> Result<(), anyhow::Error> {
        tracing::warn!(to = %email.to, "e-mail delivery is not configured");
        anyhow::bail!("e-mail delivery is not configured")
    }
}
