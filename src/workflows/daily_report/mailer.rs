use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;

use crate::config::MailConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content: Vec<u8>,
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport is not configured (set MAIL_API_URL)")]
    NotConfigured,
    #[error("mail transport unavailable: {0}")]
    Transport(String),
    #[error("mail api rejected message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Outbound e-mail hook. Delivery guarantees belong to the implementation.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError>;
}

/// Client for a JSON transactional mail API (`POST {from, to, subject, html, attachments}`).
#[derive(Debug, Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: Option<String>,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: Option<String>, api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
        }
    }

    pub fn from_config(config: &MailConfig) -> Self {
        Self::new(
            config.api_url.clone(),
            config.api_key.clone(),
            config.from.clone(),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    attachments: Vec<AttachmentPayload<'a>>,
}

#[derive(Serialize)]
struct AttachmentPayload<'a> {
    filename: &'a str,
    content: String,
    content_type: &'a str,
}

impl<'a> MailPayload<'a> {
    fn new(from: &'a str, email: &'a OutboundEmail) -> Self {
        Self {
            from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            attachments: email
                .attachments
                .iter()
                .map(|attachment| AttachmentPayload {
                    filename: &attachment.filename,
                    content: STANDARD.encode(&attachment.content),
                    content_type: &attachment.content_type,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), MailError> {
        let endpoint = self.endpoint.as_deref().ok_or(MailError::NotConfigured)?;
        let payload = MailPayload::new(&self.from, email);

        let mut request = self.client.post(endpoint).json(&payload);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|err| MailError::Transport(err.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(MailError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
