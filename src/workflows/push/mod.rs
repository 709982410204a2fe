//! Expo push notifications to hostel owners.

pub mod client;
pub mod notifier;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{HostelId, UserId};
use crate::repository::RepositoryError;

pub use client::ExpoPushClient;
pub use notifier::{PushNotifier, PushSummary, MAX_CHUNK};

static EXPO_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Expo(nent)?PushToken\[.+\]$").unwrap());
static UUID_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z\d]{8}-[a-z\d]{4}-[a-z\d]{4}-[a-z\d]{4}-[a-z\d]{12}$").unwrap()
});

/// Whether Expo would accept `token` as a device address.
pub fn is_push_token(token: &str) -> bool {
    EXPO_TOKEN_RE.is_match(token) || UUID_TOKEN_RE.is_match(token)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub title: String,
    pub body: String,
    pub data: Value,
    pub sound: &'static str,
}

impl PushMessage {
    pub fn new(to: impl Into<String>, title: &str, body: &str, data: &Value) -> Self {
        Self {
            to: to.into(),
            title: title.to_string(),
            body: body.to_string(),
            data: data.clone(),
            sound: "default",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PushError {
    #[error("push transport unavailable: {0}")]
    Transport(String),
    #[error("push api rejected batch with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

/// Delivers one batch of messages.
#[async_trait]
pub trait PushGateway: Send + Sync {
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<(), PushError>;
}

/// Owner accounts and their registered device tokens.
#[async_trait]
pub trait DeviceDirectory: Send + Sync {
    async fn owners_of(&self, hostel: HostelId) -> Result<Vec<UserId>, RepositoryError>;

    async fn tokens_for(&self, user: UserId) -> Result<Vec<String>, RepositoryError>;
}
