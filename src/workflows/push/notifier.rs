use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use super::{is_push_token, DeviceDirectory, PushGateway, PushMessage};
use crate::domain::HostelId;
use crate::repository::RepositoryError;

/// Largest batch the Expo API accepts.
pub const MAX_CHUNK: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PushSummary {
    pub sent: usize,
    pub invalid_tokens: usize,
    pub failed: usize,
}

pub struct PushNotifier {
    directory: Arc<dyn DeviceDirectory>,
    gateway: Arc<dyn PushGateway>,
}

impl PushNotifier {
    pub fn new(directory: Arc<dyn DeviceDirectory>, gateway: Arc<dyn PushGateway>) -> Self {
        Self { directory, gateway }
    }

    /// Push one message to every device of every owner of `hostel`.
    ///
    /// Only the owner lookup can fail; token lookups and batches that fail are logged
    /// and counted.
    pub async fn notify_hostel_owners(
        &self,
        hostel: HostelId,
        title: &str,
        body: &str,
        data: Value,
    ) -> Result<PushSummary, RepositoryError> {
        let owners = self.directory.owners_of(hostel).await?;
        let mut summary = PushSummary::default();
        let mut messages = Vec::new();

        for owner in owners {
            let tokens = match self.directory.tokens_for(owner).await {
                Ok(tokens) => tokens,
                Err(err) => {
                    error!(%hostel, user_id = owner.0, error = %err, "device lookup failed");
                    continue;
                }
            };

            for token in tokens {
                if !is_push_token(&token) {
                    warn!(user_id = owner.0, token = %token, "dropping invalid push token");
                    summary.invalid_tokens += 1;
                    continue;
                }
                messages.push(PushMessage::new(token, title, body, &data));
            }
        }

        if messages.is_empty() {
            info!(%hostel, "no owner devices to notify");
            return Ok(summary);
        }

        for chunk in messages.chunks(MAX_CHUNK) {
            match self.gateway.send_batch(chunk).await {
                Ok(()) => {
                    summary.sent += chunk.len();
                    metrics::counter!("push_notifications_sent_total").increment(chunk.len() as u64);
                }
                Err(err) => {
                    summary.failed += chunk.len();
                    error!(%hostel, size = chunk.len(), error = %err, "push batch failed");
                }
            }
        }

        info!(
            %hostel,
            sent = summary.sent,
            failed = summary.failed,
            invalid = summary.invalid_tokens,
            "owner push notification finished"
        );
        Ok(summary)
    }
}
