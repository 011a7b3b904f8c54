//! Webhook notifier
//!
//! POSTs each message as JSON to a configured endpoint, for deployments
//! where an external mailer service performs the actual delivery.

use async_trait::async_trait;

use teamvote_application::ports::notifier::{Notifier, NotifierError};

/// Notifier that delivers messages to an HTTP endpoint
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<(), NotifierError> {
        let payload = serde_json::json!({
            "recipient": recipient,
            "subject": subject,
            "body": body,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryFailed {
                recipient: recipient.to_string(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(NotifierError::DeliveryFailed {
                recipient: recipient.to_string(),
                reason: format!("endpoint returned {}", response.status()),
            });
        }

        Ok(())
    }
}
