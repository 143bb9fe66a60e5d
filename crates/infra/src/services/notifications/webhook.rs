use super::{IChannelSender, NotificationError};
use chime_domain::{Channel, Metadata};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{collections::HashMap, time::Duration};
use tracing::warn;

pub const WEBHOOK_EVENT: &str = "reminder.triggered";
pub const WEBHOOK_SECRET_HEADER: &str = "X-Webhook-Secret";

#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    /// Sent in the `X-Webhook-Secret` header when set
    pub secret: Option<String>,
    pub timeout: Duration,
    pub headers: HashMap<String, String>,
}

impl WebhookConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            secret: None,
            timeout: Duration::from_secs(10),
            headers: HashMap::new(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub event: &'static str,
    pub user_id: i64,
    pub message: &'a str,
    pub timestamp: DateTime<Utc>,
    pub metadata: &'a Metadata,
}

pub struct WebhookSender {
    config: WebhookConfig,
    client: reqwest::Client,
}

impl WebhookSender {
    pub fn new(config: WebhookConfig) -> Result<Self, NotificationError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }
}

#[async_trait::async_trait]
impl IChannelSender for WebhookSender {
    fn name(&self) -> Channel {
        Channel::webhook()
    }

    async fn send(&self, user_id: i64, message: &str, metadata: &Metadata) -> Result<(), NotificationError> {
        let payload = WebhookPayload {
            event: WEBHOOK_EVENT,
            user_id,
            message,
            timestamp: Utc::now(),
            metadata,
        };

        let mut req = self.client.post(&self.config.url).json(&payload);
        if let Some(secret) = &self.config.secret {
            req = req.header(WEBHOOK_SECRET_HEADER, secret.as_str());
        }
        for (key, value) in &self.config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        let resp = req.send().await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            let status = resp.status();
            warn!(url = %self.config.url, status = %status, "Webhook rejected reminder");
            Err(NotificationError::WebhookStatus(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn posts_the_reminder_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/hooks/reminders"))
            .and(header(WEBHOOK_SECRET_HEADER, "s3cret"))
            .and(header("x-team", "core"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = WebhookConfig::new(format!("{}/hooks/reminders", server.uri()));
        config.secret = Some("s3cret".into());
        config.headers.insert("x-team".into(), "core".into());
        let sender = WebhookSender::new(config).unwrap();

        let mut metadata = Metadata::new();
        metadata.insert("reminder_id".into(), "r-1".into());
        sender.send(42, "Standup in 15 minutes", &metadata).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = requests[0].body_json().unwrap();
        assert_eq!(body["event"], "reminder.triggered");
        assert_eq!(body["user_id"], 42);
        assert_eq!(body["message"], "Standup in 15 minutes");
        assert_eq!(body["metadata"]["reminder_id"], "r-1");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let sender = WebhookSender::new(WebhookConfig::new(server.uri())).unwrap();
        let err = sender.send(1, "x", &Metadata::new()).await.expect_err("500 to fail");
        assert!(matches!(err, NotificationError::WebhookStatus(500)));
    }

    #[tokio::test]
    async fn slow_endpoints_time_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let mut config = WebhookConfig::new(server.uri());
        config.timeout = Duration::from_millis(50);
        let sender = WebhookSender::new(config).unwrap();
        let err = sender.send(1, "x", &Metadata::new()).await.expect_err("Timeout");
        assert!(matches!(err, NotificationError::Http(_)));
    }
}
