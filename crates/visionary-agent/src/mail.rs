use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::traits::{MailReceipt, Mailer};
use crate::{AgentError, Result};

const SERVICE: &str = "mail";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

#[derive(Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: Option<String>,
}

// ─── MailClient ───────────────────────────────────────────────────────────

/// Client for a bearer-authenticated transactional email API
/// (`POST {base_url}/emails`).
pub struct MailClient {
    http: reqwest::Client,
    api_key: String,
    from: String,
    base_url: String,
}

impl MailClient {
    pub fn new(
        api_key: impl Into<String>,
        from: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            from: from.into(),
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl Mailer for MailClient {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<MailReceipt> {
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));
        let request = SendRequest {
            from: &self.from,
            to: [to],
            subject,
            text: body,
        };

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        // Providers differ on the success body; an unreadable one still means accepted.
        let id = serde_json::from_str::<SendResponse>(&text)
            .ok()
            .and_then(|r| r.id);
        tracing::debug!(to, id = ?id, "email accepted");
        Ok(MailReceipt { id })
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn client(server: &mockito::Server) -> MailClient {
        MailClient::new("mail-key", "Visionary <hello@visionary.test>", server.url()).unwrap()
    }

    #[tokio::test]
    async fn posts_message_with_bearer_auth() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/emails")
            .match_header("authorization", "Bearer mail-key")
            .match_body(Matcher::Json(json!({
                "from": "Visionary <hello@visionary.test>",
                "to": ["ana@example.com"],
                "subject": "Hi",
                "text": "Body"
            })))
            .with_status(200)
            .with_body(r#"{"id":"msg_123"}"#)
            .create_async()
            .await;

        let receipt = client(&server)
            .send_email("ana@example.com", "Hi", "Body")
            .await
            .unwrap();
        assert_eq!(receipt.id.as_deref(), Some("msg_123"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn accepted_without_json_body_has_no_id() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/emails")
            .with_status(202)
            .with_body("queued")
            .create_async()
            .await;

        let receipt = client(&server).send_email("a@b.co", "s", "b").await.unwrap();
        assert_eq!(receipt, MailReceipt::default());
    }

    #[tokio::test]
    async fn rejected_message_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/emails")
            .with_status(422)
            .with_body(r#"{"message":"invalid to"}"#)
            .create_async()
            .await;

        let err = client(&server).send_email("bad", "s", "b").await.unwrap_err();
        assert!(matches!(err, AgentError::Status { status: 422, .. }));
    }
}
