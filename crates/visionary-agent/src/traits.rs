use async_trait::async_trait;

use crate::Result;

/// Anything that turns a prompt into free-form text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_text(&self, prompt: &str) -> Result<String>;
}

/// Provider acknowledgement for an accepted email.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailReceipt {
    /// Provider message id, when the provider returns one.
    pub id: Option<String>,
}

/// Anything that can deliver a plain-text email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, to: &str, subject: &str, body: &str) -> Result<MailReceipt>;
}
