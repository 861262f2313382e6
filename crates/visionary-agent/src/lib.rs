//! `visionary-agent`: outbound capability clients.
//!
//! The server only talks to the outside world through two small traits, so
//! vendors can be swapped without touching extraction or persistence:
//!
//! ```text
//! TextGenerator::generate_text(prompt) -> text      ← GeminiClient
//! Mailer::send_email(to, subject, body) -> receipt  ← MailClient
//! ```
//!
//! Both HTTP clients return [`AgentError`] on transport failure, non-2xx
//! status, or an unreadable body. Retry policy is left to the caller.

pub mod error;
pub mod gemini;
pub mod mail;
pub mod traits;

pub use error::AgentError;
pub use gemini::GeminiClient;
pub use mail::MailClient;
pub use traits::{MailReceipt, Mailer, TextGenerator};

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, AgentError>;
