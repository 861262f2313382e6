use std::sync::Arc;

use visionary_agent::{GeminiClient, MailClient, Mailer, TextGenerator};
use visionary_core::config::Config;
use visionary_core::seal::NoteCipher;
use visionary_core::store::CapsuleDb;

/// Shared application state passed to all route handlers and the unseal
/// scheduler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<CapsuleDb>,
    pub cipher: Arc<NoteCipher>,
    pub generator: Arc<dyn TextGenerator>,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Assemble state from already-built collaborators.
    pub fn new(
        config: Config,
        store: CapsuleDb,
        generator: Arc<dyn TextGenerator>,
        mailer: Arc<dyn Mailer>,
    ) -> visionary_core::Result<Self> {
        let cipher = NoteCipher::new(&config.secret_key)?;
        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            cipher: Arc::new(cipher),
            generator,
            mailer,
        })
    }

    /// Open the capsule store and build the HTTP clients named by `config`.
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = CapsuleDb::open(&config.db_path)?;
        let generator = GeminiClient::new(
            config.gemini.api_key.clone(),
            config.gemini.model.clone(),
            config.gemini.base_url.clone(),
        )?;
        let mailer = MailClient::new(
            config.mail.api_key.clone(),
            config.mail.from.clone(),
            config.mail.base_url.clone(),
        )?;
        Ok(Self::new(config, store, Arc::new(generator), Arc::new(mailer))?)
    }
}
