use std::sync::Arc;

use haven_core::Database;

use crate::ai::AiClient;
use crate::auth::hash_token;
use crate::config::PayuConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub admin_token_hash: Arc<str>,
    pub payu: Arc<PayuConfig>,
    pub ai: Option<Arc<AiClient>>,
}

impl AppState {
    pub fn new(
        db: Database,
        admin_token: &str,
        payu: PayuConfig,
        ai: Option<AiClient>,
    ) -> Self {
        Self {
            db,
            admin_token_hash: Arc::from(hash_token(admin_token)),
            payu: Arc::new(payu),
            ai: ai.map(Arc::new),
        }
    }
}
