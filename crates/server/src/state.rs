//! Shared application state.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::token::TokenService;
use crate::store::Store;

/// Cheaply cloneable handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Store,
    tokens: TokenService,
}

impl AppState {
    #[must_use]
    pub fn new(config: &ServerConfig, store: Store) -> Self {
        let tokens = TokenService::new(&config.jwt_secret);
        Self {
            inner: Arc::new(AppStateInner { store, tokens }),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }
}
