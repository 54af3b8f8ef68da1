//! Session manager: who is logged in, and with which token.
//!
//! State is published through a [`tokio::sync::watch`] channel so any number
//! of observers can follow it. Token and user always change together in one
//! publication.

use crate::ports::auth_gateway::AuthGateway;
use crate::ports::token_store::{TokenStore, TokenStoreError};
use crate::use_cases::request_bridge::BridgeError;
use inbox_domain::{AuthUser, LoginPayload, OAuthProvider, SessionState, SignupPayload};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{OnceCell, watch};
use tracing::{debug, info, warn};

/// Errors returned by session operations
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Authentication rejected: {0}")]
    Rejected(#[source] BridgeError),

    #[error("Authentication request failed: {0}")]
    Request(#[source] BridgeError),

    #[error(transparent)]
    TokenStore(#[from] TokenStoreError),
}

impl From<BridgeError> for SessionError {
    fn from(error: BridgeError) -> Self {
        if error.is_remote() {
            SessionError::Rejected(error)
        } else {
            SessionError::Request(error)
        }
    }
}

/// Owns the session state and the operations that change it.
pub struct SessionManager {
    auth: Arc<dyn AuthGateway>,
    tokens: Arc<dyn TokenStore>,
    state: watch::Sender<SessionState>,
    initialized: OnceCell<()>,
    auth_base_url: String,
}

impl SessionManager {
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        tokens: Arc<dyn TokenStore>,
        auth_base_url: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::loading());
        Self {
            auth,
            tokens,
            state,
            initialized: OnceCell::new(),
            auth_base_url: auth_base_url.into(),
        }
    }

    /// Current snapshot
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Follow every state change
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Restore the stored session, once per manager.
    ///
    /// Concurrent callers share the first run. Never fails: a rejected token
    /// is forgotten and the session stays anonymous.
    pub async fn initialize(&self) {
        self.initialized.get_or_init(|| self.restore()).await;
    }

    async fn restore(&self) {
        let stored = self.tokens.load().unwrap_or_else(|e| {
            warn!("Could not read stored token: {}", e);
            None
        });

        let Some(token) = stored else {
            debug!("Session: no stored token");
            self.state.send_modify(|s| s.is_loading = false);
            return;
        };

        self.state.send_modify(|s| s.token = Some(token.clone()));
        match self.auth.current_user(&token).await {
            Ok(user) => {
                info!("Session restored for {}", user.display_name());
                self.state.send_modify(|s| {
                    s.set_identity(token, user);
                    s.is_loading = false;
                });
            }
            Err(e) => {
                if e.is_remote() {
                    info!("Stored token rejected: {}", e);
                    self.forget_stored_token();
                } else {
                    warn!("Could not verify stored token: {}", e);
                }
                self.state.send_modify(|s| {
                    s.clear_identity();
                    s.is_loading = false;
                });
            }
        }
    }

    /// Log in with credentials; returns the now-current user.
    pub async fn login(&self, payload: &LoginPayload) -> Result<AuthUser, SessionError> {
        let token = self.auth.login(payload).await?;
        self.establish(token.token).await
    }

    /// Register a new account and log into it.
    pub async fn signup(&self, payload: &SignupPayload) -> Result<AuthUser, SessionError> {
        let token = self.auth.signup(payload).await?;
        self.establish(token.token).await
    }

    async fn establish(&self, token: String) -> Result<AuthUser, SessionError> {
        self.tokens.save(&token)?;
        match self.auth.current_user(&token).await {
            Ok(user) => {
                info!("Logged in as {}", user.display_name());
                self.state.send_modify(|s| {
                    s.set_identity(token, user.clone());
                    s.is_loading = false;
                });
                Ok(user)
            }
            Err(e) => {
                self.forget_stored_token();
                self.state.send_modify(|s| s.clear_identity());
                Err(e.into())
            }
        }
    }

    /// Forget the session locally. No round-trip to the peer.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.state.send_modify(|s| {
            s.clear_identity();
            s.is_loading = false;
        });
        self.tokens.clear()?;
        debug!("Session cleared");
        Ok(())
    }

    /// Re-run the identity check with the stored token.
    ///
    /// Returns `Ok(None)` when no token is stored. A rejected token is
    /// cleared along with the user.
    pub async fn refresh_user(&self) -> Result<Option<AuthUser>, SessionError> {
        let Some(token) = self.tokens.load()? else {
            return Ok(None);
        };

        match self.auth.current_user(&token).await {
            Ok(user) => {
                self.state.send_modify(|s| {
                    s.set_identity(token, user.clone());
                    s.is_loading = false;
                });
                Ok(Some(user))
            }
            Err(e) if e.is_remote() => {
                self.forget_stored_token();
                self.state.send_modify(|s| s.clear_identity());
                Err(SessionError::Rejected(e))
            }
            Err(e) => Err(SessionError::Request(e)),
        }
    }

    /// Browser entry point of a third-party login flow.
    pub fn oauth_start_url(&self, provider: OAuthProvider) -> String {
        format!(
            "{}/auth/{}",
            self.auth_base_url.trim_end_matches('/'),
            provider.as_str()
        )
    }

    fn forget_stored_token(&self) {
        if let Err(e) = self.tokens.clear() {
            warn!("Could not clear stored token: {}", e);
        }
    }
}
