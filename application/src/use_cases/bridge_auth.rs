//! [`AuthGateway`] over the request bridge.

use crate::ports::auth_gateway::AuthGateway;
use crate::use_cases::request_bridge::{BridgeError, RequestBridge};
use async_trait::async_trait;
use inbox_domain::{AuthToken, AuthUser, GetCurrentUser, LoginPayload, SignupPayload};
use std::sync::Arc;

/// Production auth gateway: `login`, `signup` and `getCurrentUser` commands
/// answered on `authError` when rejected.
pub struct BridgeAuthGateway {
    bridge: Arc<RequestBridge>,
}

impl BridgeAuthGateway {
    pub fn new(bridge: Arc<RequestBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl AuthGateway for BridgeAuthGateway {
    async fn login(&self, payload: &LoginPayload) -> Result<AuthToken, BridgeError> {
        self.bridge.call(payload).await
    }

    async fn signup(&self, payload: &SignupPayload) -> Result<AuthToken, BridgeError> {
        self.bridge.call(payload).await
    }

    async fn current_user(&self, token: &str) -> Result<AuthUser, BridgeError> {
        self.bridge
            .call(&GetCurrentUser {
                token: token.to_string(),
            })
            .await
    }
}
