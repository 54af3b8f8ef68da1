//! Auth gateway port
//!
//! Defines how the session manager talks to the identity service. The
//! production implementation rides on the request bridge
//! ([`BridgeAuthGateway`](crate::use_cases::bridge_auth::BridgeAuthGateway)).

use crate::use_cases::request_bridge::BridgeError;
use async_trait::async_trait;
use inbox_domain::{AuthToken, AuthUser, LoginPayload, SignupPayload};

/// Identity operations used by the session manager
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Exchange credentials for a token
    async fn login(&self, payload: &LoginPayload) -> Result<AuthToken, BridgeError>;

    /// Register an account and receive its token
    async fn signup(&self, payload: &SignupPayload) -> Result<AuthToken, BridgeError>;

    /// Identity check: resolve the user owning `token`.
    ///
    /// A [`BridgeError::Remote`] means the peer rejected the token.
    async fn current_user(&self, token: &str) -> Result<AuthUser, BridgeError>;
}
