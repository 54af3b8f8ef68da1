//! Session state value object

use crate::auth::entities::AuthUser;

/// Snapshot of the current session (Value Object)
///
/// `is_authenticated` is derived from the presence of a user, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub user: Option<AuthUser>,
    pub token: Option<String>,
    pub is_loading: bool,
}

impl SessionState {
    /// Initial state: nothing known yet, loading until the first check ends
    pub fn loading() -> Self {
        Self {
            user: None,
            token: None,
            is_loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Replace token and user in one step
    pub fn set_identity(&mut self, token: String, user: AuthUser) {
        self.token = Some(token);
        self.user = Some(user);
    }

    /// Drop token and user in one step
    pub fn clear_identity(&mut self) {
        self.token = None;
        self.user = None;
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::loading()
    }
}
