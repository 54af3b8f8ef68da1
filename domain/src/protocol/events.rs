//! Event names.
//!
//! Commands flow client → peer, responses and push events flow peer → client.
//! Reserved names are raised locally by the transport and are never sent.

/// Default error channel shared by every request that does not name its own.
pub const ERROR: &str = "error";

// ==================== Commands ====================

pub const GET_CONVERSATIONS: &str = "getConversations";
pub const GET_MESSAGES: &str = "getMessages";
pub const SEND_REPLY: &str = "sendReply";
pub const LOGIN: &str = "login";
pub const SIGNUP: &str = "signup";
pub const GET_CURRENT_USER: &str = "getCurrentUser";

// ==================== Correlated responses ====================

pub const CONVERSATIONS: &str = "conversations";
pub const MESSAGES: &str = "messages";
pub const REPLY_SENT: &str = "replySent";
pub const LOGIN_SUCCESS: &str = "loginSuccess";
pub const SIGNUP_SUCCESS: &str = "signupSuccess";
pub const CURRENT_USER: &str = "currentUser";
pub const AUTH_ERROR: &str = "authError";

// ==================== Push events ====================

pub const NEW_MESSAGE: &str = "newMessage";
pub const NEW_CONVERSATION: &str = "newConversation";

// ==================== Reserved (local) ====================

pub const CONNECT: &str = "connect";
pub const DISCONNECT: &str = "disconnect";
pub const CONNECT_ERROR: &str = "connect_error";

const RESERVED: &[&str] = &[
    CONNECT,
    DISCONNECT,
    CONNECT_ERROR,
    "disconnecting",
    "newListener",
    "removeListener",
];

/// Whether `name` is raised by the transport itself and must not be emitted.
pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(&name)
}
