//! Route paths.

pub const POST_API_CHAT: &str = "/api/chat";
/// Path used by the multipart front-end.
pub const POST_CHAT: &str = "/chat";
pub const GET_API_HEALTH: &str = "/api/health";
