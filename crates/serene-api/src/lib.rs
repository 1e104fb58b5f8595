pub mod auth;
pub mod chat;
pub mod error;
pub mod middleware;
pub mod moods;
pub mod password;
pub mod responder;
pub mod router;
pub mod session;

pub use auth::{AppState, AppStateInner};
pub use router::build_router;
