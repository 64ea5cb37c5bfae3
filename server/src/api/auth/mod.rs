//! Admin authentication module

mod context;
pub mod jwt;
mod manager;
pub mod middleware;

pub use context::AdminSession;
pub use jwt::SessionClaims;
pub use manager::{AuthManager, ExchangeError, IssuedSession};
pub use middleware::{AuthError, bearer_token, require_auth};
