//! Session signals read from request cookies.
//!
//! # Data Flow
//! ```text
//! Cookie header(s)
//!     → cookies.rs (parse into CookieJar)
//!     → SessionState (token presence + role)
//!     → routing policy
//! ```
//!
//! # Design Decisions
//! - Tokens are never decoded; presence is the only signal
//! - An unreadable role is the same as no role
//! - Lookups return Option; callers handle the unset case explicitly

pub mod cookies;
pub mod role;

pub use cookies::CookieJar;
pub use role::Role;

use crate::config::CookieConfig;

/// Authentication state derived from the cookie jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    /// An access or refresh token cookie is present.
    pub authenticated: bool,
    /// Role from the role cookie, `None` when absent or unrecognised.
    pub role: Option<Role>,
}

impl SessionState {
    /// Read the session signals using the configured cookie names.
    pub fn from_cookies(jar: &CookieJar, names: &CookieConfig) -> Self {
        let authenticated = jar.non_empty(&names.access_token).is_some()
            || jar.non_empty(&names.refresh_token).is_some();
        let role = jar.get(&names.role).and_then(Role::parse);
        Self { authenticated, role }
    }
}
