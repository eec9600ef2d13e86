//! Authentication and session core: password hashing, signed session tokens,
//! the session cookie and the role gate that route handlers call.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod password;
mod token;
pub mod cookie;
mod gate;

pub use principal::{Identity, Role};
pub use password::{hash_password, verify_password, verify_placeholder, HashError};
pub use token::{SessionSecret, TokenCodec, TokenError, TOKEN_TTL_SECS};
pub use gate::{
    landing_for, AuthGate, AuthOutcome, Redirect, RedirectReason, ADMIN_HOME, CUSTOMER_HOME, LOGIN_PATH,
};
