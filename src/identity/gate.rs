//! Request authentication and role gating for route handlers.
//!
//! Every protected handler calls exactly one of [`AuthGate::require_authenticated`]
//! or [`AuthGate::require_role`] before touching protected data and returns the
//! [`Redirect`] unchanged when it gets one.

use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use super::cookie;
use super::principal::{Identity, Role};
use super::token::TokenCodec;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_HOME: &str = "/admin";
pub const CUSTOMER_HOME: &str = "/products";

/// Where a signed-in user of `role` lands by default.
pub fn landing_for(role: Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_HOME,
        Role::Customer => CUSTOMER_HOME,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No valid session; go log in.
    Unauthenticated,
    /// Valid session, wrong role; go home. The session is kept.
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub target: &'static str,
    pub reason: RedirectReason,
}

impl Redirect {
    pub fn to_login() -> Self { Self { target: LOGIN_PATH, reason: RedirectReason::Unauthenticated } }

    pub fn forbidden(actual: Role) -> Self { Self { target: landing_for(actual), reason: RedirectReason::Forbidden } }
}

impl IntoResponse for Redirect {
    fn into_response(self) -> Response {
        axum::response::Redirect::to(self.target).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum AuthOutcome {
    Authenticated(Identity),
    Redirect(Redirect),
}

impl AuthOutcome {
    pub fn into_result(self) -> Result<Identity, Redirect> {
        match self {
            AuthOutcome::Authenticated(identity) => Ok(identity),
            AuthOutcome::Redirect(r) => Err(r),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthOutcome::Authenticated(identity) => Some(identity),
            AuthOutcome::Redirect(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthGate {
    codec: TokenCodec,
}

impl AuthGate {
    pub fn new(codec: TokenCodec) -> Self { Self { codec } }

    pub fn codec(&self) -> &TokenCodec { &self.codec }

    /// Identity carried by the request's session cookie, if it verifies.
    pub fn authenticate(&self, headers: &HeaderMap) -> Option<Identity> {
        let token = cookie::token_from_headers(headers)?;
        self.codec.verify(&token)
    }

    pub fn require_authenticated(&self, headers: &HeaderMap) -> AuthOutcome {
        match self.authenticate(headers) {
            Some(identity) => AuthOutcome::Authenticated(identity),
            None => {
                debug!(target = LOGIN_PATH, "unauthenticated request redirected");
                AuthOutcome::Redirect(Redirect::to_login())
            }
        }
    }

    pub fn require_role(&self, headers: &HeaderMap, role: Role) -> AuthOutcome {
        let identity = match self.require_authenticated(headers) {
            AuthOutcome::Authenticated(identity) => identity,
            redirect => return redirect,
        };
        if identity.role() == role {
            return AuthOutcome::Authenticated(identity);
        }
        let redirect = Redirect::forbidden(identity.role());
        debug!(user_id = identity.user_id, required = ?role, target = redirect.target, "role mismatch redirected");
        AuthOutcome::Redirect(redirect)
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod gate_tests;
