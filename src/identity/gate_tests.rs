use axum::http::{header, HeaderValue, StatusCode};

use super::*;
use crate::identity::SessionSecret;

fn gate() -> AuthGate { AuthGate::new(TokenCodec::new(SessionSecret::new("gate-test-secret"))) }

fn headers_for(gate: &AuthGate, identity: &Identity) -> HeaderMap {
    let token = gate.codec().issue(identity).unwrap();
    let mut h = HeaderMap::new();
    h.insert(header::COOKIE, HeaderValue::from_str(&format!("lang=en; auth_token={token}")).unwrap());
    h
}

#[test]
fn cookie_roundtrip_authenticates() {
    let g = gate();
    let admin = Identity::new(1, "admin", true);
    let set_cookie = cookie::encode(&g.codec().issue(&admin).unwrap());
    let token = cookie::decode(Some(&set_cookie)).unwrap();
    assert_eq!(g.codec().verify(&token), Some(admin.clone()));
    assert_eq!(g.authenticate(&headers_for(&g, &admin)), Some(admin));
}

#[test]
fn no_cookie_redirects_to_login() {
    let g = gate();
    let outcome = g.require_authenticated(&HeaderMap::new());
    assert_eq!(outcome, AuthOutcome::Redirect(Redirect::to_login()));
    let r = outcome.into_result().unwrap_err();
    assert_eq!(r.target, "/login");
    assert_eq!(r.reason, RedirectReason::Unauthenticated);
}

#[test]
fn garbage_or_foreign_cookie_redirects_to_login() {
    let g = gate();
    let mut h = HeaderMap::new();
    h.insert(header::COOKIE, HeaderValue::from_static("auth_token=not.a.token"));
    assert_eq!(g.require_authenticated(&h), AuthOutcome::Redirect(Redirect::to_login()));

    let foreign = AuthGate::new(TokenCodec::new(SessionSecret::new("someone-else")));
    let h = headers_for(&foreign, &Identity::new(1, "admin", true));
    assert!(g.authenticate(&h).is_none());
    assert_eq!(g.require_role(&h, Role::Admin), AuthOutcome::Redirect(Redirect::to_login()));
}

#[test]
fn customer_on_admin_route_is_forbidden_not_logged_out() {
    let g = gate();
    let customer = Identity::new(2, "customer", false);
    let outcome = g.require_role(&headers_for(&g, &customer), Role::Admin);
    let r = outcome.into_result().unwrap_err();
    assert_eq!(r.target, "/products");
    assert_eq!(r.reason, RedirectReason::Forbidden);
    assert_ne!(r.target, LOGIN_PATH);
}

#[test]
fn admin_on_customer_only_route_goes_to_admin_home() {
    let g = gate();
    let admin = Identity::new(1, "admin", true);
    let r = g.require_role(&headers_for(&g, &admin), Role::Customer).into_result().unwrap_err();
    assert_eq!(r, Redirect { target: "/admin", reason: RedirectReason::Forbidden });
}

#[test]
fn matching_role_passes_through() {
    let g = gate();
    let admin = Identity::new(1, "admin", true);
    let outcome = g.require_role(&headers_for(&g, &admin), Role::Admin);
    assert_eq!(outcome.identity(), Some(&admin));

    let customer = Identity::new(2, "customer", false);
    let h = headers_for(&g, &customer);
    assert_eq!(g.require_role(&h, Role::Customer).into_result().unwrap(), customer);
    assert_eq!(g.require_authenticated(&h).into_result().unwrap(), customer);
}

#[test]
fn redirect_renders_as_see_other() {
    let resp = Redirect::forbidden(Role::Customer).into_response();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/products");
    assert_eq!(landing_for(Role::Admin), "/admin");
}
