//!
//! storefront HTTP server
//! ----------------------
//! Axum routes for the storefront. Pages answer with JSON; every authentication or
//! authorization failure answers with a `303 See Other` produced by the identity gate.
//!
//! Responsibilities:
//! - Signup and login: validate the form, hash/verify the password, set the session cookie.
//! - Logout: clear the session cookie (tokens are not revoked server-side).
//! - Catalog listing and purchase for any signed-in user.
//! - Product creation for administrators.
//! - First-run demo accounts and sample catalog.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Json, Router};
use serde_json::json;
use tracing::{info, warn};

use crate::config::{DemoAccounts, ServerConfig};
use crate::error::{AppError, AppResult};
use crate::identity::{
    cookie, hash_password, landing_for, verify_password, verify_placeholder, AuthGate, Identity, Role, TokenCodec,
    CUSTOMER_HOME, LOGIN_PATH,
};
use crate::storage::{seed, MemoryStore, NewProduct, NewUser, SharedStore};

pub mod forms;

use forms::{AdminAction, AdminForm, CredentialsForm, ProductsAction, ProductsForm};

/// Shared server state injected into all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub gate: AuthGate,
    pub demo: Arc<DemoAccounts>,
}

impl AppState {
    pub fn new(store: SharedStore, gate: AuthGate, demo: DemoAccounts) -> Self {
        Self { store, gate, demo: Arc::new(demo) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", get(login_page).post(login))
        .route("/signup", get(signup_page).post(signup))
        .route("/products", get(products_page).post(products_action))
        .route("/admin", get(admin_page).post(admin_action))
        .with_state(state)
}

/// Start the storefront HTTP server.
///
/// The configuration carries the signing secret, so a process without one never
/// reaches this point. Demo accounts and the sample catalog are seeded first.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let demo = config.demo.clone();
    let seeding_store = store.clone();
    let summary = tokio::task::spawn_blocking(move || seed::seed_demo(&*seeding_store, &demo)).await??;
    info!(users = summary.users, products = summary.products, "demo data ready");

    let gate = AuthGate::new(TokenCodec::new(config.auth.secret.clone()));
    let app = router(AppState::new(store, gate, config.demo.clone()));

    let addr: SocketAddr = config.addr().parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::internal("task_failed".to_string(), e.to_string()))
}

/// Redirect to `target` while setting the session cookie for `identity`.
fn start_session(state: &AppState, identity: &Identity, target: &str) -> AppResult<Response> {
    let token = state.gate.codec().issue(identity)?;
    let value = cookie::set_cookie_value(&token)
        .map_err(|e| AppError::internal("cookie_encode".to_string(), e.to_string()))?;
    let mut resp = axum::response::Redirect::to(target).into_response();
    resp.headers_mut().insert(header::SET_COOKIE, value);
    Ok(resp)
}

fn end_session(identity: &Identity) -> Response {
    info!(user_id = identity.user_id, "logout");
    let mut resp = axum::response::Redirect::to(LOGIN_PATH).into_response();
    resp.headers_mut().insert(header::SET_COOKIE, cookie::clear_cookie_value());
    resp
}

fn form_body<T>(form: Result<Form<T>, FormRejection>) -> AppResult<T> {
    form.map(|Form(body)| body).map_err(|e| AppError::user("bad_form".to_string(), e.body_text()))
}

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let target = match state.gate.authenticate(&headers) {
        Some(identity) => landing_for(identity.role()),
        None => LOGIN_PATH,
    };
    axum::response::Redirect::to(target).into_response()
}

async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.gate.authenticate(&headers).is_some() {
        return axum::response::Redirect::to(CUSTOMER_HOME).into_response();
    }
    Json(json!({"status": "ok", "demoAccounts": state.demo.as_ref()})).into_response()
}

async fn signup_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if state.gate.authenticate(&headers).is_some() {
        return axum::response::Redirect::to(CUSTOMER_HOME).into_response();
    }
    Json(json!({"status": "ok"})).into_response()
}

async fn login(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> AppResult<Response> {
    let cmd = form_body(form)?.into_login()?;
    let invalid = || AppError::auth("invalid_credentials", "Invalid username or password");

    let password = cmd.password;
    let Some(record) = state.store.find_user_by_name(&cmd.username) else {
        // Unknown names pay the same Argon2 cost as a wrong password.
        blocking(move || verify_placeholder(&password)).await?;
        warn!(username = %cmd.username, "login failed: unknown user");
        return Err(invalid());
    };
    let phc = record.password_hash.clone();
    if !blocking(move || verify_password(&password, &phc)).await? {
        warn!(username = %cmd.username, "login failed: wrong password");
        return Err(invalid());
    }

    let identity = record.identity();
    info!(user_id = identity.user_id, is_admin = identity.is_admin, "login");
    start_session(&state, &identity, landing_for(identity.role()))
}

async fn signup(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> AppResult<Response> {
    let cmd = form_body(form)?.into_signup()?;
    if state.store.find_user_by_name(&cmd.username).is_some() {
        return Err(AppError::conflict("username_taken", "Username already taken"));
    }
    let password = cmd.password;
    let password_hash = blocking(move || hash_password(&password)).await??;
    let user_id = state.store.insert_user(NewUser { username: cmd.username.clone(), password_hash, is_admin: false })?;

    let identity = Identity::new(user_id, cmd.username, false);
    info!(user_id, "signup");
    start_session(&state, &identity, CUSTOMER_HOME)
}

async fn products_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match state.gate.require_authenticated(&headers).into_result() {
        Ok(user) => user,
        Err(redirect) => return redirect.into_response(),
    };
    Json(json!({"user": user, "products": state.store.list_products()})).into_response()
}

async fn products_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<ProductsForm>, FormRejection>,
) -> Response {
    let user = match state.gate.require_authenticated(&headers).into_result() {
        Ok(user) => user,
        Err(redirect) => return redirect.into_response(),
    };
    let action = match form_body(form).and_then(|f| f.validate().map_err(AppError::from)) {
        Ok(action) => action,
        Err(e) => return e.into_response(),
    };
    match action {
        ProductsAction::Logout => end_session(&user),
        ProductsAction::Buy { product_id } => {
            let removed = state.store.delete_product(product_id);
            info!(user_id = user.user_id, product_id, removed, "purchase");
            Json(json!({"status": "ok", "productId": product_id, "removed": removed})).into_response()
        }
    }
}

async fn admin_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let user = match state.gate.require_role(&headers, Role::Admin).into_result() {
        Ok(user) => user,
        Err(redirect) => return redirect.into_response(),
    };
    let shop_id = state.store.first_shop().map(|s| s.shop_id);
    Json(json!({"user": user, "products": state.store.list_products(), "shopId": shop_id})).into_response()
}

async fn admin_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<AdminForm>, FormRejection>,
) -> Response {
    let user = match state.gate.require_role(&headers, Role::Admin).into_result() {
        Ok(user) => user,
        Err(redirect) => return redirect.into_response(),
    };
    let action = match form_body(form).and_then(|f| f.validate().map_err(AppError::from)) {
        Ok(action) => action,
        Err(e) => return e.into_response(),
    };
    match action {
        AdminAction::Logout => end_session(&user),
        AdminAction::AddProduct { name, price } => {
            let shop = state.store.shop_for(user.user_id);
            match state.store.insert_product(NewProduct { shop_id: shop.shop_id, name, price }) {
                Ok(product) => {
                    info!(user_id = user.user_id, product_id = product.product_id, "product added");
                    Json(json!({"status": "ok", "success": "Product added successfully!", "product": product}))
                        .into_response()
                }
                Err(e) => AppError::from(e).into_response(),
            }
        }
    }
}
