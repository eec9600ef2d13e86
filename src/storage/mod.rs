//!
//! storefront storage module
//! -------------------------
//! Persistence contracts for credential records and the product catalog, plus an
//! in-memory implementation used by the server binary and the tests.
//!
//! Key responsibilities:
//! - Look up at most one credential record by display name.
//! - Insert new credential records, rejecting duplicate display names.
//! - List, insert and delete products; lazily create the single shop.
//!
//! Handlers hold the store as a `SharedStore` (`Arc<dyn Store>`).

use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::identity::Identity;

mod memory;
pub mod seed;

pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("username already taken: {0}")]
    DuplicateUsername(String),
    #[error("unknown shop {0}")]
    UnknownShop(i64),
}

/// A persisted user: display name, argon2 PHC hash and role flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user_id: i64,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl CredentialRecord {
    /// The password-free projection handed to the session layer.
    pub fn identity(&self) -> Identity { Identity::new(self.user_id, self.username.clone(), self.is_admin) }
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub shop_id: i64,
    pub admin_id: i64,
}

/// Price in integer cents. Serialized as a two-decimal string ("24.99").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(i64);

impl Price {
    pub fn from_cents(cents: i64) -> Self { Price(cents) }

    pub fn cents(self) -> i64 { self.0 }

    /// Parse a decimal amount, rounding to cents. Returns `None` unless the result is at least one cent.
    pub fn parse(text: &str) -> Option<Price> {
        let value: f64 = text.trim().parse().ok()?;
        if !value.is_finite() {
            return None;
        }
        let cents = (value * 100.0).round();
        if cents < 1.0 || cents > i64::MAX as f64 {
            return None;
        }
        Some(Price(cents as i64))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub shop_id: i64,
    pub name: String,
    pub price: Price,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub shop_id: i64,
    pub name: String,
    pub price: Price,
}

pub trait UserStore: Send + Sync {
    fn find_user_by_name(&self, username: &str) -> Option<CredentialRecord>;
    /// Insert and return the assigned identifier.
    fn insert_user(&self, user: NewUser) -> Result<i64, StoreError>;
}

pub trait CatalogStore: Send + Sync {
    fn list_products(&self) -> Vec<Product>;
    fn first_shop(&self) -> Option<Shop>;
    fn create_shop(&self, admin_id: i64) -> Shop;
    fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError>;
    /// Returns false when no product had that id.
    fn delete_product(&self, product_id: i64) -> bool;

    /// The shop new products go to, created for `admin_id` if none exists yet.
    fn shop_for(&self, admin_id: i64) -> Shop {
        match self.first_shop() {
            Some(shop) => shop,
            None => self.create_shop(admin_id),
        }
    }
}

pub trait Store: UserStore + CatalogStore {}

impl<T: UserStore + CatalogStore> Store for T {}

pub type SharedStore = Arc<dyn Store>;
