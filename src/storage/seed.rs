//! Demo data: configured demo accounts plus a sample catalog owned by the demo admin.

use anyhow::{Context, Result};
use tracing::info;

use super::{NewProduct, NewUser, Price, Store};
use crate::config::{DemoAccount, DemoAccounts};
use crate::identity::hash_password;

pub const SAMPLE_PRODUCTS: &[(&str, i64)] = &[
    ("Handmade Ceramic Mug", 2499),
    ("Leather Journal", 3450),
    ("Scented Candle Set", 1800),
    ("Wooden Cutting Board", 4200),
    ("Knitted Wool Scarf", 2875),
    ("Artisan Soap Collection", 1599),
    ("Hand-painted Greeting Cards", 1250),
    ("Macrame Plant Hanger", 2200),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub users: usize,
    pub products: usize,
}

fn ensure_user(store: &dyn Store, account: &DemoAccount, is_admin: bool) -> Result<(i64, bool)> {
    if let Some(existing) = store.find_user_by_name(&account.username) {
        return Ok((existing.user_id, false));
    }
    let password_hash = hash_password(&account.password).context("hash demo password")?;
    let id = store.insert_user(NewUser { username: account.username.clone(), password_hash, is_admin })?;
    info!(username = %account.username, is_admin, "demo account created");
    Ok((id, true))
}

/// Create the demo accounts that are configured and, when an admin exists and the
/// catalog is empty, the sample products. Safe to run more than once.
pub fn seed_demo(store: &dyn Store, demo: &DemoAccounts) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();
    let mut admin_id = None;
    if let Some(admin) = &demo.admin {
        let (id, created) = ensure_user(store, admin, true)?;
        admin_id = Some(id);
        summary.users += created as usize;
    }
    if let Some(customer) = &demo.customer {
        let (_, created) = ensure_user(store, customer, false)?;
        summary.users += created as usize;
    }

    if let Some(admin_id) = admin_id {
        if store.list_products().is_empty() {
            let shop = store.shop_for(admin_id);
            for (name, cents) in SAMPLE_PRODUCTS {
                store.insert_product(NewProduct {
                    shop_id: shop.shop_id,
                    name: (*name).to_string(),
                    price: Price::from_cents(*cents),
                })?;
                summary.products += 1;
            }
            info!(shop_id = shop.shop_id, products = summary.products, "sample catalog created");
        }
    }
    Ok(summary)
}
