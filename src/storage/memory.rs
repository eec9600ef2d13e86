use std::collections::{BTreeMap, HashMap};

use parking_lot::RwLock;
use tracing::debug;

use super::{CatalogStore, CredentialRecord, NewProduct, NewUser, Product, Shop, StoreError, UserStore};

#[derive(Debug, Default)]
struct Tables {
    users: HashMap<String, CredentialRecord>,
    shops: BTreeMap<i64, Shop>,
    products: BTreeMap<i64, Product>,
    next_user_id: i64,
    next_shop_id: i64,
    next_product_id: i64,
}

impl Tables {
    fn next(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn create_shop(&mut self, admin_id: i64) -> Shop {
        let shop = Shop { shop_id: Self::next(&mut self.next_shop_id), admin_id };
        self.shops.insert(shop.shop_id, shop);
        debug!(shop_id = shop.shop_id, admin_id, "shop created");
        shop
    }
}

/// Process-local store. Identifiers are assigned from 1 upward per table, like serial columns.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn user_count(&self) -> usize { self.tables.read().users.len() }
}

impl UserStore for MemoryStore {
    fn find_user_by_name(&self, username: &str) -> Option<CredentialRecord> {
        self.tables.read().users.get(username).cloned()
    }

    fn insert_user(&self, user: NewUser) -> Result<i64, StoreError> {
        let mut t = self.tables.write();
        if t.users.contains_key(&user.username) {
            return Err(StoreError::DuplicateUsername(user.username));
        }
        let user_id = Tables::next(&mut t.next_user_id);
        let record = CredentialRecord {
            user_id,
            username: user.username.clone(),
            password_hash: user.password_hash,
            is_admin: user.is_admin,
        };
        t.users.insert(user.username, record);
        Ok(user_id)
    }
}

impl CatalogStore for MemoryStore {
    fn list_products(&self) -> Vec<Product> { self.tables.read().products.values().cloned().collect() }

    fn first_shop(&self) -> Option<Shop> { self.tables.read().shops.values().next().copied() }

    fn create_shop(&self, admin_id: i64) -> Shop { self.tables.write().create_shop(admin_id) }

    fn shop_for(&self, admin_id: i64) -> Shop {
        let mut t = self.tables.write();
        match t.shops.values().next().copied() {
            Some(shop) => shop,
            None => t.create_shop(admin_id),
        }
    }

    fn insert_product(&self, product: NewProduct) -> Result<Product, StoreError> {
        let mut t = self.tables.write();
        if !t.shops.contains_key(&product.shop_id) {
            return Err(StoreError::UnknownShop(product.shop_id));
        }
        let product = Product {
            product_id: Tables::next(&mut t.next_product_id),
            shop_id: product.shop_id,
            name: product.name,
            price: product.price,
        };
        t.products.insert(product.product_id, product.clone());
        Ok(product)
    }

    fn delete_product(&self, product_id: i64) -> bool { self.tables.write().products.remove(&product_id).is_some() }
}
