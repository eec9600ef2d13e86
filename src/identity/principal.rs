use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Admin,
}

impl Role {
    pub fn from_flag(is_admin: bool) -> Self {
        if is_admin { Role::Admin } else { Role::Customer }
    }
}

/// The authenticated principal: the password-free projection of a credential record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn new<S: Into<String>>(user_id: i64, username: S, is_admin: bool) -> Self {
        Self { user_id, username: username.into(), is_admin }
    }

    pub fn role(&self) -> Role { Role::from_flag(self.is_admin) }
}
