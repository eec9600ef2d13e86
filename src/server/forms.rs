//! Form bodies and the validated commands built from them.
//!
//! Raw forms deserialize every field as optional text; `validate`/`into_*` turn them
//! into typed commands or a [`FormError`] before any store or session work happens.

use serde::Deserialize;

use crate::error::AppError;
use crate::storage::Price;

pub const MIN_USERNAME_CHARS: usize = 3;
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Username and password are required")]
    MissingCredentials,
    #[error("Username must be at least 3 characters")]
    UsernameTooShort,
    #[error("Password must be at least 6 characters")]
    PasswordTooShort,
    #[error("Product name and price are required")]
    MissingProductFields,
    #[error("Price must be a positive number")]
    InvalidPrice,
    #[error("A valid product id is required")]
    InvalidProductId,
    #[error("Unknown intent")]
    UnknownIntent(Option<String>),
}

impl FormError {
    pub fn code(&self) -> &'static str {
        match self {
            FormError::MissingCredentials => "missing_credentials",
            FormError::UsernameTooShort => "username_too_short",
            FormError::PasswordTooShort => "password_too_short",
            FormError::MissingProductFields => "missing_product_fields",
            FormError::InvalidPrice => "invalid_price",
            FormError::InvalidProductId => "invalid_product_id",
            FormError::UnknownIntent(_) => "unknown_intent",
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self { AppError::user(err.code().to_string(), err.to_string()) }
}

fn present(field: Option<String>) -> Option<String> { field.filter(|v| !v.is_empty()) }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CredentialsForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCommand {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupCommand {
    pub username: String,
    pub password: String,
}

impl CredentialsForm {
    fn required(self) -> Result<(String, String), FormError> {
        match (present(self.username), present(self.password)) {
            (Some(u), Some(p)) => Ok((u, p)),
            _ => Err(FormError::MissingCredentials),
        }
    }

    pub fn into_login(self) -> Result<LoginCommand, FormError> {
        let (username, password) = self.required()?;
        Ok(LoginCommand { username, password })
    }

    pub fn into_signup(self) -> Result<SignupCommand, FormError> {
        let (username, password) = self.required()?;
        if username.chars().count() < MIN_USERNAME_CHARS {
            return Err(FormError::UsernameTooShort);
        }
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(FormError::PasswordTooShort);
        }
        Ok(SignupCommand { username, password })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductsForm {
    pub intent: Option<String>,
    #[serde(rename = "productId")]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductsAction {
    Buy { product_id: i64 },
    Logout,
}

impl ProductsForm {
    pub fn validate(self) -> Result<ProductsAction, FormError> {
        match self.intent.as_deref() {
            Some("logout") => Ok(ProductsAction::Logout),
            Some("buy") => {
                let product_id = present(self.product_id)
                    .and_then(|v| v.trim().parse::<i64>().ok())
                    .ok_or(FormError::InvalidProductId)?;
                Ok(ProductsAction::Buy { product_id })
            }
            _ => Err(FormError::UnknownIntent(self.intent)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminForm {
    pub intent: Option<String>,
    pub name: Option<String>,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAction {
    AddProduct { name: String, price: Price },
    Logout,
}

impl AdminForm {
    pub fn validate(self) -> Result<AdminAction, FormError> {
        match self.intent.as_deref() {
            Some("logout") => Ok(AdminAction::Logout),
            Some("add-product") => {
                let (Some(name), Some(price)) = (present(self.name), present(self.price)) else {
                    return Err(FormError::MissingProductFields);
                };
                let price = Price::parse(&price).ok_or(FormError::InvalidPrice)?;
                Ok(AdminAction::AddProduct { name, price })
            }
            _ => Err(FormError::UnknownIntent(self.intent)),
        }
    }
}
