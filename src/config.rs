//! Process configuration, read once at startup.
//!
//! The binary builds a [`ServerConfig`] from the environment and passes it down;
//! nothing below this module reads environment variables.

use serde::Serialize;

use crate::identity::SessionSecret;

pub const SECRET_ENV: &str = "JWT_SECRET";
pub const HTTP_PORT_ENV: &str = "STOREFRONT_HTTP_PORT";
pub const BIND_ENV: &str = "STOREFRONT_BIND";

pub const HTTP_PORT_FLAG: &str = "--http-port";
pub const BIND_FLAG: &str = "--bind";

pub const DEFAULT_HTTP_PORT: u16 = 3000;
pub const DEFAULT_BIND: &str = "0.0.0.0";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET environment variable is not set")]
    MissingSecret,
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: SessionSecret,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|k| std::env::var(k).ok()) }

    /// Resolve settings through `lookup` instead of the process environment.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let secret = lookup(SECRET_ENV).filter(|s| !s.trim().is_empty()).ok_or(ConfigError::MissingSecret)?;
        Ok(Self { secret: SessionSecret::new(secret) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoAccount {
    pub username: String,
    pub password: String,
}

/// Optional demo credentials shown on the login page and seeded at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DemoAccounts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin: Option<DemoAccount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<DemoAccount>,
}

impl DemoAccounts {
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let pair = |user: &str, pass: &str| match (lookup(user), lookup(pass)) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some(DemoAccount { username, password })
            }
            _ => None,
        };
        Self {
            admin: pair("DEMO_ADMIN_USERNAME", "DEMO_ADMIN_PASSWORD"),
            customer: pair("DEMO_CUSTOMER_USERNAME", "DEMO_CUSTOMER_PASSWORD"),
        }
    }

    pub fn is_empty(&self) -> bool { self.admin.is_none() && self.customer.is_none() }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub http_port: u16,
    pub auth: AuthConfig,
    pub demo: DemoAccounts,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> { Self::from_lookup(|k| std::env::var(k).ok()) }

    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, ConfigError> {
        let auth = AuthConfig::from_lookup(&lookup)?;
        let http_port = match lookup(HTTP_PORT_ENV) {
            Some(v) => parse_port(HTTP_PORT_ENV, v)?,
            None => DEFAULT_HTTP_PORT,
        };
        let bind = lookup(BIND_ENV).unwrap_or_else(|| DEFAULT_BIND.to_string());
        Ok(Self { bind, http_port, auth, demo: DemoAccounts::from_lookup(&lookup) })
    }

    /// Apply `--http-port N` and `--bind ADDR` from the command line on top of the
    /// environment. A flag with a missing or unparsable value is an error.
    pub fn apply_args(&mut self, args: &[String]) -> Result<(), ConfigError> {
        if let Some(v) = flag_value(args, HTTP_PORT_FLAG) {
            self.http_port = parse_port(HTTP_PORT_FLAG, v.unwrap_or_default())?;
        }
        if let Some(v) = flag_value(args, BIND_FLAG) {
            self.bind = v
                .filter(|b| !b.is_empty())
                .ok_or(ConfigError::Invalid { name: BIND_FLAG, value: String::new() })?;
        }
        Ok(())
    }

    pub fn addr(&self) -> String { format!("{}:{}", self.bind, self.http_port) }
}

fn parse_port(name: &'static str, value: String) -> Result<u16, ConfigError> {
    value.trim().parse::<u16>().map_err(|_| ConfigError::Invalid { name, value })
}

/// `None` when `flag` is absent, `Some(None)` when it is the last argument.
fn flag_value(args: &[String], flag: &str) -> Option<Option<String>> {
    args.iter().position(|a| a == flag).map(|i| args.get(i + 1).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn missing_or_blank_secret_fails() {
        let e = env(&[]);
        assert!(matches!(AuthConfig::from_lookup(|k| e.get(k).cloned()), Err(ConfigError::MissingSecret)));
        let e = env(&[("JWT_SECRET", "   ")]);
        assert!(matches!(ServerConfig::from_lookup(|k| e.get(k).cloned()), Err(ConfigError::MissingSecret)));
    }

    #[test]
    fn defaults_and_overrides() {
        let e = env(&[("JWT_SECRET", "s3cret")]);
        let cfg = ServerConfig::from_lookup(|k| e.get(k).cloned()).unwrap();
        assert_eq!(cfg.http_port, DEFAULT_HTTP_PORT);
        assert_eq!(cfg.addr(), "0.0.0.0:3000");
        assert_eq!(cfg.auth.secret.as_bytes(), b"s3cret");
        assert!(cfg.demo.is_empty());

        let e = env(&[("JWT_SECRET", "s3cret"), ("STOREFRONT_HTTP_PORT", "8080"), ("STOREFRONT_BIND", "127.0.0.1")]);
        let cfg = ServerConfig::from_lookup(|k| e.get(k).cloned()).unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn bad_port_is_reported() {
        let e = env(&[("JWT_SECRET", "s3cret"), ("STOREFRONT_HTTP_PORT", "eighty")]);
        let err = ServerConfig::from_lookup(|k| e.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: HTTP_PORT_ENV, .. }));
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn base() -> ServerConfig {
        let e = env(&[("JWT_SECRET", "s3cret"), ("STOREFRONT_HTTP_PORT", "8080")]);
        ServerConfig::from_lookup(|k| e.get(k).cloned()).unwrap()
    }

    #[test]
    fn cli_flags_override_env() {
        let mut cfg = base();
        cfg.apply_args(&args(&["storefront_server", "--http-port", "9090", "--bind", "127.0.0.1"])).unwrap();
        assert_eq!(cfg.addr(), "127.0.0.1:9090");

        let mut cfg = base();
        cfg.apply_args(&args(&["storefront_server"])).unwrap();
        assert_eq!(cfg.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn bad_cli_port_is_reported_like_bad_env_port() {
        let mut cfg = base();
        let err = cfg.apply_args(&args(&["storefront_server", "--http-port", "abc"])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: HTTP_PORT_FLAG, ref value } if value == "abc"));
        assert_eq!(cfg.http_port, 8080);

        let err = cfg.apply_args(&args(&["storefront_server", "--http-port"])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: HTTP_PORT_FLAG, .. }));
        let err = cfg.apply_args(&args(&["storefront_server", "--bind"])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: BIND_FLAG, .. }));
    }

    #[test]
    fn demo_accounts_need_both_fields() {
        let e = env(&[
            ("DEMO_ADMIN_USERNAME", "admin"),
            ("DEMO_ADMIN_PASSWORD", "admin123"),
            ("DEMO_CUSTOMER_USERNAME", "customer"),
        ]);
        let demo = DemoAccounts::from_lookup(|k| e.get(k).cloned());
        assert_eq!(demo.admin, Some(DemoAccount { username: "admin".into(), password: "admin123".into() }));
        assert_eq!(demo.customer, None);
    }
}
