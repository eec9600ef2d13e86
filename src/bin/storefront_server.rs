//!
//! storefront server binary
//! ------------------------
//! Command-line entry point for the storefront HTTP server. Settings come from the
//! environment; CLI flags override them. A missing `JWT_SECRET` stops the process
//! before anything binds.

use anyhow::{Context, Result};
use std::env;
use tracing_subscriber::{fmt, EnvFilter};

use storefront::config::ServerConfig;

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    fmt().with_env_filter(filter).init();

    let args: Vec<String> = env::args().collect();

    if has_flag(&args, "--help") || has_flag(&args, "-h") {
        println!("storefront Server\n\nUSAGE:\n  storefront_server [--http-port N] [--bind ADDR]\n\nOPTIONS:\n  --http-port N   HTTP port (env: STOREFRONT_HTTP_PORT, default 3000)\n  --bind ADDR     Bind address (env: STOREFRONT_BIND, default 0.0.0.0)\n\nENVIRONMENT:\n  JWT_SECRET      Session signing secret (required)\n  DEMO_ADMIN_USERNAME / DEMO_ADMIN_PASSWORD         optional demo admin\n  DEMO_CUSTOMER_USERNAME / DEMO_CUSTOMER_PASSWORD   optional demo customer\n");
        return Ok(());
    }

    let mut config = ServerConfig::from_env().context("loading configuration")?;
    config.apply_args(&args).context("parsing command-line flags")?;

    tracing::info!(
        target: "storefront",
        "storefront starting: addr={}, demo_accounts={}",
        config.addr(),
        !config.demo.is_empty()
    );

    storefront::server::run(config).await
}
