//! HTTP server command
//!
//! Builds the server configuration from the environment, applies command line
//! overrides and runs until Ctrl+C / SIGTERM.

use std::net::IpAddr;

use anyhow::{Context, Result};
use clap::Parser;
use kennel_server::config::STORE_URL_VAR;
use kennel_server::{run_server, Config};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0)
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (default: $PORT or 5000)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Record store URL (http(s)://, postgres:// or memory://)
    #[arg(long, env = STORE_URL_VAR)]
    pub store_url: Option<String>,
}

/// Resolve configuration: environment first, then flags on top.
pub fn resolve_config(args: &ServeArgs) -> Result<Config> {
    let mut config = Config::from_lookup(|var| {
        if var == STORE_URL_VAR {
            if let Some(url) = &args.store_url {
                return Some(url.clone());
            }
        }
        std::env::var(var).ok()
    })
    .context("Invalid server configuration (see SUPABASE_URL, PORT, ADMIN_* variables)")?;

    if let Some(host) = args.host {
        config.bind_addr.set_ip(host);
    }
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }

    Ok(config)
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    tracing::info!(store = ?config.store.kind()?, "Starting kennel server on {}", config.bind_addr);

    // Run server (blocks until shutdown)
    run_server(config).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_bind_address() {
        let args = ServeArgs {
            host: Some("127.0.0.1".parse().unwrap()),
            port: Some(8081),
            store_url: Some("memory://".into()),
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8081");
        assert_eq!(config.store.url, "memory://");
    }
}
