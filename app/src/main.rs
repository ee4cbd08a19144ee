use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use autogift::{config::config::Config, core::server::create_server};
use axum_server::tls_rustls::RustlsConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("autogift=info,tower_http=info")),
        )
        .init();

    let config = Config::load_envs().context("Failed to load envs")?;

    let port: u16 = config.port;
    let server_ip: IpAddr = config
        .server_ip
        .parse()
        .unwrap_or(IpAddr::from([0, 0, 0, 0]));
    let addr = SocketAddr::new(server_ip, port);
    let tls_paths = config.tls_cert_path.clone().zip(config.tls_key_path.clone());

    let (server, _db_conn) = create_server(config).await?;
    let app = server.into_make_service();

    let result = match tls_paths {
        Some((cert_path, key_path)) => {
            let tls_config = RustlsConfig::from_pem_file(&cert_path, &key_path)
                .await
                .with_context(|| format!("Failed to load TLS certificate {}", cert_path))?;
            info!("Server starting on https://{}", addr);
            axum_server::bind_rustls(addr, tls_config).serve(app).await
        }
        None => {
            info!("Server starting on {}", addr);
            axum_server::bind(addr).serve(app).await
        }
    };

    if let Err(e) = result {
        error!("Server failed: {}", e);
    }

    Ok(())
}
