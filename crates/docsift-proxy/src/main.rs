use clap::Parser;
use docsift_proxy::{serve, ProxyConfig, ProxyError};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ProxyError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    serve(ProxyConfig::parse()).await
}
