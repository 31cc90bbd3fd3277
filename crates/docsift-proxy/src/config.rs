use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

pub const DEFAULT_UPSTREAM_URL: &str =
    "https://www.sec.gov/Archives/edgar/data/1318605/000162828024043486/tsla-20240930.htm";

pub const DEFAULT_USER_AGENT: &str = "ransom app App/1.0 (your.email@domain.com)";

#[derive(Debug, Clone, Parser)]
#[command(name = "docsift-proxy", version, about = "Fetch a filing for the docsift viewer")]
pub struct ProxyConfig {
    /// Address to listen on.
    #[arg(long, env = "DOCSIFT_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// Document served at `/sec-link1`.
    #[arg(long, env = "DOCSIFT_UPSTREAM_URL", default_value = DEFAULT_UPSTREAM_URL)]
    pub upstream_url: String,

    /// Sent with every upstream request.
    #[arg(long, env = "DOCSIFT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
