use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gecko: GeckoConfig,
    #[serde(default)]
    pub featured_pair: PairConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeckoConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on `/networks` pages walked per request
    #[serde(default = "default_max_network_pages")]
    pub max_network_pages: u32,
}

/// The pair served by `GET /gecko/pool/usdt`
#[derive(Debug, Deserialize, Clone)]
pub struct PairConfig {
    #[serde(default = "default_pair_network")]
    pub network: String,
    #[serde(default = "default_pair_token")]
    pub token_address: String,
    #[serde(default = "default_pair_sub_title")]
    pub sub_title: String,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_base_url() -> String { "https://api.geckoterminal.com/api/v2".to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_max_network_pages() -> u32 { 10 }
fn default_pair_network() -> String { "sepolia-testnet".to_string() }
fn default_pair_token() -> String { "0x03efd625304e7119b80463be5a677c121c2232bc".to_string() }
fn default_pair_sub_title() -> String { "Uniswap V3 • Sepolia".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for GeckoConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_network_pages: default_max_network_pages(),
        }
    }
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            network: default_pair_network(),
            token_address: default_pair_token(),
            sub_title: default_pair_sub_title(),
        }
    }
}

impl Config {
    /// Reads `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if !path.exists() {
            tracing::info!("{} not found, using default configuration", path.display());
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
