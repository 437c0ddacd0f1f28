use std::path::PathBuf;

use crate::error::Result;
pub use clap::Parser;
use potato_app::state::{AppConfig, DEFAULT_PAGE_SIZE, DEFAULT_SEARCH_LIMIT};
use url::Url;

#[derive(Debug, Clone, clap::Parser)]
#[command(version, about)]
pub struct ServerConfig {
    #[arg(
        short,
        long,
        default_value_t = 3000,
        env = "POTATO_LISTEN_PORT",
        help = "Port to listen on"
    )]
    pub port: u16,
    #[arg(
        short,
        long,
        default_value = "127.0.0.1",
        env = "POTATO_LISTEN_ADDRESS",
        help = "Address to listen on"
    )]
    pub listen_address: String,

    #[arg(
        long,
        env = "POTATO_BASE_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of server, as visible to clients"
    )]
    pub base_url: Url,

    #[arg(
        long,
        env = "POTATO_DATABASE_URL",
        help = "Database URL e.g. sqlite://file.db, default is sqlite://[data-dir]/potato.db, where data-dir is set by --data-dir"
    )]
    database_url: Option<String>,

    #[arg(
        long,
        env = "POTATO_DATA_DIR",
        help = "Data directory for database, default is system default like ~/.local/share/potato",
        default_value_t = default_data_dir()
    )]
    data_dir: String,

    #[arg(
        long,
        env = "POTATO_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        help = "Number of games in one page of full listing"
    )]
    pub page_size: u32,

    #[arg(
        long,
        env = "POTATO_SEARCH_LIMIT",
        default_value_t = DEFAULT_SEARCH_LIMIT,
        help = "Maximum number of games returned by search"
    )]
    pub search_limit: usize,

    #[arg(long, env = "POTATO_NO_CORS", help = "Disable CORS")]
    pub no_cors: bool,
}

fn default_data_dir() -> String {
    dirs::data_dir()
        .map(|p| p.join("potato"))
        .unwrap_or_else(|| PathBuf::from("potato"))
        .to_string_lossy()
        .to_string()
}

impl ServerConfig {
    pub fn load() -> Result<Self> {
        ServerConfig::try_parse().map_err(|e| e.into())
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn database_url(&self) -> String {
        self.database_url
            .clone()
            .unwrap_or_else(|| format!("sqlite://{}/potato.db", self.data_dir))
    }
}

impl From<&ServerConfig> for AppConfig {
    fn from(config: &ServerConfig) -> Self {
        AppConfig {
            page_size: config.page_size,
            search_limit: config.search_limit,
        }
    }
}
