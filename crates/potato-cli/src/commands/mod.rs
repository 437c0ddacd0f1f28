pub mod genres;
pub mod import;
pub mod search;
pub mod show;

use clap::Args;
use url::Url;

use crate::client::CatalogClient;

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self) -> anyhow::Result<()>;
}

#[derive(Args, Debug, Clone)]
pub struct ServerArgs {
    #[arg(
        long,
        env = "POTATO_URL",
        default_value = "http://localhost:3000",
        help = "Base URL of catalog server"
    )]
    url: Url,
}

impl ServerArgs {
    pub fn client(&self) -> CatalogClient {
        CatalogClient::new(self.url.clone())
    }
}
