use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use potato_dal::game::CreateGame;
use tracing::info;

use crate::commands::{Executor, ServerArgs};

#[derive(Parser, Debug)]
pub struct ImportCmd {
    #[arg(help = "JSON file with array of games to create")]
    file: PathBuf,

    #[arg(
        long,
        help = "Number of games sent in one request, all in one request if not provided"
    )]
    batch_size: Option<usize>,

    #[command(flatten)]
    server: ServerArgs,
}

impl Executor for ImportCmd {
    async fn run(self) -> anyhow::Result<()> {
        let data = tokio::fs::read(&self.file)
            .await
            .with_context(|| format!("Cannot read {:?}", self.file))?;
        let games: Vec<CreateGame> =
            serde_json::from_slice(&data).context("File must contain JSON array of games")?;
        if games.is_empty() {
            println!("Nothing to import");
            return Ok(());
        }

        let batch_size = batch_size(self.batch_size, games.len());
        let client = self.server.client();
        let mut sent = 0;
        for chunk in games.chunks(batch_size) {
            let response = client
                .bulk_create(chunk)
                .await
                .with_context(|| format!("Import stopped, {sent} games imported before"))?;
            sent += chunk.len();
            info!("{} ({sent}/{})", response.message, games.len());
        }
        println!("Imported {sent} games");
        Ok(())
    }
}

fn batch_size(requested: Option<usize>, total: usize) -> usize {
    match requested {
        Some(0) | None => total,
        Some(n) => n,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_size() {
        assert_eq!(10, batch_size(None, 10));
        assert_eq!(10, batch_size(Some(0), 10));
        assert_eq!(3, batch_size(Some(3), 10));
    }
}
