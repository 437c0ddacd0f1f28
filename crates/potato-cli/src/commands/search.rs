use clap::Parser;

use crate::commands::{Executor, ServerArgs};

#[derive(Parser, Debug)]
pub struct SearchCmd {
    #[arg(help = "Text to look for in title, publisher or genre")]
    query: String,

    #[command(flatten)]
    server: ServerArgs,
}

impl Executor for SearchCmd {
    async fn run(self) -> anyhow::Result<()> {
        let games = self.server.client().search(&self.query).await?;
        if games.is_empty() {
            println!("No games found");
        }
        for game in games {
            println!(
                "{}\t{}\t{}",
                game.id,
                game.title.as_deref().unwrap_or("-"),
                game.publisher.as_deref().unwrap_or("-")
            );
        }
        Ok(())
    }
}
