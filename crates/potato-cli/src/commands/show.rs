use clap::Parser;

use crate::commands::{Executor, ServerArgs};

#[derive(Parser, Debug)]
pub struct ShowCmd {
    #[arg(help = "Game id")]
    id: i64,

    #[command(flatten)]
    server: ServerArgs,
}

impl Executor for ShowCmd {
    async fn run(self) -> anyhow::Result<()> {
        let game = self.server.client().game(self.id).await?;
        println!("{}", serde_json::to_string_pretty(&game)?);
        Ok(())
    }
}
