use clap::Parser;

use crate::commands::{Executor, ServerArgs};

#[derive(Parser, Debug)]
pub struct GenresCmd {
    #[command(flatten)]
    server: ServerArgs,
}

impl Executor for GenresCmd {
    async fn run(self) -> anyhow::Result<()> {
        for genre in self.server.client().genres().await? {
            println!("{}", genre.name);
        }
        Ok(())
    }
}
