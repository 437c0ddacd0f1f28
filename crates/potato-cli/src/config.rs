use clap::{Parser, Subcommand};

use crate::commands::{genres::GenresCmd, import::ImportCmd, search::SearchCmd, show::ShowCmd};

#[derive(Parser)]
#[command(
    version,
    about,
    long_about = "CLI for potato catalog - imports games and queries a running catalog server."
)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Import(ImportCmd),
    Search(SearchCmd),
    Genres(GenresCmd),
    Show(ShowCmd),
}

impl crate::commands::Executor for Command {
    async fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Import(cmd) => cmd.run().await,
            Command::Search(cmd) => cmd.run().await,
            Command::Genres(cmd) => cmd.run().await,
            Command::Show(cmd) => cmd.run().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory as _;

    #[test]
    fn test_cli_definition() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn test_parse_import() {
        let config = CliConfig::try_parse_from([
            "potato-cli",
            "import",
            "games.json",
            "--batch-size",
            "50",
            "--url",
            "http://catalog:8080",
        ])
        .unwrap();
        assert!(matches!(config.command, Command::Import(_)));
    }
}
