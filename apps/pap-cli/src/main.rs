//! PAP command-line client.

mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pap_client::PapClient;

use crate::cli::{Cli, Command};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let client = PapClient::new(cli.host, cli.port, cli.user);

    match cli.command {
        Command::Download {
            remote_path,
            output_dir,
        } => {
            let saved = client.download(&remote_path, &output_dir).await?;
            println!("{}", saved.display());
        }
        Command::Upload {
            local_path,
            target,
        } => {
            let bytes = client.upload(&local_path, target.as_deref()).await?;
            println!("uploaded {bytes} bytes");
        }
        Command::List { remote_path } => {
            for entry in client.list(&remote_path).await? {
                println!("{entry}");
            }
        }
    }

    Ok(())
}
