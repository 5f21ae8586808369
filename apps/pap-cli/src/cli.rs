use std::path::PathBuf;

use clap::{Parser, Subcommand};

use pap_protocol::DEFAULT_PORT;

#[derive(Parser, Debug)]
#[command(name = "pap")]
#[command(about = "Transfer files to and from a PAP server", long_about = None)]
pub struct Cli {
    /// Server host name or address.
    #[arg(long, global = true, default_value = "10.0.0.1")]
    pub host: String,

    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Identity sent to the server; selects whose home `~` expands to.
    #[arg(long, short, global = true, default_value = "root")]
    pub user: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch a remote file.
    Download {
        remote_path: String,

        #[arg(long, short, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Send a local file.
    Upload {
        local_path: PathBuf,

        /// Remote path; defaults to the local file name.
        #[arg(long, short)]
        target: Option<String>,
    },

    /// List a remote directory.
    List {
        #[arg(default_value = ".")]
        remote_path: String,
    },
}
