use clap::{Parser, Subcommand};

/// Account signup/login service
#[derive(Parser)]
#[command(name = "accounts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Bootstrap the schema and serve HTTP (default)
    Serve,

    /// Bootstrap the schema and exit
    Migrate,
}
