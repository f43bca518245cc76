use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "groupsync-server")]
#[command(about = "Group and group syncable management API")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print the OpenAPI document (optionally to a file)
    Openapi(OpenApiArgs),
}

#[derive(Args)]
struct OpenApiArgs {
    #[arg(long, short)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    Server,
    OpenApi { out: Option<PathBuf> },
}

impl From<Cli> for RunMode {
    fn from(cli: Cli) -> Self {
        match cli.command {
            None => Self::Server,
            Some(Command::Openapi(args)) => Self::OpenApi { out: args.out },
        }
    }
}

pub fn parse_args() -> RunMode {
    Cli::parse().into()
}
