use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "stml")]
#[command(about = "STML scope engine CLI")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    Run(RunArgs),
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
pub(crate) struct RunArgs {
    #[arg(long = "file")]
    pub(crate) file: String,
    #[arg(long = "verbose")]
    pub(crate) verbose: bool,
}

#[derive(Debug, Args)]
pub(crate) struct BatchArgs {
    #[arg(long = "scripts-dir")]
    pub(crate) scripts_dir: String,
    #[arg(long = "verbose")]
    pub(crate) verbose: bool,
}
