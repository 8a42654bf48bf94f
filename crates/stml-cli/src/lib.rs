use std::ffi::OsString;

use clap::Parser;
use log::LevelFilter;
use stml_core::StmlError;

mod cli_args;
mod error_map;
mod models;
mod runner;
mod source_loader;
mod statement;

pub(crate) use cli_args::{BatchArgs, Cli, Mode, RunArgs};
pub(crate) use error_map::{
    emit_error, map_cli_source_path, map_cli_source_read, map_cli_source_scan,
    map_cli_source_walk,
};
pub(crate) use models::{LoadedDocument, Statement};
pub(crate) use runner::{emit_report, run_document, run_documents};
pub(crate) use source_loader::{load_document_file, load_documents_by_scripts_dir};
pub(crate) use statement::parse_statement;

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, StmlError> {
    match cli.command {
        Mode::Run(args) => run_file(args),
        Mode::Batch(args) => run_batch(args),
    }
}

fn run_file(args: RunArgs) -> Result<i32, StmlError> {
    init_logging(args.verbose);
    let document = load_document_file(&args.file)?;
    let lines = run_document(&document.source)?;
    emit_report(&lines);
    Ok(0)
}

fn run_batch(args: BatchArgs) -> Result<i32, StmlError> {
    init_logging(args.verbose);
    let documents = load_documents_by_scripts_dir(&args.scripts_dir)?;
    log::debug!("loaded {} document(s) from {}", documents.len(), args.scripts_dir);
    let lines = run_documents(&documents)?;
    emit_report(&lines);
    Ok(0)
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    // Another logger may already be installed.
    let _ = env_logger::Builder::new().filter_level(level).try_init();
}
