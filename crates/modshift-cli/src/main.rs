//! modshift command-line entry point.

use clap::Parser;
use miette::Result;
use modshift_cli::{cli, commands, error, logger, ui};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init(args.no_color, args.quiet);

    let result = commands::execute(args.command, args.config.as_deref());

    result.map_err(error::cli_error_to_miette)
}
