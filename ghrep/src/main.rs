// ghrep/src/main.rs
//! ghrep entry point.
//!
//! Loads `.env`, parses the command line, sets up logging and runs the
//! chosen command. Any error is printed in red on stderr with exit code 1.

use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

use ghrep::cli::Cli;
use ghrep::commands::{dispatch, error_msg, Session};
use ghrep::logger;
use ghrep::ui::theme::ThemeStyle;

fn main() -> ExitCode {
    // A missing .env is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    logger::init_logger(logger::level_from_flags(cli.quiet, cli.debug));

    let result = Session::from_cli(&cli).and_then(|session| {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        dispatch(&cli, &session, &mut out)?;
        out.flush()?;
        Ok(())
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::debug!("Command failed: {:?}", err);
            error_msg(format!("{:#}", err), &ThemeStyle::default_theme_map());
            ExitCode::FAILURE
        }
    }
}
