use anyhow::Result;
use clap::{CommandFactory, Parser};
use pdfpages::{Cli, LopdfEngine, Reporter, Status, run};

/// Merge PDF documents or cut a page range out of one. Validation and parse failures are
/// reported on stderr; the exit status stays 0 for them unless `--exit-code` is given.
fn main() {
    env_logger::init();

    match try_main() {
        Ok(Status::Failed) => std::process::exit(1),
        Ok(Status::Clean) => {}
        Err(err) => {
            eprintln!("Application error: {}", err);
            std::process::exit(1);
        }
    }
}

fn try_main() -> Result<Status> {
    let cli = Cli::parse();

    let Some(cmd) = cli.cmd else {
        Cli::command().print_help()?;
        return Ok(Status::Clean);
    };

    let work_dir = std::env::current_dir()?;
    let mut reporter = Reporter::new(env!("CARGO_BIN_NAME"));
    let status = run(&LopdfEngine, &cmd, &cli.settings, &work_dir, &mut reporter)?;

    if cli.settings.exit_code {
        Ok(status)
    } else {
        Ok(Status::Clean)
    }
}
