pub mod cli;
pub mod diagnostics;
pub mod engine;
pub mod ops;
pub mod utils;

pub use cli::{Cli, PdfCmd, Settings};
pub use diagnostics::{Diagnostic, Reporter};
pub use engine::{LopdfEngine, PageEngine};
pub use ops::Outcome;

use anyhow::Result;
use log::{info, trace};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Clean,
    /// A validation or parse failure was met, whether or not it was reported.
    Failed,
}

/// Check that every path in `files` exists under `work_dir`, reporting each one that does not.
pub fn all_files_exist(work_dir: &Path, files: &[String], reporter: &mut Reporter) -> bool {
    let mut all_exist = true;
    for file in files {
        trace!("Look for '{file}' in '{}'", work_dir.display());
        if !work_dir.join(file).exists() {
            reporter.report(Diagnostic::NotFound(file.clone()));
            all_exist = false;
        }
    }
    all_exist
}

/// Validate the inputs of `cmd` and dispatch it, reading and writing files under `work_dir`.
pub fn run<E: PageEngine>(
    engine: &E,
    cmd: &PdfCmd,
    settings: &Settings,
    work_dir: &Path,
    reporter: &mut Reporter,
) -> Result<Status> {
    let files = cmd.files();

    if !all_files_exist(work_dir, &files, reporter) {
        return Ok(Status::Failed);
    }

    if files.is_empty() {
        reporter.report(Diagnostic::NoFiles);
        return Ok(Status::Failed);
    }

    let outcome = match cmd {
        PdfCmd::Merge { name, files } => ops::merge(
            engine,
            work_dir,
            files,
            name.as_deref(),
            settings.skip_bad_files(),
            reporter,
        )?,
        PdfCmd::Cut {
            name,
            file,
            positions,
        } => ops::cut(engine, work_dir, file, positions, name.as_deref(), reporter)?,
    };

    if let Outcome::Written { path, pages } = &outcome {
        info!("Output document saved as '{}' ({pages} pages)", path.display());
    }

    match outcome {
        Outcome::Written { .. } if !reporter.has_reported() => Ok(Status::Clean),
        _ => Ok(Status::Failed),
    }
}
