use crate::diagnostics::{Diagnostic, Reporter};
use crate::engine::PageEngine;
use anyhow::Result;
use log::{debug, info};
use std::ops::Range;
use std::path::{Path, PathBuf};

pub const DEFAULT_MERGE_NAME: &str = "merged";
pub const DEFAULT_CUT_NAME: &str = "cut";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Written { path: PathBuf, pages: usize },
    Aborted,
}

/// `<name>.pdf`, or `<default_name>.pdf` when no (or an empty) name is given.
pub fn output_file_name(name: Option<&str>, default_name: &str) -> String {
    match name {
        Some(name) if !name.is_empty() => format!("{name}.pdf"),
        _ => format!("{default_name}.pdf"),
    }
}

/// Half-open page span `[start, end)` as given on the command line, not yet
/// checked against a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    pub start: i64,
    pub end: i64,
}

impl PageSpan {
    /// `[s]` selects the page `s`, `[s, n]` selects `n` pages from `s`. Any other
    /// number of positions selects nothing.
    pub fn from_positions(positions: &[i64]) -> Option<PageSpan> {
        match *positions {
            [start] => Some(PageSpan {
                start,
                end: start.saturating_add(1),
            }),
            [start, count] => Some(PageSpan {
                start,
                end: start.saturating_add(count),
            }),
            _ => None,
        }
    }

    /// Resolve against `page_count` like a sequence slice: negative bounds count
    /// from the end, bounds past either end are clamped, and a reversed span is empty.
    pub fn resolve(&self, page_count: usize) -> Range<usize> {
        let len = page_count as i64;
        let clamp = |bound: i64| {
            if bound < 0 {
                (bound + len).max(0)
            } else {
                bound.min(len)
            }
        };

        let start = clamp(self.start);
        let end = clamp(self.end).max(start);

        start as usize..end as usize
    }
}

/// Append the pages of `files`, in order, into one document written to
/// `<work_dir>/<name>.pdf` (`merged.pdf` by default).
///
/// Paths that are not regular files are passed over. With `skip_bad_files` an
/// unreadable file is reported and left out, otherwise it aborts the merge.
pub fn merge<E: PageEngine>(
    engine: &E,
    work_dir: &Path,
    files: &[String],
    name: Option<&str>,
    skip_bad_files: bool,
    reporter: &mut Reporter,
) -> Result<Outcome> {
    info!("Merge {} files", files.len());
    let mut main_doc = engine.empty()?;

    for file in files {
        let path = work_dir.join(file);
        if !path.is_file() {
            debug!("'{}' is not a regular file, passed over", path.display());
            continue;
        }

        let appended = engine
            .open(&path)
            .and_then(|doc| engine.append(&mut main_doc, doc));

        if let Err(err) = appended {
            debug!("Could not merge '{}': {err}", path.display());
            if !skip_bad_files {
                reporter.report(Diagnostic::MergeAborted(file.clone()));
                return Ok(Outcome::Aborted);
            }
            reporter.report(Diagnostic::Omitted(file.clone()));
        }
    }

    let output_path = work_dir.join(output_file_name(name, DEFAULT_MERGE_NAME));
    let pages = engine.page_count(&main_doc);
    engine.write(&mut main_doc, &output_path)?;
    info!("Merged {pages} pages into '{}'", output_path.display());

    Ok(Outcome::Written {
        path: output_path,
        pages,
    })
}

/// Copy the pages selected by `positions` (see [`PageSpan::from_positions`]) of `file`
/// into `<work_dir>/<name>.pdf` (`cut.pdf` by default).
pub fn cut<E: PageEngine>(
    engine: &E,
    work_dir: &Path,
    file: &str,
    positions: &[i64],
    name: Option<&str>,
    reporter: &mut Reporter,
) -> Result<Outcome> {
    let path = work_dir.join(file);
    if !path.is_file() {
        reporter.report(Diagnostic::NotAFile(file.to_string()));
        return Ok(Outcome::Aborted);
    }

    let doc = match engine.open(&path) {
        Ok(doc) => doc,
        Err(err) => {
            debug!("Could not load '{}': {err}", path.display());
            reporter.report(Diagnostic::NotAPdf(file.to_string()));
            return Ok(Outcome::Aborted);
        }
    };

    let Some(span) = PageSpan::from_positions(positions) else {
        debug!("{} positions given, nothing to cut", positions.len());
        return Ok(Outcome::Aborted);
    };

    let range = span.resolve(engine.page_count(&doc));
    info!("Cut pages {range:?} out of '{}'", path.display());
    let mut cut_doc = engine.extract(doc, range)?;

    let output_path = work_dir.join(output_file_name(name, DEFAULT_CUT_NAME));
    let pages = engine.page_count(&cut_doc);
    engine.write(&mut cut_doc, &output_path)?;

    Ok(Outcome::Written {
        path: output_path,
        pages,
    })
}
