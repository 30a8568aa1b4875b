use log::debug;
use std::fmt;

/// A user-facing message about an input that could not be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    NotFound(String),
    NotAFile(String),
    NotAPdf(String),
    Omitted(String),
    MergeAborted(String),
    NoFiles,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NotFound(file) => {
                write!(f, "'{file}' is not found in the current directory.")
            }
            Diagnostic::NotAFile(file) => write!(f, "'{file}' is not a file."),
            Diagnostic::NotAPdf(file) => write!(f, "'{file}' is not a pdf file."),
            Diagnostic::Omitted(file) => write!(f, "omitted file provided: '{file}'"),
            Diagnostic::MergeAborted(file) => {
                write!(f, "'{file}' could not be read, merge aborted.")
            }
            Diagnostic::NoFiles => write!(f, "no files provided."),
        }
    }
}

/// Prints diagnostics as `<program>: <message>` on stderr and keeps track of them.
#[derive(Debug)]
pub struct Reporter {
    program: String,
    echo: bool,
    emitted: Vec<Diagnostic>,
}

impl Reporter {
    pub fn new(program: impl Into<String>) -> Self {
        Reporter {
            program: program.into(),
            echo: true,
            emitted: Vec::new(),
        }
    }

    /// A reporter that only records, used where stderr is not wanted.
    pub fn silent() -> Self {
        Reporter {
            program: String::new(),
            echo: false,
            emitted: Vec::new(),
        }
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        debug!("{diagnostic}");
        if self.echo {
            eprintln!("{}: {diagnostic}", self.program);
        }
        self.emitted.push(diagnostic);
    }

    pub fn emitted(&self) -> &[Diagnostic] {
        &self.emitted
    }

    pub fn has_reported(&self) -> bool {
        !self.emitted.is_empty()
    }
}
