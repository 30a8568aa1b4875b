use clap::{Args, Parser, Subcommand};

/// Merge several PDF documents into one, or cut a contiguous page range out of a single PDF.
/// Input files are resolved against the current directory and the output is written there too.
#[derive(Parser, Debug)]
#[command(name = "pdf", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub settings: Settings,
    /// Desired action
    #[command(subcommand)]
    pub cmd: Option<PdfCmd>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum PdfCmd {
    /// Merge the given PDF files, in the order provided
    Merge {
        /// Set a filename (without extension) for the new pdf
        #[arg(short, long, value_name = "FILE_NAME")]
        name: Option<String>,
        /// Files to merge
        files: Vec<String>,
    },
    /// Copy a page range of a PDF file into a new document
    Cut {
        /// Set a filename (without extension) for the new pdf
        #[arg(short, long, value_name = "FILE_NAME")]
        name: Option<String>,
        /// File to cut
        file: String,
        /// `START` copies the page at index START, `START COUNT` copies COUNT pages from START
        #[arg(allow_negative_numbers = true, value_name = "POS")]
        positions: Vec<i64>,
    },
}

#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// Abort the whole merge on the first unreadable file instead of skipping it
    #[arg(long, global = true, env = "PDF_ATOMIC")]
    pub atomic: bool,
    /// Exit with status 1 when any validation or parse failure occurred
    #[arg(long, global = true, env = "PDF_EXIT_CODE")]
    pub exit_code: bool,
}

impl Settings {
    /// Best-effort merge: unreadable inputs are reported and left out.
    pub fn skip_bad_files(&self) -> bool {
        !self.atomic
    }
}

impl PdfCmd {
    pub fn files(&self) -> Vec<String> {
        match self {
            PdfCmd::Merge { files, .. } => files.clone(),
            PdfCmd::Cut { file, .. } => vec![file.clone()],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_merge_with_name() {
        let cli = Cli::try_parse_from(["pdf", "merge", "-n", "out", "a.pdf", "b.pdf"]).unwrap();

        assert_eq!(
            cli.cmd,
            Some(PdfCmd::Merge {
                name: Some("out".to_string()),
                files: vec!["a.pdf".to_string(), "b.pdf".to_string()],
            })
        );
        assert_eq!(cli.settings, Settings::default());
    }

    #[test]
    fn parse_cut_with_negative_position() {
        let cli = Cli::try_parse_from(["pdf", "cut", "doc.pdf", "-2", "1"]).unwrap();

        assert_eq!(
            cli.cmd,
            Some(PdfCmd::Cut {
                name: None,
                file: "doc.pdf".to_string(),
                positions: vec![-2, 1],
            })
        );
    }

    #[test]
    fn parse_settings_flags() {
        let cli = Cli::try_parse_from(["pdf", "merge", "--atomic", "--exit-code", "a.pdf"]).unwrap();

        assert!(!cli.settings.skip_bad_files());
        assert!(cli.settings.exit_code);
    }

    #[test]
    fn parse_without_subcommand() {
        let cli = Cli::try_parse_from(["pdf"]).unwrap();

        assert!(cli.cmd.is_none());
    }

    #[test]
    fn cut_requires_a_file() {
        assert!(Cli::try_parse_from(["pdf", "cut"]).is_err());
    }
}
