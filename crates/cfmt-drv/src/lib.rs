//! `cfmt-drv` — the command-line driver.
//!
//! This crate is deliberately thin: it owns process-level concerns (CLI
//! flags, file I/O, exit codes) and hands the source text to
//! [`cfmt_lex::Lexer`] for tokenization. Diff rendering, in-place
//! rewriting, and document-IR execution are out of scope here — wiring
//! those in is `cfmt-doc`/`cfmt-ruler`'s job once they grow past their
//! interface stubs.

use std::fs;
use std::path::{Path, PathBuf};

use cfmt_lex::{LexError, Lexer, TokenKind};
use thiserror::Error;

/// Knobs a formatting run is configured with. Only `path` and `verbose`
/// currently influence lexing; the rest describe the surface a full
/// driver would read once layout (`cfmt-doc`) and column alignment
/// (`cfmt-ruler`) are wired in.
#[derive(Debug, Clone)]
pub struct Config {
    /// File to read and tokenize.
    pub path: PathBuf,
    /// Print the `fun:line:` prefix on diagnostic lines (see
    /// [`cfmt_lex::format_expect_mismatch`]).
    pub verbose: bool,
    /// Width of one tab stop, for column accounting downstream of lexing.
    pub tab_width: u32,
    /// Hard line-length ceiling a real layout pass would wrap at.
    pub max_width: u32,
    /// Preferred (soft) line-length layout aims for before `max_width`.
    pub soft_width: u32,
    /// Print a diff instead of reformatted output.
    pub diff: bool,
    /// Rewrite the file in place instead of printing to stdout.
    pub in_place: bool,
    /// Check mode: exit non-zero if the file is not already formatted,
    /// write nothing.
    pub check: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            verbose: false,
            tab_width: 4,
            max_width: 100,
            soft_width: 80,
            diff: false,
            in_place: false,
            check: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One lexical error found while tokenizing, located for a diagnostic
/// line.
#[derive(Debug, Clone)]
pub struct LexErrorReport {
    pub line: u32,
    pub column: u32,
    pub lexeme: String,
}

/// Outcome of tokenizing one file: the token count reached and any
/// lexical errors latched along the way.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub path: PathBuf,
    pub token_count: usize,
    pub errors: Vec<LexErrorReport>,
}

impl RunReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Read `config.path` and tokenize it, collecting the location of every
/// [`TokenKind::Error`] token the lexer latched.
pub fn run(config: &Config) -> Result<RunReport, DriverError> {
    tokenize_source(&config.path, &read_file(&config.path)?, config.verbose)
}

fn read_file(path: &Path) -> Result<Vec<u8>, DriverError> {
    fs::read(path).map_err(|source| DriverError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn tokenize_source(path: &Path, source: &[u8], verbose: bool) -> Result<RunReport, DriverError> {
    let display_path = path.to_string_lossy().into_owned();
    let mut lexer = Lexer::new(source.to_vec(), display_path, verbose);
    let mut cursor = lexer.cursor();

    let mut errors = Vec::new();
    loop {
        let id = match cursor.pop() {
            Ok(id) => id,
            Err(LexError::BranchPending) => {
                if cursor.recover() {
                    continue;
                }
                break;
            }
            Err(_) => break,
        };
        let tok = cursor.data(id);
        if tok.kind == TokenKind::Eof {
            break;
        }
        if tok.kind == TokenKind::Error {
            errors.push(LexErrorReport {
                line: tok.line,
                column: tok.column,
                lexeme: cursor.lexeme(id).unwrap_or("").to_string(),
            });
        }
    }

    Ok(RunReport {
        path: path.to_path_buf(),
        token_count: lexer.token_count(),
        errors,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn run_tokenizes_a_well_formed_file() {
        let file = write_temp("int x = 1;\n");
        let config = Config {
            path: file.path().to_path_buf(),
            ..Config::default()
        };
        let report = run(&config).unwrap();
        assert!(!report.has_errors());
        assert!(report.token_count > 0);
    }

    #[test]
    fn run_reports_an_unterminated_string_literal() {
        let file = write_temp("char *s = \"oops;\n");
        let config = Config {
            path: file.path().to_path_buf(),
            ..Config::default()
        };
        let report = run(&config).unwrap();
        assert!(report.has_errors());
    }

    #[test]
    fn run_recovers_through_an_if_else_branch_instead_of_truncating() {
        // Without calling `cursor.recover()` on `LexError::BranchPending`,
        // tokenization would halt at `#else` and never reach the
        // unterminated string literal that follows `#endif`.
        let file = write_temp("#if A\nint x;\n#else\nlong x;\n#endif\nchar *s = \"oops;\n");
        let config = Config {
            path: file.path().to_path_buf(),
            ..Config::default()
        };
        let report = run(&config).unwrap();
        assert!(report.has_errors());
    }

    #[test]
    fn run_surfaces_io_errors_for_a_missing_file() {
        let config = Config {
            path: PathBuf::from("/nonexistent/path/does-not-exist.c"),
            ..Config::default()
        };
        assert!(run(&config).is_err());
    }
}
