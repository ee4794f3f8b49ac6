//! `cfmt` — tokenizes a C source file and reports lexical errors.
//!
//! Reformatting, diffing, and in-place rewriting are not implemented here
//! yet; those need `cfmt-doc`'s layout and `cfmt-ruler`'s column alignment
//! to be more than interface stubs.

use std::process::ExitCode;

use clap::Parser as ClapParser;

use cfmt_drv::Config;

#[derive(ClapParser, Debug)]
#[command(name = "cfmt", about = "A C source formatter")]
struct Args {
    /// File to format.
    file: std::path::PathBuf,

    /// Print verbose diagnostic prefixes (function:line).
    #[arg(short, long)]
    verbose: bool,

    /// Width of one tab stop.
    #[arg(long, default_value_t = 4)]
    tab_width: u32,

    /// Hard line-length ceiling.
    #[arg(long, default_value_t = 100)]
    max_width: u32,

    /// Preferred line-length before the hard ceiling.
    #[arg(long, default_value_t = 80)]
    soft_width: u32,

    /// Print a diff instead of reformatted output.
    #[arg(long)]
    diff: bool,

    /// Rewrite the file in place.
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,

    /// Exit non-zero if the file isn't already formatted; write nothing.
    #[arg(long)]
    check: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config {
        path: args.file,
        verbose: args.verbose,
        tab_width: args.tab_width,
        max_width: args.max_width,
        soft_width: args.soft_width,
        diff: args.diff,
        in_place: args.in_place,
        check: args.check,
    };

    let report = match cfmt_drv::run(&config) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err}");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        path = %report.path.display(),
        tokens = report.token_count,
        "tokenized"
    );

    for err in &report.errors {
        eprintln!(
            "{}:{}:{}: lex error near \"{}\"",
            report.path.display(),
            err.line,
            err.column,
            err.lexeme
        );
    }

    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
