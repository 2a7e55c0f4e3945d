#![deny(
    warnings,
    missing_debug_implementations,
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
//! `pathfind` - Recursive file and directory name search.

use std::io::{self, ErrorKind, Write};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_cargo::style::CLAP_STYLING;
use env_logger::{Builder, Env, Logger, Target as LogTarget};
use log::{Level, LevelFilter, Log, Metadata, debug};
use pathfind::options::{parse_max_results, split_directories};
use pathfind::types::VERSION_INFO;
use pathfind::{Error, MatchMode, OutputFormat, Result, Roots, Search, SearchOptions, Target};

const NOTES: &str = "\
Note:
* Default behaviour is to look for directories (specify -f for files)
* Fuzzy-search matches a string such as 'aoa' with 'anaconda'
* If neither -e, -z, -p, or -s are specified, wildcards can be used for matching
* Each additional search directory must be specified with a separate -d flag
  (multiple directories can be included by separating them with a ':' or ';')
* Without -d the current directory is searched first, then the whole filesystem
* Warnings (enabled with the -w flag) may occur with insufficient permissions";

/// CLI arguments for `pathfind`
#[derive(Parser, Debug)]
#[command(
    name = "pathfind",
    about,
    styles = CLAP_STYLING,
    disable_help_flag = true,
    disable_version_flag = true,
    args_override_self = true,
    after_help = NOTES
)]
struct Cli {
    /// Include DIRECTORY
    #[arg(short = 'd', short_alias = 'D', value_name = "DIRECTORY")]
    directories: Vec<String>,

    /// Look for files
    #[arg(short = 'f', short_alias = 'F')]
    files: bool,

    /// First MAX results only
    #[arg(short = 'n', short_alias = 'N', value_name = "MAX")]
    max: Option<String>,

    /// Case-sensitive
    #[arg(short = 'c', short_alias = 'C')]
    case_sensitive: bool,

    /// Exact-match mode
    #[arg(short = 'e', short_alias = 'E')]
    exact: bool,

    /// Fuzzy-search mode
    #[arg(short = 'z', short_alias = 'Z')]
    fuzzy: bool,

    /// Prefix-search mode
    #[arg(short = 'p', short_alias = 'P')]
    prefix: bool,

    /// Suffix-search mode
    #[arg(short = 's', short_alias = 'S')]
    suffix: bool,

    /// Quote embedded spaces
    #[arg(short = 'q', short_alias = 'Q')]
    quote: bool,

    /// Print on a single line
    #[arg(short = 'x', short_alias = 'X')]
    xargs: bool,

    /// Warnings on
    #[arg(short = 'w', short_alias = 'W')]
    warnings: bool,

    /// Print version
    #[arg(short = 'v', short_alias = 'V')]
    version: bool,

    /// Print this help
    #[arg(short = 'h', short_alias = 'H')]
    help: bool,

    /// Names to look for
    #[arg(value_name = "NEEDLE")]
    needles: Vec<String>,
}

impl Cli {
    /// Build the search options, rejecting inconsistent switches
    fn options(&self) -> Result<SearchOptions> {
        let max_results = self.max.as_deref().map(parse_max_results).transpose()?;
        let mode = MatchMode::from_flags(self.exact, self.fuzzy, self.prefix, self.suffix)?;

        Ok(SearchOptions {
            case_sensitive: self.case_sensitive,
            mode,
            target: if self.files { Target::Files } else { Target::Directories },
            max_results,
            format: OutputFormat { single_line: self.xargs, quote_spaces: self.quote },
            warnings: self.warnings,
        })
    }

    /// The roots given with `-d`, or the default sweep
    fn roots(&self) -> Roots {
        Roots::from_list(self.directories.iter().flat_map(|value| split_directories(value)).collect())
    }
}

/// Print the version banner and usage to stderr
fn usage() -> ExitCode {
    eprintln!("{VERSION_INFO}");
    eprintln!("{}", Cli::command().render_help());
    ExitCode::FAILURE
}

/// Send log records to stderr as `Warning: ...` / `Error: ...`
fn setup_logging() -> std::result::Result<(), log::SetLoggerError> {
    let env = || Env::default().default_filter_or("warn");
    let mut builder = Builder::from_env(env());

    // RUST_LOG may add verbosity, but never hides warnings or root errors
    let warnings = Metadata::builder().level(Level::Warn).target("pathfind::search").build();
    if !Logger::from_env(env()).enabled(&warnings) {
        builder.filter_module("pathfind", LevelFilter::Warn);
    }

    builder.format(|buf, record| {
        let label = match record.level() {
            Level::Error => "Error",
            Level::Warn => "Warning",
            Level::Info => "Info",
            Level::Debug => "Debug",
            Level::Trace => "Trace",
        };
        writeln!(buf, "{label}: {}", record.args())
    });
    builder.target(LogTarget::Stderr);

    builder.try_init()
}

/// Run the search described by the command line
fn run(cli: &Cli, options: &SearchOptions) -> Result<()> {
    let search = Search::new(options, &cli.needles)?;
    let roots = cli.roots();

    // Stdout stays line buffered so records stream as they are found
    let summary = search.run(&roots, io::stdout().lock())?;
    debug!(
        "{} results ({} directories searched, {} unreadable, {} roots skipped{})",
        summary.results,
        summary.walk.directories,
        summary.walk.unreadable,
        summary.skipped_roots,
        if summary.capped { ", stopped at limit" } else { "" }
    );

    Ok(())
}

fn main() -> ExitCode {
    if std::env::args_os().len() <= 1 {
        return usage();
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return usage();
        },
    };
    if cli.help {
        return usage();
    }
    if cli.version {
        eprintln!("{VERSION_INFO}");
    }

    if let Err(e) = setup_logging() {
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }

    let result = cli.options().and_then(|options| run(&cli, &options));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Output piped into a command that exited early
        Err(Error::Io(e)) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.user_message());
            if e.is_usage_error() { usage() } else { ExitCode::FAILURE }
        },
    }
}
