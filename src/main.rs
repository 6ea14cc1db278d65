/*!
Main binary for http-assert.
*/

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_verbosity_flag::Verbosity;
use std::io::{self, IsTerminal, Read, stdout};
use std::{fs, path::PathBuf, process::ExitCode};

use http_assert::commands::{self, check::Check};
use http_assert::{Literal, Ordering, TypeTag, utils};

/// Assert on the JSON body of an HTTP response.
#[derive(Parser)]
#[command(name = "hassert", version, about, arg_required_else_help = true, long_about = None, disable_help_subcommand = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,
    #[command(flatten)]
    verbosity: Verbosity,
}

/// Available subcommands for `hassert`
#[derive(Subcommand)]
enum Commands {
    /// Run checks against a JSON document; exits 0 when all hold, 1 when
    /// one fails and 2 when the input is malformed
    Check(CheckArgs),
    /// Print the value a dotted path addresses
    Resolve {
        /// Dotted path, e.g. "obj.arr.0.field"
        path: String,
        #[arg(value_name = "FILE")]
        /// Optional path to JSON file. If omitted, reads from STDIN
        input: Option<PathBuf>,
        /// Do not pretty-print the JSON output, instead use compact
        #[arg(long)]
        compact: bool,
    },
    #[command(subcommand)]
    /// Generate additional documentation and/or completions
    Generate(GenerateCommand),
}

#[derive(clap::Args)]
struct CheckArgs {
    #[arg(value_name = "FILE")]
    /// Optional path to JSON file. If omitted, reads from STDIN
    input: Option<PathBuf>,
    /// PATH must resolve to a value
    #[arg(long, value_name = "PATH")]
    has: Vec<String>,
    /// Value at PATH equals VALUE (VALUE is read as JSON, else as a string)
    #[arg(long = "where", value_name = "PATH=VALUE", value_parser = commands::check::parse_expectation)]
    where_: Vec<(String, Literal)>,
    /// Value at PATH differs from VALUE
    #[arg(long, value_name = "PATH=VALUE", value_parser = commands::check::parse_expectation)]
    where_not: Vec<(String, Literal)>,
    /// Value at PATH has TYPE (int, float, string, bool, object, array-*)
    #[arg(long, value_name = "PATH=TYPE", value_parser = commands::check::parse_type_check)]
    where_type: Vec<(String, TypeTag)>,
    /// Array at PATH has N elements
    #[arg(long, value_name = "PATH=N", value_parser = commands::check::parse_length_check)]
    length: Vec<(String, usize)>,
    /// Value at PATH is greater than VALUE
    #[arg(long, value_name = "PATH=VALUE", value_parser = commands::check::parse_expectation)]
    gt: Vec<(String, Literal)>,
    /// Value at PATH is at least VALUE
    #[arg(long, value_name = "PATH=VALUE", value_parser = commands::check::parse_expectation)]
    gte: Vec<(String, Literal)>,
    /// Value at PATH is less than VALUE
    #[arg(long, value_name = "PATH=VALUE", value_parser = commands::check::parse_expectation)]
    lt: Vec<(String, Literal)>,
    /// Value at PATH is at most VALUE
    #[arg(long, value_name = "PATH=VALUE", value_parser = commands::check::parse_expectation)]
    lte: Vec<(String, Literal)>,
}

impl CheckArgs {
    /// Flatten the flags into checks, grouped by kind in declaration order.
    fn checks(self) -> Vec<Check> {
        let ordered = |values: Vec<(String, Literal)>, op: Ordering| {
            values
                .into_iter()
                .map(move |(path, value)| Check::Ord(path, op, value))
        };
        self.has
            .into_iter()
            .map(Check::Has)
            .chain(self.where_.into_iter().map(|(p, v)| Check::Where(p, v)))
            .chain(self.where_not.into_iter().map(|(p, v)| Check::WhereNot(p, v)))
            .chain(self.where_type.into_iter().map(|(p, t)| Check::WhereType(p, t)))
            .chain(self.length.into_iter().map(|(p, n)| Check::Length(p, n)))
            .chain(ordered(self.gt, Ordering::Gt))
            .chain(ordered(self.gte, Ordering::Gte))
            .chain(ordered(self.lt, Ordering::Lt))
            .chain(ordered(self.lte, Ordering::Lte))
            .collect()
    }
}

/// Generate shell completions and man page
#[derive(Subcommand)]
enum GenerateCommand {
    /// Generate shell completions for the given shell to stdout.
    Shell { shell: clap_complete::Shell },
    /// Generate a man page for hassert to output directory if specified, else
    /// the current directory.
    Man {
        /// The output directory to write the man pages.
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
}

/// Read the document from `input`, or from STDIN when it is piped in.
/// Returns `None` when there is nothing to read.
fn read_input(input: Option<PathBuf>) -> Result<Option<Vec<u8>>> {
    if let Some(path) = input {
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read file {}", path.display()))?;
        return Ok(Some(bytes));
    }
    if io::stdin().is_terminal() {
        return Ok(None);
    }
    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;
    Ok(Some(buffer))
}

fn run(args: Args) -> Result<ExitCode> {
    match args.command {
        Commands::Check(check) => {
            let Some(body) = read_input(check.input.clone())? else {
                Args::command().print_help()?;
                return Ok(ExitCode::from(2));
            };
            let checks = check.checks();
            let chain = commands::check::evaluate(&body, &checks);
            let state = chain.into_state();
            utils::write_verdict(&mut stdout().lock(), &state, checks.len())?;
            Ok(match state {
                http_assert::AssertionState::Holding => ExitCode::SUCCESS,
                http_assert::AssertionState::Failed { .. } => ExitCode::from(1),
                http_assert::AssertionState::Fatal(_) => ExitCode::from(2),
            })
        }
        Commands::Resolve {
            path,
            input,
            compact,
        } => {
            let Some(body) = read_input(input)? else {
                Args::command().print_help()?;
                return Ok(ExitCode::from(2));
            };
            let found = commands::resolve::print_resolved(
                &mut stdout().lock(),
                &body,
                &path,
                !compact,
            )?;
            Ok(if found { ExitCode::SUCCESS } else { ExitCode::from(1) })
        }
        Commands::Generate(cmd) => {
            match cmd {
                GenerateCommand::Shell { shell } => {
                    commands::generate::write_completions(
                        shell,
                        &mut Args::command(),
                        &mut stdout().lock(),
                    );
                }
                GenerateCommand::Man { output_dir } => {
                    let written = commands::generate::generate_man_pages(
                        &Args::command(),
                        output_dir,
                    )?;
                    for path in written {
                        println!("Generated: {}", path.display());
                    }
                }
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Entry point for main binary.
///
/// Parses the command line, sets up logging from the verbosity flags and runs
/// the subcommand. Errors are reported on STDERR with exit code 2 so they are
/// distinguishable from a failed check.
fn main() -> ExitCode {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbosity.log_level_filter())
        .init();

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(2)
        }
    }
}
