use clap::value_parser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;

use trm2devregs::parsing::{self, parser::DEFAULT_FOOTER, Parser};
use trm2devregs::{devregs, output, svd};

mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("trm2devregs")
        .version(VERSION)
        .propagate_version(true)
        .about("Extract hardware register descriptions into the devregs format.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Log progress to standard error. Repeat for more detail."),
        )
        .subcommand(
            Command::new("extract")
                .about("Parse register descriptions from pages of a Technical Reference Manual")
                .arg(
                    Arg::new("footer")
                        .long("footer")
                        .value_name("REGEX")
                        .default_value(DEFAULT_FOOTER)
                        .help("Pattern matching the vendor footer line in the boilerplate where a table continues on the next page."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The manual, either a PDF or text already extracted from one with pages separated by form feeds."),
                )
                .arg(
                    Arg::new("start")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("First page in the manual to parse."),
                )
                .arg(
                    Arg::new("end")
                        .required(true)
                        .value_parser(value_parser!(usize))
                        .help("Last page in the manual to parse."),
                ),
        )
        .subcommand(
            Command::new("svd")
                .about("Convert a CMSIS-SVD peripheral description")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write the devregs lines to this file rather than standard output."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The SVD file to convert."),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Validate a devregs data file")
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The devregs data file to check."),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("extract", submatches)) => {
            setup_logging(submatches);

            let filename = string_argument(submatches, "filename");
            let footer = string_argument(submatches, "footer");
            let start = submatches
                .get_one::<usize>("start")
                .copied()
                .unwrap_or_default();
            let end = submatches
                .get_one::<usize>("end")
                .copied()
                .unwrap_or_default();

            extract(Path::new(filename), start, end, footer);
        }
        Some(("svd", submatches)) => {
            setup_logging(submatches);

            let filename = string_argument(submatches, "filename");
            let target = submatches
                .get_one::<String>("output")
                .map(Path::new);

            convert(Path::new(filename), target);
        }
        Some(("check", submatches)) => {
            setup_logging(submatches);

            let filename = string_argument(submatches, "filename");

            check(Path::new(filename));
        }
        Some(_) => {
            println!("No valid subcommand was used")
        }
        None => {
            println!("usage: trm2devregs [COMMAND] ...");
            println!("Try '--help' for more information.");
        }
    }
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches.get_count("verbose") {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        _ => LevelFilter::DEBUG,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

// Arguments looked up here are required or have defaults, so clap has
// already rejected the command line if they are absent.
fn string_argument<'m>(matches: &'m ArgMatches, id: &str) -> &'m str {
    matches
        .get_one::<String>(id)
        .map(String::as_str)
        .unwrap_or_default()
}

fn extract(filename: &Path, start: usize, end: usize, footer: &str) {
    let parser = match Parser::with_footer(footer) {
        Ok(parser) => parser,
        Err(error) => {
            eprintln!(
                "{}: invalid footer pattern: {}",
                "error".bright_red(),
                error
            );
            std::process::exit(1);
        }
    };

    let content = match parsing::load(filename, start, end) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    let registers = match parsing::extract(&parser, &content) {
        Ok(registers) => registers,
        Err(error) => {
            eprintln!(
                "{}",
                problem::full_parsing_error(&error, filename, &content)
            );
            std::process::exit(1);
        }
    };

    info!("Extracted {} registers", registers.len());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(error) = output::emit(&mut out, &registers) {
        debug!(?error);
        eprintln!("{}: writing output: {}", "error".bright_red(), error);
        std::process::exit(1);
    }
}

fn convert(filename: &Path, target: Option<&Path>) {
    let device = match svd::load(filename) {
        Ok(device) => device,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            std::process::exit(1);
        }
    };

    let result = svd::render(&device);

    let written = match target {
        Some(path) => std::fs::write(path, &result),
        None => std::io::stdout()
            .lock()
            .write_all(result.as_bytes()),
    };

    match written {
        Ok(()) => {
            if let Some(path) = target {
                info!("SVD file {} generated", path.display());
            }
        }
        Err(error) => {
            eprintln!("{}: writing output: {}", "error".bright_red(), error);
            std::process::exit(1);
        }
    }
}

fn check(filename: &Path) {
    let content = match std::fs::read_to_string(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!(
                "{}: {}: {}",
                "error".bright_red(),
                filename.display(),
                error
            );
            std::process::exit(1);
        }
    };

    match devregs::parse(&content) {
        Ok(file) => {
            info!(
                "{} registers, {} fields, {} field sets",
                file.registers
                    .len(),
                file.field_count(),
                file.field_sets
                    .len()
            );
        }
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", problem::data_error(error, filename));
            }
            std::process::exit(1);
        }
    }
}
