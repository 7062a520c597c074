use clap::{Arg, ArgAction, ArgMatches, Command};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::path::Path;
use tracing::{debug, Level};

use declcheck::formatting::{self, Identity};
use declcheck::grammar::{self, Grammar};
use declcheck::parsing;
use declcheck::rendering::Terminal;

mod output;
mod problem;

fn main() {
    const VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"));

    let matches = Command::new("declcheck")
        .version(VERSION)
        .propagate_version(true)
        .about("Check Pascal style declarations, and the LR(1) grammars describing them.")
        .disable_help_subcommand(true)
        .arg(
            Arg::new("debug")
                .long("debug")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit debug logging to standard error."),
        )
        .subcommand(
            Command::new("check")
                .about("Syntax- and semantically check the given declarations")
                .arg(
                    Arg::new("grammar")
                        .long("grammar")
                        .value_name("GRAMMAR")
                        .help("A grammar description to check before the declarations. The built in grammar of the declaration language is used if not given."),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .action(ArgAction::SetTrue)
                        .help("Report every problem found rather than only the first."),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Write the outcome as JSON to standard output."),
                )
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the declarations you want to check. Use - to read standard input."),
                ),
        )
        .subcommand(
            Command::new("grammar")
                .about("Check that a grammar description is LR(1)")
                .arg(
                    Arg::new("tables")
                        .long("tables")
                        .action(ArgAction::SetTrue)
                        .help("Show the ACTION and GOTO tables."),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Write the verdict (and tables) as JSON to standard output."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the grammar description, in JSON."),
                ),
        )
        .subcommand(
            Command::new("format")
                .about("Code format the given declarations")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes for syntax highlighting even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the declarations you want to format."),
                ),
        )
        .subcommand(
            Command::new("highlight")
                .about("Print the given declarations with syntax highlighting")
                .arg(
                    Arg::new("raw-control-chars")
                        .short('R')
                        .long("raw-control-chars")
                        .action(ArgAction::SetTrue)
                        .help("Emit ANSI escape codes even if output is redirected to a pipe or file."),
                )
                .arg(
                    Arg::new("filename")
                        .required(true)
                        .help("The file containing the declarations you want to see."),
                ),
        )
        .get_matches();

    let level = if matches.get_flag("debug") {
        Level::DEBUG
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let code = match matches.subcommand() {
        Some(("check", submatches)) => run_check(submatches),
        Some(("grammar", submatches)) => run_grammar(submatches),
        Some(("format", submatches)) => run_format(submatches),
        Some(("highlight", submatches)) => run_highlight(submatches),
        Some(_) => {
            println!("No valid subcommand was used");
            1
        }
        None => {
            println!("usage: declcheck [COMMAND] ...");
            println!("Try '--help' for more information.");
            0
        }
    };

    std::process::exit(code);
}

fn filename(submatches: &ArgMatches) -> &Path {
    match submatches.get_one::<String>("filename") {
        Some(filename) => Path::new(filename),
        None => Path::new("-"),
    }
}

/// Colour when writing to a terminal or when explicitly asked to.
fn colourful(submatches: &ArgMatches) -> bool {
    submatches.get_flag("raw-control-chars") || std::io::stdout().is_terminal()
}

fn load_grammar(filename: Option<&String>) -> Result<Grammar, i32> {
    let Some(filename) = filename else {
        return grammar::default_grammar().map_err(|error| {
            eprintln!("{}: built in grammar: {}", "error".bright_red(), error);
            1
        });
    };

    let path = Path::new(filename);
    let content = parsing::load(path).map_err(|error| {
        eprintln!("{}", problem::concise_loading_error(&error));
        1
    })?;

    grammar::from_json(&content).map_err(|error| {
        eprintln!("{}", problem::concise_grammar_error(&error, path));
        1
    })
}

fn run_check(submatches: &ArgMatches) -> i32 {
    let grammar_file = submatches.get_one::<String>("grammar");
    let description = match load_grammar(grammar_file) {
        Ok(description) => description,
        Err(code) => return code,
    };

    // the grammar is only a gate; parsing does not depend on it
    if let Err(error) = grammar::build_lr1(&description) {
        let path = Path::new(grammar_file.map_or("(built in)", String::as_str));
        eprintln!("{}", problem::concise_grammar_error(&error, path));
        return 1;
    }

    let filename = filename(submatches);
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            return 1;
        }
    };

    if submatches.get_flag("json") {
        let outcome = parsing::check(&content);
        match serde_json::to_string_pretty(&outcome) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("{}: {}", "error".bright_red(), error);
                return 1;
            }
        }
        return if outcome.ok { 0 } else { 1 };
    }

    match parsing::parse(&content) {
        Ok(program) => {
            debug!("Checked {} declarations", program.count());
            0
        }
        Err(mut errors) => {
            let all = submatches.get_flag("all");
            let message = if colourful(submatches) {
                problem::full_parsing_errors(&mut errors, all, filename, &content, &Terminal)
            } else {
                problem::full_parsing_errors(&mut errors, all, filename, &content, &Identity)
            };
            eprintln!("{}\n", message);
            1
        }
    }
}

fn run_grammar(submatches: &ArgMatches) -> i32 {
    let filename = filename(submatches);
    let description = match load_grammar(submatches.get_one::<String>("filename")) {
        Ok(description) => description,
        Err(code) => return code,
    };

    let verdict = grammar::check_lr1(&description);
    let tables = if verdict.is_lr1 && submatches.get_flag("tables") {
        grammar::build_lr1(&description).ok()
    } else {
        None
    };

    if submatches.get_flag("json") {
        let report = output::Report {
            verdict: &verdict,
            tables: tables.as_ref(),
        };
        match output::as_json(&report) {
            Ok(json) => println!("{}", json),
            Err(error) => {
                eprintln!("{}: {}", "error".bright_red(), error);
                return 1;
            }
        }
    } else if let Some(tables) = &tables {
        match output::tables_as_text(&verdict, tables) {
            Ok(text) => print!("{}", text),
            Err(error) => {
                eprintln!("{}: {}", "error".bright_red(), error);
                return 1;
            }
        }
    } else if verdict.is_lr1 {
        println!("{}: {}", "ok".bright_green(), verdict.message);
    } else if let Err(error) = grammar::build_lr1(&description) {
        eprintln!("{}", problem::concise_grammar_error(&error, filename));
    }

    if verdict.is_lr1 {
        0
    } else {
        1
    }
}

fn run_format(submatches: &ArgMatches) -> i32 {
    let filename = filename(submatches);
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            return 1;
        }
    };

    let program = match parsing::parse(&content) {
        Ok(program) => program,
        Err(errors) => {
            for error in &errors {
                eprintln!(
                    "{}",
                    problem::concise_parsing_error(error, filename, &Identity)
                );
            }
            return 1;
        }
    };

    let result = if colourful(submatches) {
        formatting::render(&Terminal, &program)
    } else {
        formatting::render(&Identity, &program)
    };
    print!("{}", result);
    0
}

fn run_highlight(submatches: &ArgMatches) -> i32 {
    let filename = filename(submatches);
    let content = match parsing::load(filename) {
        Ok(content) => content,
        Err(error) => {
            eprintln!("{}", problem::concise_loading_error(&error));
            return 1;
        }
    };

    let result = if colourful(submatches) {
        formatting::highlight(&Terminal, &content)
    } else {
        formatting::highlight(&Identity, &content)
    };
    print!("{}", result);
    0
}
