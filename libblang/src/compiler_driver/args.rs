// Copyright 2025-2026 Neil Henderson
//
//! The `args` module defines the command-line argument parser.
//! Although crates like `clap` are excellent, the driver's surface is small and we have a design
//! goal of no third-party dependencies for the blang library and executable, so blang uses a
//! custom argument parser.

use crate::codegen::Target;

use super::DriverOptions;

/// The outcome of parsing the command line.
#[derive(Debug)]
pub enum ParsedCommandLine {
    /// Compile the given source file with the given options.
    Compile(String, DriverOptions),

    /// There is nothing further to do, e.g. after `-h` or `-t list`. Exit successfully.
    Exit,

    /// A usage error was reported to stderr. Exit with a failure code.
    Error,
}

/// The command-line argument parser.
pub struct Parser {
    tokens: std::vec::IntoIter<String>,
    options: DriverOptions,
    source_file: Option<String>,
}

impl Parser {
    /// Parses the process command-line arguments.
    pub fn parse_command_line_args() -> ParsedCommandLine {
        let mut args = std::env::args();
        _ = args.next(); // Skip program name
        Parser::parse_args(args.collect())
    }

    /// Parses the given arguments (program name already removed).
    pub fn parse_args(args: Vec<String>) -> ParsedCommandLine {
        let mut parser = Parser {
            tokens: args.into_iter(),
            options: DriverOptions::default(),
            source_file: None,
        };

        while let Some(token) = parser.take_next() {
            match token.as_str() {
                "-h" | "-help" | "--help" => {
                    print_help();
                    return ParsedCommandLine::Exit;
                }

                "-V" | "--version" => {
                    print_version();
                    return ParsedCommandLine::Exit;
                }

                "-o" => {
                    let Some(value) = parser.take_next() else {
                        eprintln!("error: Option '-o' requires an output path");
                        return ParsedCommandLine::Error;
                    };
                    parser.options.output_file = Some(value);
                }

                "-t" => {
                    let Some(value) = parser.take_next() else {
                        eprintln!("error: Option '-t' requires a target name");
                        return ParsedCommandLine::Error;
                    };

                    if value == "list" {
                        for target in Target::ALL {
                            println!("{target}");
                        }
                        return ParsedCommandLine::Exit;
                    }

                    let Some(target) = Target::from_name(&value) else {
                        eprintln!("error: Unknown target '{value}'. Use '-t list' to see the recognised targets.");
                        return ParsedCommandLine::Error;
                    };
                    parser.options.target = target;
                }

                _ if token.starts_with('-') => {
                    eprintln!("error: Unknown option '{token}'");
                    return ParsedCommandLine::Error;
                }

                // Must be the positional input file
                _ => {
                    if parser.source_file.is_some() {
                        eprintln!("error: More than one input file specified");
                        return ParsedCommandLine::Error;
                    }
                    parser.source_file = Some(token);
                }
            }
        }

        match parser.source_file {
            Some(source_file) => ParsedCommandLine::Compile(source_file, parser.options),
            None => {
                print_help();
                eprintln!("error: No input file provided");
                ParsedCommandLine::Error
            }
        }
    }

    /// Takes the next token from the stream and returns it.
    fn take_next(&mut self) -> Option<String> {
        self.tokens.next()
    }
}

fn print_help() {
    println!("Usage: blang [options] <input.b>");
    println!();
    println!("Options:");
    println!("  -o <path>      Write the output to <path> (default: input base name with '.ir')");
    println!("  -t <target>    Select the compilation target (default: 'ir'; 'list' prints them)");
    println!("  -h, -help      Print this help");
    println!("  -V, --version  Print the version");
}

fn print_version() {
    println!("blang {}", env!("CARGO_PKG_VERSION"));
}
