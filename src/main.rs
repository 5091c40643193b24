//! CLI tool to format SQL files.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use sqlindent::{Encoding, FormatOptions, LetterCase, OutputFormat};

#[derive(Parser)]
#[command(name = "sqlindent")]
#[command(about = "Format SQL statements")]
#[command(version)]
#[allow(clippy::struct_excessive_bools)]
struct Cli {
    /// Files to format; `-` reads standard input
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Write the output to this file instead of standard output
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Report files that are not formatted instead of printing them
    #[arg(long)]
    check: bool,

    /// Encoding of the input files and of the output file
    #[arg(long, default_value_t = Encoding::Utf8)]
    encoding: Encoding,

    /// Put clauses on their own lines and indent nested statements
    #[arg(short, long)]
    reindent: bool,

    /// Right-align clause keywords against the end of SELECT
    #[arg(short = 'a', long)]
    reindent_aligned: bool,

    /// Columns per indentation level
    #[arg(long, default_value_t = 2)]
    indent_width: usize,

    /// Indent with tabs
    #[arg(long)]
    indent_tabs: bool,

    /// Start one level deep
    #[arg(long)]
    indent_after_first: bool,

    /// Put every selected column on its own line
    #[arg(long)]
    indent_columns: bool,

    /// Wrap column lists after this many characters; 0 never wraps
    #[arg(long, default_value_t = 0)]
    wrap_after: usize,

    /// Start continuation lines of lists with the comma
    #[arg(long)]
    comma_first: bool,

    /// Skip optional line breaks
    #[arg(long)]
    compact: bool,

    /// Change the case of keywords: upper, lower or capitalize
    #[arg(short, long, value_name = "CASE")]
    keywords: Option<LetterCase>,

    /// Change the case of identifiers: upper, lower or capitalize
    #[arg(short, long, value_name = "CASE")]
    identifiers: Option<LetterCase>,

    /// Output language: sql, python or php
    #[arg(short = 'l', long, value_name = "LANG")]
    language: Option<OutputFormat>,

    /// Cut string literals longer than this many characters
    #[arg(long, value_name = "WIDTH")]
    truncate_strings: Option<usize>,

    /// Marker appended to truncated strings
    #[arg(long, default_value = "[...]")]
    truncate_char: String,

    /// Remove comments
    #[arg(long)]
    strip_comments: bool,

    /// Put spaces around operators
    #[arg(short = 's', long)]
    spaces_around_operators: bool,

    /// Collapse runs of whitespace
    #[arg(long)]
    strip_whitespace: bool,
}

impl Cli {
    fn options(&self) -> FormatOptions {
        let mut options = FormatOptions::new()
            .reindent(self.reindent)
            .reindent_aligned(self.reindent_aligned)
            .indent_width(self.indent_width)
            .indent_tabs(self.indent_tabs)
            .indent_after_first(self.indent_after_first)
            .indent_columns(self.indent_columns)
            .wrap_after(self.wrap_after)
            .comma_first(self.comma_first)
            .compact(self.compact)
            .strip_comments(self.strip_comments)
            .use_space_around_operators(self.spaces_around_operators)
            .strip_whitespace(self.strip_whitespace)
            .truncate_char(self.truncate_char.as_str());
        if let Some(case) = self.keywords {
            options = options.keyword_case(case);
        }
        if let Some(case) = self.identifiers {
            options = options.identifier_case(case);
        }
        if let Some(format) = self.language {
            options = options.output_format(format);
        }
        if let Some(width) = self.truncate_strings {
            options = options.truncate_strings(width);
        }
        options
    }
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr).with_target(false))
        .with(EnvFilter::from_default_env())
        .init();
}

fn read_source(path: &Path, encoding: Encoding) -> io::Result<String> {
    let bytes = if path == Path::new("-") {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes)?;
        bytes
    } else {
        fs::read(path)?
    };
    encoding
        .decode(&bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

fn write_output(path: Option<&Path>, output: &str, encoding: Encoding) -> io::Result<()> {
    match path {
        Some(path) => {
            let bytes = encoding
                .encode(output)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            fs::write(path, bytes)
        }
        None => io::stdout().write_all(output.as_bytes()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let options = match cli.options().validate() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(2);
        }
    };

    let mut had_error = false;
    let mut output = String::new();

    for path in &cli.files {
        let name = path.display();
        let content = match read_source(path, cli.encoding) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{name}: {e}");
                had_error = true;
                continue;
            }
        };

        let formatted = match sqlindent::format(&content, &options) {
            Ok(f) => f,
            Err(e) => {
                eprintln!("Error: {e}");
                return ExitCode::from(2);
            }
        };

        if cli.check {
            if formatted == content.trim_end_matches(['\r', '\n']) {
                eprintln!("{name}: formatted");
            } else {
                eprintln!("{name}: not formatted");
                had_error = true;
            }
        } else {
            output.push_str(&formatted);
            output.push('\n');
        }
    }

    if !cli.check {
        if let Err(e) = write_output(cli.outfile.as_deref(), &output, cli.encoding) {
            eprintln!("Error: {e}");
            had_error = true;
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
