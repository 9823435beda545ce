//! Lex a Tiger source file and print its tokens
//!
//! Usage: tigerlex <file.tig> [--json] [--chunk-size N] [--preserve-whitespace]

use anyhow::{bail, Context};
use std::env;
use std::io::{self, Write};
use std::process;
use tigerlex::{lex_file, Error, LexerConfig, StringWhitespace};

struct Options {
    path: String,
    json: bool,
    config: LexerConfig,
}

fn parse_args(args: &[String]) -> anyhow::Result<Options> {
    let mut path = None;
    let mut json = false;
    let mut config = LexerConfig::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--preserve-whitespace" => {
                config = config.with_string_whitespace(StringWhitespace::Preserve)
            }
            "--chunk-size" => {
                let value = iter.next().context("--chunk-size needs a value")?;
                let size: usize = value
                    .parse()
                    .with_context(|| format!("invalid chunk size '{}'", value))?;
                config = config.with_chunk_size(size);
            }
            flag if flag.starts_with("--") => bail!("unknown option '{}'", flag),
            file => {
                if path.replace(file.to_string()).is_some() {
                    bail!("only one input file may be given");
                }
            }
        }
    }

    let path = path.context("no input file given")?;
    Ok(Options { path, json, config })
}

fn run(options: &Options) -> anyhow::Result<bool> {
    let tokens = lex_file(&options.path, &options.config)
        .with_context(|| format!("cannot open '{}'", options.path))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    for item in tokens {
        match item {
            Ok(token) if options.json => writeln!(out, "{}", serde_json::to_string(&token)?)?,
            Ok(token) => writeln!(out, "{}", token)?,
            Err(Error::Lex(err)) => {
                out.flush()?;
                eprintln!("{}", err);
                return Ok(false);
            }
            Err(err) => return Err(err).with_context(|| format!("while lexing '{}'", options.path)),
        }
    }
    Ok(true)
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            eprintln!("Usage: tigerlex <file.tig> [--json] [--chunk-size N] [--preserve-whitespace]");
            process::exit(2);
        }
    };

    match run(&options) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}
