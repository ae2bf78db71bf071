use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use tracing_subscriber::EnvFilter;

use keyquill::config::Config;
use keyquill::value::Value;

/// keyquill - query and edit JSON documents with keypath expressions
#[derive(Parser)]
#[command(name = "keyquill")]
#[command(version)]
#[command(about = "Query and edit JSON documents with keypath expressions", long_about = None)]
struct Cli {
    /// Create missing intermediate objects on writes
    #[arg(long)]
    force: bool,

    /// Disable the tokenized-program cache
    #[arg(long)]
    no_cache: bool,

    /// Treat paths as plain separator-split segments
    #[arg(long)]
    simple: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a keypath against a JSON document
    Get {
        /// JSON file to read ("-" for stdin)
        file: String,
        /// Keypath expression
        path: String,
        /// Extra arguments for placeholder/context tokens (JSON values)
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Write a value at a keypath and print the resulting document
    Set {
        /// JSON file to read ("-" for stdin)
        file: String,
        /// Keypath expression
        path: String,
        /// Value to write (JSON, or a bare string)
        value: String,
        /// Extra arguments for placeholder/context tokens (JSON values)
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Rewrite the file instead of printing to stdout
        #[arg(short, long)]
        in_place: bool,
    },
    /// Locate a value inside a JSON document
    Find {
        /// JSON file to read ("-" for stdin)
        file: String,
        /// Value to search for (JSON, or a bare string)
        value: String,
        /// Print every matching path, not just the first
        #[arg(long)]
        all: bool,
    },
    /// Check whether a keypath is well-formed under the active grammar
    Check {
        /// Keypath expression
        path: String,
    },
    /// Escape a literal key so it survives tokenization unchanged
    Escape {
        /// Literal text to escape
        text: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = Config::load();
    let mut engine = config
        .build_engine()
        .context("Invalid syntax overrides in config file")?;
    if cli.force {
        engine.set_force(true);
    }
    if cli.no_cache {
        engine.set_cache(false);
    }
    if cli.simple {
        engine.set_simple(true, config.separator);
    }

    match cli.command {
        Command::Get { file, path, args } => {
            let root = load_document(&file)?;
            let args = parse_args(&args);
            match engine.get(&root, &path, &args) {
                Some(value) => {
                    println!("{}", to_json(&value)?);
                    Ok(())
                }
                None => anyhow::bail!("Path '{}' resolved to nothing", path),
            }
        }
        Command::Set {
            file,
            path,
            value,
            args,
            in_place,
        } => {
            let mut root = load_document(&file)?;
            let new = parse_value(&value);
            let args = parse_args(&args);
            if !engine.set(&mut root, &path, &new, &args) {
                anyhow::bail!("Path '{}' is not writable in this document", path);
            }
            let output = to_json(&root)?;
            if in_place && file != "-" {
                std::fs::write(&file, output + "\n")
                    .with_context(|| format!("Failed to write file: {}", file))?;
            } else {
                println!("{}", output);
            }
            Ok(())
        }
        Command::Find { file, value, all } => {
            let root = load_document(&file)?;
            let target = parse_value(&value);
            if all {
                match engine.find_all(&root, &target) {
                    Some(paths) => {
                        for path in paths {
                            println!("{}", path);
                        }
                        Ok(())
                    }
                    None => anyhow::bail!("Value not found"),
                }
            } else {
                match engine.find(&root, &target) {
                    Some(path) => {
                        println!("{}", path);
                        Ok(())
                    }
                    None => anyhow::bail!("Value not found"),
                }
            }
        }
        Command::Check { path } => {
            if engine.is_valid(&path) {
                println!("ok");
                Ok(())
            } else {
                anyhow::bail!("Path '{}' is not well-formed", path);
            }
        }
        Command::Escape { text } => {
            println!("{}", engine.escape(&text));
            Ok(())
        }
    }
}

/// Reads a JSON document from a file, or from stdin when the name is "-".
fn load_document(file: &str) -> Result<Value> {
    let contents = if file == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(file).with_context(|| format!("Failed to read file: {}", file))?
    };
    let json: serde_json::Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON: {}", file))?;
    Ok(json.into())
}

/// Parses a command-line value as JSON, falling back to a bare string.
fn parse_value(text: &str) -> Value {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => json.into(),
        Err(_) => Value::String(text.to_string()),
    }
}

fn parse_args(args: &[String]) -> Vec<Value> {
    args.iter().map(|a| parse_value(a)).collect()
}

fn to_json(value: &Value) -> Result<String> {
    let json: serde_json::Value = value.into();
    serde_json::to_string_pretty(&json).context("Failed to serialize JSON")
}
