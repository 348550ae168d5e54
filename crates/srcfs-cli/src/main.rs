//! srcfs command-line driver
//!
//! Configures a sandboxed [`FileReader`] from flags or a JSON config file and
//! runs source-unit naming, read callbacks or source injection through it.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use srcfs_core::{CallbackKind, FileReader, ReaderConfig};
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "srcfs", version, about = "Sandboxed source loading for compilers")]
struct Cli {
    /// Root that source unit names are relative to, searched first
    #[arg(long, global = true)]
    base_path: Option<PathBuf>,

    /// Extra search root consulted after the base path (repeatable)
    #[arg(long = "include-path", global = true)]
    include_paths: Vec<PathBuf>,

    /// Comma-separated directories that reads may access
    #[arg(long, value_delimiter = ',', global = true)]
    allow_paths: Vec<PathBuf>,

    /// JSON reader configuration; flags are applied on top of it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the source unit name of each path
    Names { paths: Vec<PathBuf> },

    /// Resolve source unit names through the read callback
    Read { names: Vec<String> },

    /// Load files and optionally stdin into the source registry and print it
    Load {
        /// Also read standard input as `<stdin>`
        #[arg(long)]
        stdin: bool,
        paths: Vec<PathBuf>,
    },
}

fn build_reader(cli: &Cli) -> Result<FileReader> {
    let mut config = match &cli.config {
        Some(path) => ReaderConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {:?}", path))?,
        None => ReaderConfig::default(),
    };

    if let Some(base_path) = &cli.base_path {
        config.base_path = base_path.clone();
    }
    config.include_paths.extend(cli.include_paths.iter().cloned());
    config.allowed_directories.extend(cli.allow_paths.iter().cloned());
    debug!("Reader config: {:?}", config);

    FileReader::from_config(&config).context("Invalid reader configuration")
}

fn run(reader: &mut FileReader, command: Command, stdin: impl Read) -> Result<Value> {
    match command {
        Command::Names { paths } => Ok(paths
            .iter()
            .map(|path| {
                json!({
                    "path": path,
                    "sourceUnitName": reader.cli_path_to_source_unit_name(path),
                })
            })
            .collect()),
        Command::Read { names } => {
            let mut callback = reader.reader();
            Ok(names
                .iter()
                .map(|name| {
                    json!({
                        "sourceUnitName": name,
                        "result": callback(CallbackKind::ReadFile.as_str(), name),
                    })
                })
                .collect())
        }
        Command::Load { stdin: read_stdin, paths } => {
            for path in &paths {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
                reader.set_source(path, source);
            }
            if read_stdin {
                let mut source = String::new();
                let mut stdin = stdin;
                stdin
                    .read_to_string(&mut source)
                    .context("Failed to read standard input")?;
                reader.set_stdin(source);
            }
            Ok(serde_json::to_value(reader.source_units())?)
        }
    }
}

fn main() -> Result<()> {
    // Initialize logging; stdout carries the JSON output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    info!("srcfs v{}", env!("CARGO_PKG_VERSION"));

    let mut reader = build_reader(&cli)?;
    let output = run(&mut reader, cli.command, std::io::stdin())?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("srcfs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_flags_are_global() {
        let cli = parse(&["read", "--base-path", "/p", "--allow-paths", "/a,/b", "x.sol"]);
        assert_eq!(cli.base_path, Some(PathBuf::from("/p")));
        assert_eq!(cli.allow_paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
        assert!(matches!(cli.command, Command::Read { ref names } if names == &["x.sol"]));
    }

    #[test]
    fn test_include_path_without_base_path_is_rejected() {
        let cli = parse(&["--include-path", "/libs", "names"]);
        assert!(build_reader(&cli).is_err());
    }

    #[test]
    fn test_names_and_read() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.sol"), "A").unwrap();
        let base = dir.path().to_str().unwrap();

        let cli = parse(&["--base-path", base, "names"]);
        let mut reader = build_reader(&cli).unwrap();
        let names = run(
            &mut reader,
            Command::Names {
                paths: vec![dir.path().join("a.sol")],
            },
            std::io::empty(),
        )
        .unwrap();
        assert_eq!(names[0]["sourceUnitName"], "a.sol");

        let read = run(
            &mut reader,
            Command::Read {
                names: vec!["a.sol".into(), "missing.sol".into()],
            },
            std::io::empty(),
        )
        .unwrap();
        assert_eq!(read[0]["result"], json!({"status": "success", "content": "A"}));
        assert_eq!(read[1]["result"]["status"], "failure");
    }

    #[test]
    fn test_load_with_stdin() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("b.sol");
        std::fs::write(&file, "B").unwrap();

        let cli = parse(&["--base-path", dir.path().to_str().unwrap(), "load"]);
        let mut reader = build_reader(&cli).unwrap();
        let loaded = run(
            &mut reader,
            Command::Load {
                stdin: true,
                paths: vec![file],
            },
            "piped".as_bytes(),
        )
        .unwrap();

        assert_eq!(loaded, json!({"b.sol": "B", "<stdin>": "piped"}));
    }
}
