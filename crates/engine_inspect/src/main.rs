//! # engine_inspect
//!
//! Command-line tool for registry snapshot files.
//!
//! - `inspect <file> [--json]` loads a snapshot and reports entity and
//!   per-kind record counts.
//! - `convert <in> <out> --format legacy|v1` rewrites a snapshot in another
//!   layout.
//! - `demo <out>` writes a small sample registry.
//!
//! Log verbosity follows `RUST_LOG`.

mod demo;
mod summary;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use engine_registry::{FormatVersion, Registry, RegistrySerializer, SnapshotConfig, SnapshotStats};
use summary::SnapshotSummary;

#[derive(Parser)]
#[command(name = "engine_inspect", about = "Inspect and convert registry snapshots")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print what a snapshot contains
    Inspect {
        /// Snapshot file to read
        file: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a snapshot in another layout
    Convert {
        /// Snapshot to read (either layout)
        input: PathBuf,

        /// Destination file, replaced if present
        output: PathBuf,

        /// Layout to write
        #[arg(short, long, value_enum, default_value_t = Layout::V1)]
        format: Layout,
    },

    /// Write a sample registry
    Demo {
        /// Destination file, replaced if present
        output: PathBuf,

        /// Number of entities to create
        #[arg(short, long, default_value_t = 3)]
        entities: u32,

        /// Layout to write
        #[arg(short, long, value_enum, default_value_t = Layout::V1)]
        format: Layout,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Layout {
    /// Headerless layout
    Legacy,
    /// Magic and version header
    V1,
}

impl From<Layout> for FormatVersion {
    fn from(layout: Layout) -> Self {
        match layout {
            Layout::Legacy => FormatVersion::Legacy,
            Layout::V1 => FormatVersion::V1,
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("engine_inspect=info,engine_registry=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Args::parse().command {
        Command::Inspect { file, json } => {
            let summary = inspect(&file)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print!("{summary}");
            }
        }
        Command::Convert {
            input,
            output,
            format,
        } => {
            convert(&input, &output, format.into())?;
            info!(from = %input.display(), to = %output.display(), "snapshot converted");
        }
        Command::Demo {
            output,
            entities,
            format,
        } => {
            write_demo(&output, entities, format.into())?;
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<(Registry, SnapshotStats)> {
    let mut registry = Registry::new();
    let stats = RegistrySerializer::default()
        .deserialize(&mut registry, path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    Ok((registry, stats))
}

fn save(registry: &Registry, path: &Path, format: FormatVersion) -> Result<SnapshotStats> {
    RegistrySerializer::new(SnapshotConfig::new(format))
        .serialize(registry, path)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn inspect(path: &Path) -> Result<SnapshotSummary> {
    let (registry, stats) = load(path)?;
    Ok(SnapshotSummary::new(&registry, &stats))
}

fn convert(input: &Path, output: &Path, format: FormatVersion) -> Result<SnapshotStats> {
    let (registry, _) = load(input)?;
    save(&registry, output, format)
}

fn write_demo(output: &Path, entities: u32, format: FormatVersion) -> Result<SnapshotStats> {
    let registry = demo::build(entities).context("failed to build demo registry")?;
    save(&registry, output, format)
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_convert() {
        let args = Args::parse_from([
            "engine_inspect",
            "convert",
            "a.snow",
            "b.snow",
            "--format",
            "legacy",
        ]);
        let Command::Convert { format, .. } = args.command else {
            panic!("expected convert");
        };
        assert_eq!(FormatVersion::from(format), FormatVersion::Legacy);
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("engine_inspect_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_demo_convert_inspect() {
        let v1 = temp_path("demo_v1.snow");
        let legacy = temp_path("demo_legacy.snow");

        let written = write_demo(&v1, 5, FormatVersion::V1).unwrap();
        assert_eq!(written.entities, 5);
        assert_eq!(written.components, 7);

        let converted = convert(&v1, &legacy, FormatVersion::Legacy).unwrap();
        assert_eq!(converted.format, FormatVersion::Legacy);
        assert_eq!(converted.entities, 5);

        let before = inspect(&v1).unwrap();
        let after = inspect(&legacy).unwrap();
        assert_eq!(before.format, "v1");
        assert_eq!(after.format, "legacy");
        assert_eq!(before.entities, after.entities);
        assert_eq!(before.components, after.components);
        assert_eq!(before.kinds, after.kinds);

        let v1_len = std::fs::metadata(&v1).unwrap().len();
        let legacy_len = std::fs::metadata(&legacy).unwrap().len();
        assert_eq!(v1_len, legacy_len + 8);

        std::fs::remove_file(&v1).ok();
        std::fs::remove_file(&legacy).ok();
    }

    #[test]
    fn test_inspect_missing_file_reports_path() {
        let missing = temp_path("missing.snow");
        let err = inspect(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.snow"));
    }
}
