use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use codec::Templates;
use slp_tools::{format_report_pretty, inspect_replay, roundtrip};
use tracing::info;
use tracing_subscriber::EnvFilter;
use wire::Limits;

#[derive(Parser)]
#[command(name = "slp-tools", version, about = "slp replay inspection tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Summarize a replay's structure.
    Inspect {
        /// Path to the replay file.
        replay: PathBuf,
        /// Template overrides as JSON, one record per kind.
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Decode a replay, re-encode it and compare the bytes.
    Roundtrip {
        /// Path to the replay file.
        replay: PathBuf,
        /// Template overrides as JSON, one record per kind.
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Write the re-encoded stream here.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the built-in templates as JSON.
    Templates,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Pretty,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let limits = Limits::default();
    match cli.command {
        Command::Inspect {
            replay,
            templates,
            format,
        } => {
            let templates = load_templates(templates.as_deref())?;
            let bytes = read_replay(&replay)?;
            let report = inspect_replay(&bytes, &templates, &limits)
                .with_context(|| format!("decode replay {}", replay.display()))?;
            match format {
                Format::Json => {
                    let json = serde_json::to_string_pretty(&report).context("serialize json")?;
                    println!("{json}");
                }
                Format::Pretty => println!("{}", format_report_pretty(&report)),
            }
        }
        Command::Roundtrip {
            replay,
            templates,
            out,
        } => {
            let templates = load_templates(templates.as_deref())?;
            let bytes = read_replay(&replay)?;
            let result = roundtrip(&bytes, &templates, &limits)
                .with_context(|| format!("round trip {}", replay.display()))?;
            if let Some(out) = &out {
                fs::write(out, &result.encoded)
                    .with_context(|| format!("write replay {}", out.display()))?;
                info!(path = %out.display(), bytes = result.encoded_len, "wrote re-encoded replay");
            }
            match result.first_difference {
                None => println!("identical ({} bytes)", result.original_len),
                Some(offset) => bail!(
                    "re-encoded stream differs at byte {offset} ({} bytes in, {} bytes out)",
                    result.original_len,
                    result.encoded_len
                ),
            }
        }
        Command::Templates => {
            let json =
                serde_json::to_string_pretty(&Templates::default()).context("serialize json")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn read_replay(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read replay {}", path.display()))
}

fn load_templates(path: Option<&Path>) -> Result<Templates> {
    let Some(path) = path else {
        return Ok(Templates::default());
    };
    let contents =
        fs::read_to_string(path).with_context(|| format!("read templates {}", path.display()))?;
    serde_json::from_str(&contents).context("parse templates json")
}
