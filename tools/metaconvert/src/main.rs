//! Metaconvert - Frame Metadata Replay Tool
//!
//! Reads recorded frames (one JSON `VideoFrame` per line) and writes the
//! converted per-frame documents to stdout as JSON lines.
//!
//! # Usage
//!
//! ```bash
//! # Convert a recording with a source tag
//! metaconvert frames.jsonl --source cam1
//!
//! # Read from stdin, include tensors, keep frames without detections
//! cat frames.jsonl | metaconvert - --add-tensor-data --add-empty-results
//!
//! # Load settings from YAML, override on the command line
//! metaconvert frames.jsonl --config converter.yaml --tags '{"site": "north"}'
//! ```

mod replay;

use anyhow::{Context, Result};
use clap::Parser;
use metaconvert_core::{logging, ConverterConfig, JsonConverter, JsonlSink, MessageSink};
use std::path::PathBuf;
use std::sync::Arc;

/// Convert recorded frame metadata into JSON documents
#[derive(Parser, Debug)]
#[command(name = "metaconvert")]
#[command(author, version)]
#[command(about = "Convert recorded video analytics metadata into per-frame JSON documents")]
struct Args {
    /// JSONL file of frames, or `-` for stdin
    #[arg(default_value = "-")]
    input: PathBuf,

    /// YAML converter configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Source identifier added to every document
    #[arg(long)]
    source: Option<String>,

    /// JSON string added to every document as `tags`
    #[arg(long)]
    tags: Option<String>,

    /// Include raw tensor descriptors
    #[arg(long)]
    add_tensor_data: bool,

    /// Emit documents for frames without detections
    #[arg(long)]
    add_empty_results: bool,

    /// Pretty-print with this many spaces (output is no longer one line per frame)
    #[arg(long)]
    json_indent: Option<usize>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn converter_config(&self) -> Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let yaml = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?;
                ConverterConfig::from_yaml_str(&yaml)?
            }
            None => ConverterConfig::default(),
        };

        if let Some(source) = &self.source {
            config.source = Some(source.clone());
        }
        if let Some(tags) = &self.tags {
            config.tags = Some(tags.clone());
        }
        if self.add_tensor_data {
            config.add_tensor_data = true;
        }
        if self.add_empty_results {
            config.add_empty_results = true;
        }
        if self.json_indent.is_some() {
            config.json_indent = self.json_indent;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    logging::init_logging(filter);

    let config = args.converter_config()?;
    tracing::info!(?config, input = %args.input.display(), "Starting conversion");

    let sink = Arc::new(JsonlSink::stdout());
    let converter = JsonConverter::new(config, sink.clone());

    let summary = if args.input.as_os_str() == "-" {
        replay::replay(std::io::stdin().lock(), &converter)?
    } else {
        let file = std::fs::File::open(&args.input)
            .with_context(|| format!("Failed to open {}", args.input.display()))?;
        replay::replay(std::io::BufReader::new(file), &converter)?
    };
    sink.close()?;

    tracing::info!(
        frames = summary.frames,
        skipped_lines = summary.skipped_lines,
        failed = summary.failed,
        "Conversion finished"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_flags_override_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "source: from-yaml\nadd_tensor_data: true\njson_indent: 4").unwrap();

        let args = Args::parse_from([
            "metaconvert",
            "frames.jsonl",
            "--config",
            file.path().to_str().unwrap(),
            "--source",
            "from-flag",
            "--add-empty-results",
        ]);
        let config = args.converter_config().unwrap();

        assert_eq!(config.source.as_deref(), Some("from-flag"));
        assert!(config.add_tensor_data);
        assert!(config.add_empty_results);
        assert_eq!(config.json_indent, Some(4));
    }

    #[test]
    fn test_defaults_read_stdin() {
        let args = Args::parse_from(["metaconvert"]);
        assert_eq!(args.input, PathBuf::from("-"));
        assert_eq!(args.converter_config().unwrap(), ConverterConfig::default());
    }
}
