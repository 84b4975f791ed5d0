//! spantrim CLI - Command-line interface
//!
//! Usage:
//!   spantrim extract [--input <file>] [--locale <code>]
//!   spantrim check-rules <file>

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use spantrim_core::{LoggingConfig, Rule, TrimConfig, TrimInput};
use spantrim_extractor::TrimExtractor;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "spantrim")]
#[command(about = "Extract text around anchor words with trim rules")]
#[command(version)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run trim rules over input records (JSON, JSON array, or JSON lines)
    Extract {
        /// Input file; reads stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Locale for records that carry none
        #[arg(short, long)]
        locale: Option<String>,

        /// Keep overlapping edges
        #[arg(long)]
        keep_overlaps: bool,

        /// Pretty-print output
        #[arg(long)]
        pretty: bool,
    },
    /// Validate a rule file (JSON array of rules)
    CheckRules {
        /// Rule file
        path: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => TrimConfig::from_file(path)?.with_env_override()?,
        None => TrimConfig::from_env()?,
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    init_logging(&config.logging);

    match cli.command {
        Commands::Extract {
            input,
            locale,
            keep_overlaps,
            pretty,
        } => {
            if let Some(locale) = locale {
                config.extractor.default_locale = locale;
            }
            if keep_overlaps {
                config.extractor.keep_overlaps = true;
            }
            config.validate()?;
            extract(config, input.as_deref(), pretty)?;
        }
        Commands::CheckRules { path } => check_rules(&path)?,
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(logging.include_location)
        .with_line_number(logging.include_location);

    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn extract(config: TrimConfig, input: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let raw = read_input(input)?;
    let (records, as_array) = parse_records(&raw)?;
    tracing::info!("Extracting from {} records", records.len());

    let extractor = TrimExtractor::with_config(config.extractor);
    let outputs = records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            extractor
                .run(record)
                .with_context(|| format!("record {i} could not be processed"))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if as_array {
        write_json(&mut out, &outputs, pretty)?;
    } else {
        for output in &outputs {
            write_json(&mut out, output, pretty)?;
        }
    }
    Ok(())
}

fn check_rules(path: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read rule file {}", path.display()))?;
    let rules: Vec<Rule> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid rules in {}", path.display()))?;

    for (i, rule) in rules.iter().enumerate() {
        let name = rule.name.as_deref().unwrap_or("<unnamed>");
        if rule.is_trim() {
            println!("{i}: {name} (trim, {} conditions)", rule.rules.len());
        } else {
            println!("{i}: {name} ({}, ignored)", rule.rule_type);
        }
    }
    println!("{} rules OK", rules.len());
    Ok(())
}

fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read input {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read stdin")?;
            Ok(raw)
        }
    }
}

/// Parse a JSON array of records, or one or more concatenated records
fn parse_records(raw: &str) -> anyhow::Result<(Vec<TrimInput>, bool)> {
    if raw.trim_start().starts_with('[') {
        let records = serde_json::from_str(raw).context("invalid input array")?;
        return Ok((records, true));
    }

    let records = serde_json::Deserializer::from_str(raw)
        .into_iter::<TrimInput>()
        .collect::<Result<Vec<_>, _>>()
        .context("invalid input record")?;
    Ok((records, false))
}

fn write_json<T: serde::Serialize + ?Sized>(
    out: &mut impl Write,
    value: &T,
    pretty: bool,
) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_record() {
        let (records, as_array) = parse_records(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(records.len(), 1);
        assert!(!as_array);
    }

    #[test]
    fn test_parse_json_lines() {
        let raw = "{\"text\": \"a\"}\n{\"utterance\": \"b\"}\n";
        let (records, as_array) = parse_records(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert!(!as_array);
        assert_eq!(records[1].utterance_text().unwrap(), "b");
    }

    #[test]
    fn test_parse_array() {
        let (records, as_array) = parse_records(r#" [{"text": "a"}, {"text": "b"}]"#).unwrap();
        assert_eq!(records.len(), 2);
        assert!(as_array);
    }

    #[test]
    fn test_parse_invalid() {
        assert!(parse_records("{not json").is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["spantrim", "-v", "extract", "--locale", "es"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Extract { locale: Some(ref l), .. } if l == "es"
        ));
    }
}
