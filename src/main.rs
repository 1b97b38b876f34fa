use anyhow::{Context, Result};
use clap::Parser;
use nominal_detect::{AppConfig, DetectorOutput, OutputFormat, TieBreak};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Count banknote nominals in detector output
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Detector output JSON, or `-` for stdin
    #[arg(long, short)]
    input: String,

    /// TOML configuration file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Minimum confidence for a detection to count
    #[arg(long)]
    confidence: Option<f32>,

    /// IoU above which two boxes are the same banknote
    #[arg(long)]
    overlap: Option<f32>,

    /// Output format: raw, short or currency
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Keep the most confident box among duplicates
    #[arg(long)]
    highest_confidence: bool,

    /// Include the filtered-candidate trace in the output
    #[arg(long)]
    debug: bool,

    /// Log pipeline stages to stderr
    #[arg(long, short)]
    verbose: bool,
}

impl Args {
    fn load_config(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_toml_file(path)
                .with_context(|| format!("loading config {}", path.display()))?,
            None => AppConfig::default(),
        };

        if let Some(confidence) = self.confidence {
            config.detection.confidence_threshold = confidence;
        }
        if let Some(overlap) = self.overlap {
            config.detection.overlap_threshold = overlap;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if self.highest_confidence {
            config.detection.tie_break = TieBreak::HighestConfidence;
        }
        if self.debug {
            config.output.debug_info = true;
        }

        config.validate().context("invalid configuration")?;
        Ok(config)
    }

    fn read_input(&self) -> Result<String> {
        if self.input == "-" {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading detector output from stdin")?;
            Ok(buf)
        } else {
            std::fs::read_to_string(&self.input)
                .with_context(|| format!("reading detector output {}", self.input))
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = args.load_config()?;
    let pipeline = config.build_pipeline()?;
    info!(
        confidence = pipeline.confidence_threshold(),
        overlap = pipeline.overlap_threshold(),
        tie_break = %pipeline.tie_break(),
        "pipeline ready"
    );

    let input = args.read_input()?;
    let output: DetectorOutput =
        serde_json::from_str(&input).context("parsing detector output JSON")?;
    let raw = output.into_raw()?;

    let outcome = pipeline.run(&raw)?;
    let report = outcome.report(&config.output.report_options());

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
