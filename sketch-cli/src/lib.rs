//! # Sketch CLI
//!
//! Turns raw generator output into an `.excalidraw` document.
//!
//! ## Usage
//!
//! ```bash
//! sketch elements.json -o arch.excalidraw --pretty
//! generate-diagram | sketch --seed 42 > arch.excalidraw
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `CliConfig` - Input/output locations, seed and pipeline settings
//! - `convert` - Reads the input, runs the `sketch-core` pipeline, writes the document

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod convert;

pub use convert::{convert, read_input, run, write_document};

use std::path::PathBuf;

use clap::Parser;
use sketch_core::{PipelineConfig, RepairOptions};

/// Command-line arguments for sketch.
#[derive(Debug, Clone, Parser)]
#[command(name = "sketch")]
#[command(about = "Normalize generated sketch elements into an .excalidraw document")]
#[command(version)]
pub struct CliArgs {
    /// Raw element list or document to read (stdin when omitted or `-`)
    pub input: Option<PathBuf>,

    /// Where to write the document (stdout when omitted or `-`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Seed for ids, seeds and version nonces; random when omitted
    #[arg(long, env = "SKETCH_SEED")]
    pub seed: Option<u64>,

    /// Canvas background color (e.g., #f8f9fa)
    #[arg(long, env = "SKETCH_BACKGROUND")]
    pub background: Option<String>,

    /// Document source attribution
    #[arg(long, env = "SKETCH_SOURCE")]
    pub source: Option<String>,

    /// Indent the written JSON
    #[arg(long)]
    pub pretty: bool,

    /// Leave arrows that are taller than wide as arrows
    #[arg(long)]
    pub keep_steep_arrows: bool,
}

/// Resolved CLI configuration.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Input file; stdin when `None`.
    pub input: Option<PathBuf>,
    /// Output file; stdout when `None`.
    pub output: Option<PathBuf>,
    /// Fixed random seed.
    pub seed: Option<u64>,
    /// Indent the written JSON.
    pub pretty: bool,
    /// Settings passed to the core pipeline.
    pub pipeline: PipelineConfig,
}

impl From<CliArgs> for CliConfig {
    fn from(args: CliArgs) -> Self {
        let mut pipeline = PipelineConfig::default().with_repair_options(RepairOptions {
            reclassify_steep_arrows: !args.keep_steep_arrows,
        });
        if let Some(source) = args.source {
            pipeline = pipeline.with_source(source);
        }
        if let Some(background) = args.background {
            pipeline = pipeline.with_background(background);
        }
        Self {
            input: args.input.filter(|path| !is_stdio(path)),
            output: args.output.filter(|path| !is_stdio(path)),
            seed: args.seed,
            pretty: args.pretty,
            pipeline,
        }
    }
}

fn is_stdio(path: &std::path::Path) -> bool {
    path.as_os_str() == "-"
}
