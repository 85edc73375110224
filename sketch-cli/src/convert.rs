//! File and stream handling around the core pipeline.

use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sketch_core::{Document, Pipeline, PipelineOutput};

use crate::CliConfig;

/// Read the whole input, from `path` or stdin.
///
/// # Errors
///
/// Returns an error if the file or stdin cannot be read as UTF-8.
pub fn read_input(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("Failed to read stdin")?;
            Ok(text)
        }
    }
}

/// Run the pipeline over raw generator text.
///
/// # Errors
///
/// Returns an error if the text is not an element list or document.
pub fn convert(config: &CliConfig, text: &str) -> anyhow::Result<PipelineOutput> {
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let output = Pipeline::new(config.pipeline.clone())
        .process_text(text, rng)
        .context("Failed to normalize elements")?;
    Ok(output)
}

/// Write the document to `path`, or stdout, followed by a newline.
///
/// The document is rendered in memory first, so a failed render leaves an
/// existing file at `path` untouched.
///
/// # Errors
///
/// Returns an error if the document cannot be rendered or the destination
/// cannot be written.
pub fn write_document(document: &Document, path: Option<&Path>, pretty: bool) -> anyhow::Result<()> {
    let bytes = render(document, pretty)?;
    match path {
        Some(path) => std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(&bytes)
                .and_then(|()| stdout.flush())
                .context("Failed to write stdout")
        }
    }
}

fn render(document: &Document, pretty: bool) -> anyhow::Result<Vec<u8>> {
    let mut bytes = Vec::new();
    document
        .write_to(&mut bytes, pretty)
        .context("Failed to render document")?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Read, normalize and write one document.
///
/// # Errors
///
/// Returns an error if any of the three steps fails.
pub fn run(config: &CliConfig) -> anyhow::Result<PipelineOutput> {
    let text = read_input(config.input.as_deref())?;
    let output = convert(config, &text)?;
    write_document(&output.document, config.output.as_deref(), config.pretty)?;

    tracing::info!(
        elements = output.document.elements().len(),
        fixes = output.report.total(),
        warnings = output.warnings.len(),
        "wrote document"
    );
    Ok(output)
}
