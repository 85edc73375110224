//! One-call normalization: raw generator output in, finished document out.

use rand::Rng;
use serde_json::{Map, Value};

use crate::document::{AppState, Document, DEFAULT_SOURCE};
use crate::raw::RawInput;
use crate::repair::{self, RepairOptions, RepairReport};
use crate::sanitize::Sanitizer;
use crate::SketchResult;

/// Settings for a [`Pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Document `source` attribution.
    pub source: String,
    /// App-state entries layered over the defaults and any input app state.
    pub app_state: Map<String, Value>,
    /// Heuristic repair switches.
    pub repair: RepairOptions,
    /// Fixed `updated` timestamp; the current time when `None`.
    pub timestamp: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            app_state: Map::new(),
            repair: RepairOptions::default(),
            timestamp: None,
        }
    }
}

impl PipelineConfig {
    /// Set the document source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the canvas background color.
    #[must_use]
    pub fn with_background(self, color: impl Into<String>) -> Self {
        self.with_app_state_entry("viewBackgroundColor", Value::String(color.into()))
    }

    /// Add one app-state override.
    #[must_use]
    pub fn with_app_state_entry(mut self, key: impl Into<String>, value: Value) -> Self {
        self.app_state.insert(key.into(), value);
        self
    }

    /// Replace the repair switches.
    #[must_use]
    pub const fn with_repair_options(mut self, repair: RepairOptions) -> Self {
        self.repair = repair;
        self
    }

    /// Pin the `updated` timestamp (milliseconds since the Unix epoch).
    #[must_use]
    pub const fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The assembled document.
    pub document: Document,
    /// Supplied values that were replaced or dropped.
    pub warnings: Vec<String>,
    /// Geometry repairs applied.
    pub report: RepairReport,
}

/// Sanitize, repair and assemble.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline with the given configuration.
    #[must_use]
    pub const fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalize a list of raw element mappings.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`](crate::SketchError::MalformedDocument)
    /// if an element is not a JSON object.
    pub fn process<R: Rng>(&self, raw: &[Value], rng: R) -> SketchResult<PipelineOutput> {
        self.run(raw, None, rng)
    }

    /// Parse generator text and normalize it.
    ///
    /// The text may be a bare element array or a whole document; a
    /// document's own `appState` sits between the defaults and the
    /// configured overrides.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`](crate::SketchError::MalformedDocument)
    /// if the text is not JSON of an accepted shape.
    pub fn process_text<R: Rng>(&self, text: &str, rng: R) -> SketchResult<PipelineOutput> {
        let input = RawInput::parse(text)?;
        self.run(&input.elements, input.app_state.as_ref(), rng)
    }

    fn run<R: Rng>(
        &self,
        raw: &[Value],
        input_state: Option<&Map<String, Value>>,
        rng: R,
    ) -> SketchResult<PipelineOutput> {
        let mut sanitizer = Sanitizer::new(rng);
        if let Some(timestamp) = self.config.timestamp {
            sanitizer = sanitizer.with_timestamp(timestamp);
        }
        let primitives = sanitizer.sanitize_all(raw)?;
        let warnings = sanitizer.into_warnings();

        let repaired = repair::repair(primitives, self.config.repair);
        tracing::debug!(
            fixes = repaired.report.total(),
            warnings = warnings.len(),
            "repaired elements"
        );

        let mut app_state = AppState::default();
        if let Some(state) = input_state {
            app_state = app_state.merged(state);
        }
        let app_state = app_state.merged(&self.config.app_state);

        Ok(PipelineOutput {
            document: Document::assemble(repaired.primitives, self.config.source.clone(), app_state),
            warnings,
            report: repaired.report,
        })
    }
}
