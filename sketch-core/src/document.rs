//! The persisted document envelope.
//!
//! A [`Document`] is assembled once from repaired primitives and then only
//! read or written out. Its JSON form has exactly the top-level keys
//! `type`, `version`, `source`, `elements`, `appState` and `files`.

use std::collections::BTreeMap;
use std::io;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::element::Primitive;
use crate::index::OrderingKeys;
use crate::{SketchError, SketchResult};

/// Format tag written under `type`.
pub const DOCUMENT_TYPE: &str = "excalidraw";
/// Format version written under `version`.
pub const DOCUMENT_VERSION: u32 = 2;
/// Default `source` attribution.
pub const DEFAULT_SOURCE: &str = "https://excalidraw.com";
/// Default canvas background.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Host display state stored with the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// Canvas background color.
    pub view_background_color: String,
    /// Any further host settings (grid size, theme, ...), passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view_background_color: DEFAULT_BACKGROUND.to_string(),
            extra: Map::new(),
        }
    }
}

impl AppState {
    /// Layer overrides on top of this state. A string `viewBackgroundColor`
    /// replaces the background; every other key is kept verbatim.
    #[must_use]
    pub fn merged(mut self, overrides: &Map<String, Value>) -> Self {
        for (key, value) in overrides {
            if key == "viewBackgroundColor" {
                if let Some(color) = value.as_str() {
                    self.view_background_color = color.to_string();
                }
            } else {
                self.extra.insert(key.clone(), value.clone());
            }
        }
        self
    }
}

/// Assemble a document with the default `source`.
///
/// Shorthand for [`Document::assemble`].
#[must_use]
pub fn assemble(primitives: Vec<Primitive>, overrides: &Map<String, Value>) -> Document {
    Document::assemble(
        primitives,
        DEFAULT_SOURCE,
        AppState::default().merged(overrides),
    )
}

/// Canonical sketch document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "type")]
    format: &'static str,
    version: u32,
    source: String,
    elements: Vec<Primitive>,
    app_state: AppState,
    files: BTreeMap<String, Value>,
}

impl Document {
    /// Wrap primitives, in z-order, into a document.
    ///
    /// Each primitive's `index` is reassigned so that it sorts in sequence
    /// order. Binary assets are never embedded, so `files` is empty.
    #[must_use]
    pub fn assemble(
        mut primitives: Vec<Primitive>,
        source: impl Into<String>,
        app_state: AppState,
    ) -> Self {
        for (primitive, key) in primitives.iter_mut().zip(OrderingKeys::new()) {
            primitive.index = Some(key);
        }
        let document = Self {
            format: DOCUMENT_TYPE,
            version: DOCUMENT_VERSION,
            source: source.into(),
            elements: primitives,
            app_state,
            files: BTreeMap::new(),
        };
        tracing::info!(
            elements = document.elements.len(),
            source = %document.source,
            "assembled document"
        );
        document
    }

    /// Format tag.
    #[must_use]
    pub const fn format(&self) -> &str {
        self.format
    }

    /// Format version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Source attribution.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Elements in z-order (first renders at the back).
    #[must_use]
    pub fn elements(&self) -> &[Primitive] {
        &self.elements
    }

    /// Host display state.
    #[must_use]
    pub const fn app_state(&self) -> &AppState {
        &self.app_state
    }

    /// Embedded binary assets, keyed by file id.
    #[must_use]
    pub const fn files(&self) -> &BTreeMap<String, Value> {
        &self.files
    }

    /// Serialize the document to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> SketchResult<String> {
        serde_json::to_string(self).map_err(SketchError::Serialization)
    }

    /// Serialize the document to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> SketchResult<String> {
        serde_json::to_string_pretty(self).map_err(SketchError::Serialization)
    }

    /// Serialize the document to a JSON value tree.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_value(&self) -> SketchResult<Value> {
        serde_json::to_value(self).map_err(SketchError::Serialization)
    }

    /// Write the document as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    pub fn write_to<W: io::Write>(&self, writer: W, pretty: bool) -> SketchResult<()> {
        if pretty {
            serde_json::to_writer_pretty(writer, self)?;
        } else {
            serde_json::to_writer(writer, self)?;
        }
        Ok(())
    }
}
