//! # Sketch Core
//!
//! Normalization and repair of generated sketch documents.
//! Turns loosely-structured element lists into complete, self-consistent
//! `.excalidraw` documents.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Pipeline                   │
//! ├─────────────────────────────────────────────┤
//! │  Raw Input       │  Sanitizer               │
//! │  - Fence strip   │  - Kind defaults         │
//! │  - Lax accessors │  - Unique id/seed/nonce  │
//! ├─────────────────────────────────────────────┤
//! │  Geometry Repair │  Document Assembler      │
//! │  - Extents       │  - Envelope + appState   │
//! │  - Paths, text   │  - Ordering keys         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use rand::rngs::StdRng;
//! use rand::SeedableRng;
//! use sketch_core::Pipeline;
//!
//! let output = Pipeline::default()
//!     .process_text(r#"[{"type": "text", "text": "Hello"}]"#, StdRng::seed_from_u64(1))
//!     .unwrap();
//! assert_eq!(output.document.elements().len(), 1);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod document;
pub mod element;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod raw;
pub mod repair;
pub mod sanitize;

pub use document::{assemble, AppState, Document};
pub use element::{ElementType, Point, Primitive, PrimitiveKind};
pub use error::{SketchError, SketchResult};
pub use pipeline::{Pipeline, PipelineConfig, PipelineOutput};
pub use raw::RawInput;
pub use repair::{repair, RepairOptions, RepairReport, Repaired};
pub use sanitize::{sanitize_elements, SanitizeOutcome, Sanitizer};

/// Sketch core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
