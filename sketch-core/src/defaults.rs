//! Default attribute values, per primitive kind.
//!
//! Static defaults are constants or small lookup functions. Defaults that
//! must be unique per element (ids, seeds, version nonces) are drawn from a
//! caller-supplied random source so runs can be made reproducible.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use uuid::Builder;

use crate::element::{
    Arrowhead, ElementType, FillStyle, ImageData, ImageStatus, Roundness, RoundnessType,
    StrokeStyle, Style, TextAlign, TextData, VerticalAlign,
};

/// Default stroke color.
pub const STROKE_COLOR: &str = "#1e1e1e";
/// Default fill color.
pub const BACKGROUND_COLOR: &str = "transparent";
/// Default stroke width in pixels.
pub const STROKE_WIDTH: f64 = 2.0;
/// Default sketchiness.
pub const ROUGHNESS: u8 = 1;
/// Highest accepted sketchiness.
pub const MAX_ROUGHNESS: u8 = 2;
/// Default opacity percentage.
pub const OPACITY: u8 = 100;
/// Initial edit counter.
pub const VERSION: u32 = 1;

/// Default font size in pixels.
pub const FONT_SIZE: f64 = 16.0;
/// Default font family (hand-drawn).
pub const FONT_FAMILY: u32 = 1;
/// Default line height multiple.
pub const LINE_HEIGHT: f64 = 1.25;
/// Average glyph width as a fraction of the font size, used to size text boxes.
pub const GLYPH_WIDTH_RATIO: f64 = 0.6;

/// Default extent for shapes.
pub const SHAPE_SIZE: f64 = 100.0;
/// Default horizontal extent for lines and arrows without a path.
pub const CONNECTOR_LENGTH: f64 = 100.0;

/// Upper bound for generated seeds and version nonces (31-bit space).
pub const MAX_RANDOM: u32 = 2_147_483_647;
/// Number of hex characters in a generated id.
pub const ID_LEN: usize = 16;

/// Per-kind defaults layered on top of the common ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KindDefaults {
    /// Width used when none (or zero) was supplied.
    pub width: f64,
    /// Height used when none (or zero) was supplied.
    pub height: f64,
    /// Corner rounding when the attribute is missing.
    pub roundness: Option<Roundness>,
    /// Start decoration for lines and arrows.
    pub start_arrowhead: Option<Arrowhead>,
    /// End decoration for lines and arrows.
    pub end_arrowhead: Option<Arrowhead>,
}

impl KindDefaults {
    const SHAPE: Self = Self {
        width: SHAPE_SIZE,
        height: SHAPE_SIZE,
        roundness: None,
        start_arrowhead: None,
        end_arrowhead: None,
    };

    /// Look up the defaults for a kind. Unknown kinds get the plain shape set.
    #[must_use]
    pub const fn for_type(element_type: &ElementType) -> Self {
        match element_type {
            ElementType::Ellipse => Self {
                roundness: Some(Roundness::of(RoundnessType::ProportionalRadius)),
                ..Self::SHAPE
            },
            ElementType::Line => Self {
                width: CONNECTOR_LENGTH,
                height: 0.0,
                ..Self::SHAPE
            },
            ElementType::Arrow => Self {
                width: CONNECTOR_LENGTH,
                height: 0.0,
                roundness: Some(Roundness::of(RoundnessType::ProportionalRadius)),
                start_arrowhead: None,
                end_arrowhead: Some(Arrowhead::Arrow),
            },
            ElementType::Rectangle
            | ElementType::Diamond
            | ElementType::Text
            | ElementType::Image
            | ElementType::Other(_) => Self::SHAPE,
        }
    }
}

/// The kind-independent style.
#[must_use]
pub fn style() -> Style {
    Style {
        stroke_color: STROKE_COLOR.to_string(),
        background_color: BACKGROUND_COLOR.to_string(),
        fill_style: FillStyle::Solid,
        stroke_width: STROKE_WIDTH,
        stroke_style: StrokeStyle::Solid,
        roughness: ROUGHNESS,
        opacity: OPACITY,
    }
}

/// Text attributes for the given content.
#[must_use]
pub fn text(content: &str) -> TextData {
    TextData {
        text: content.to_string(),
        original_text: content.to_string(),
        font_size: FONT_SIZE,
        font_family: FONT_FAMILY,
        text_align: TextAlign::Left,
        vertical_align: VerticalAlign::Top,
        container_id: None,
        line_height: LINE_HEIGHT,
        auto_resize: true,
    }
}

/// Image attributes with no asset attached.
#[must_use]
pub const fn image() -> ImageData {
    ImageData {
        file_id: None,
        status: ImageStatus::Pending,
        scale: [1.0, 1.0],
    }
}

/// Draw a seed or version nonce in `1..=MAX_RANDOM`.
pub fn random_nonce<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen_range(1..=MAX_RANDOM)
}

/// Draw a short hex id from random v4 UUID bytes.
pub fn random_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let uuid = Builder::from_random_bytes(rng.gen()).into_uuid();
    let mut id = uuid.simple().to_string();
    id.truncate(ID_LEN);
    id
}

/// Current time in milliseconds since the Unix epoch.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Timestamps won't exceed u64 for billions of years
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
