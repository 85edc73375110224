//! Drawing primitives - the elements of a sketch document.
//!
//! A [`Primitive`] carries the attributes every element shares plus a
//! [`PrimitiveKind`] holding only the attributes valid for its kind. The
//! serialized form is the flat Excalidraw element object, with the kind
//! written under the `type` key.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// An offset `(dx, dy)` relative to a primitive's position.
///
/// Serializes as a two-element array, e.g. `[0, 300]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point(pub f64, pub f64);

impl Point {
    /// The path origin.
    pub const ORIGIN: Self = Self(0.0, 0.0);

    /// Create a point from its offsets.
    #[must_use]
    pub const fn new(dx: f64, dy: f64) -> Self {
        Self(dx, dy)
    }

    /// Horizontal offset.
    #[must_use]
    pub const fn dx(self) -> f64 {
        self.0
    }

    /// Vertical offset.
    #[must_use]
    pub const fn dy(self) -> f64 {
        self.1
    }
}

/// The `type` discriminator of a primitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Axis-aligned rectangle.
    #[default]
    Rectangle,
    /// Ellipse inscribed in the extent.
    Ellipse,
    /// Diamond inscribed in the extent.
    Diamond,
    /// Non-directional connector.
    Line,
    /// Directional connector.
    Arrow,
    /// Text label.
    Text,
    /// Embedded image.
    Image,
    /// A kind this crate does not know; kept with common attributes only.
    Other(String),
}

impl ElementType {
    /// Parse a `type` value. Unrecognised names become [`ElementType::Other`].
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "rectangle" => Self::Rectangle,
            "ellipse" => Self::Ellipse,
            "diamond" => Self::Diamond,
            "line" => Self::Line,
            "arrow" => Self::Arrow,
            "text" => Self::Text,
            "image" => Self::Image,
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire name of this type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Rectangle => "rectangle",
            Self::Ellipse => "ellipse",
            Self::Diamond => "diamond",
            Self::Line => "line",
            Self::Arrow => "arrow",
            Self::Text => "text",
            Self::Image => "image",
            Self::Other(name) => name,
        }
    }

    /// Whether primitives of this type carry a path.
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        matches!(self, Self::Line | Self::Arrow)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fill pattern for closed shapes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    /// Sketchy parallel hatching.
    Hachure,
    /// Crossed hatching.
    CrossHatch,
    /// Flat fill.
    #[default]
    Solid,
    /// Zigzag hatching.
    Zigzag,
}

/// Stroke dash pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    /// Continuous stroke.
    #[default]
    Solid,
    /// Dashed stroke.
    Dashed,
    /// Dotted stroke.
    Dotted,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Align to the left edge.
    #[default]
    Left,
    /// Center horizontally.
    Center,
    /// Align to the right edge.
    Right,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    /// Align to the top edge.
    #[default]
    Top,
    /// Center vertically.
    Middle,
    /// Align to the bottom edge.
    Bottom,
}

/// Decoration drawn at one end of a line or arrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arrowhead {
    /// Open arrow.
    Arrow,
    /// Perpendicular bar.
    Bar,
    /// Legacy filled dot.
    Dot,
    /// Filled circle.
    Circle,
    /// Outlined circle.
    CircleOutline,
    /// Filled triangle.
    Triangle,
    /// Outlined triangle.
    TriangleOutline,
    /// Filled diamond.
    Diamond,
    /// Outlined diamond.
    DiamondOutline,
    /// Crow's foot, exactly one.
    CrowfootOne,
    /// Crow's foot, many.
    CrowfootMany,
    /// Crow's foot, one or many.
    CrowfootOneOrMany,
}

/// Rounding algorithm selected by a [`Roundness`] descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundnessType {
    /// Legacy fixed rounding.
    Legacy = 1,
    /// Radius proportional to the shape size (ellipses, arrows).
    ProportionalRadius = 2,
    /// Radius that adapts to the shape size (rectangles).
    AdaptiveRadius = 3,
}

impl RoundnessType {
    /// Map the numeric wire code to a rounding type.
    #[must_use]
    pub const fn from_code(code: u64) -> Option<Self> {
        match code {
            1 => Some(Self::Legacy),
            2 => Some(Self::ProportionalRadius),
            3 => Some(Self::AdaptiveRadius),
            _ => None,
        }
    }

    /// The numeric wire code.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl Serialize for RoundnessType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Corner rounding. A primitive without one has sharp corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Roundness {
    /// Rounding algorithm.
    #[serde(rename = "type")]
    pub kind: RoundnessType,
    /// Explicit radius, when the generator supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Roundness {
    /// A descriptor of the given type with no explicit radius.
    #[must_use]
    pub const fn of(kind: RoundnessType) -> Self {
        Self { kind, value: None }
    }
}

/// Stroke and fill attributes shared by every kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Stroke color as a CSS color string.
    pub stroke_color: String,
    /// Fill color as a CSS color string, or `transparent`.
    pub background_color: String,
    /// Fill pattern.
    pub fill_style: FillStyle,
    /// Stroke width in pixels, always positive.
    pub stroke_width: f64,
    /// Stroke dash pattern.
    pub stroke_style: StrokeStyle,
    /// Sketchiness, 0 (architect) to 2 (cartoonist).
    pub roughness: u8,
    /// Opacity percentage, 0 to 100.
    pub opacity: u8,
}

/// Attachment of a connector end to another primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Binding {
    /// Id of the primitive the end is attached to (weak reference).
    pub element_id: String,
    /// Where along the target the connector aims, -1 to 1.
    pub focus: f64,
    /// Distance kept from the target outline.
    pub gap: f64,
}

/// Back-reference from a primitive to something bound to it.
///
/// Maintained by the rendering host; this crate only carries supplied values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundElement {
    /// Id of the bound primitive.
    pub id: String,
    /// Type of the bound primitive.
    #[serde(rename = "type")]
    pub kind: String,
}

/// Path attributes of lines and arrows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearData {
    /// Offsets from the primitive's position. The last one equals the extent.
    pub points: Vec<Point>,
    /// Last point committed while drawing interactively.
    pub last_committed_point: Option<Point>,
    /// Attachment of the first point.
    pub start_binding: Option<Binding>,
    /// Attachment of the last point.
    pub end_binding: Option<Binding>,
    /// Decoration at the first point.
    pub start_arrowhead: Option<Arrowhead>,
    /// Decoration at the last point.
    pub end_arrowhead: Option<Arrowhead>,
}

/// Arrow attributes: a path plus routing mode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrowData {
    /// The arrow's path.
    #[serde(flatten)]
    pub path: LinearData,
    /// Whether the arrow is routed with right-angle elbows.
    pub elbowed: bool,
}

/// Text attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextData {
    /// Displayed text.
    pub text: String,
    /// Text before wrapping; equal to `text` after repair.
    pub original_text: String,
    /// Font size in pixels.
    pub font_size: f64,
    /// Font family code (1 = hand-drawn, 2 = normal, 3 = code).
    pub font_family: u32,
    /// Horizontal alignment.
    pub text_align: TextAlign,
    /// Vertical alignment.
    pub vertical_align: VerticalAlign,
    /// Shape hosting this text (weak reference).
    pub container_id: Option<String>,
    /// Line height as a multiple of the font size.
    pub line_height: f64,
    /// Whether the host resizes the box to fit the text.
    pub auto_resize: bool,
}

/// Loading state of an image's binary asset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    /// Asset not yet stored.
    #[default]
    Pending,
    /// Asset stored.
    Saved,
    /// Asset failed to load.
    Error,
}

/// Image attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    /// Key into the document's `files` mapping.
    pub file_id: Option<String>,
    /// Asset loading state.
    pub status: ImageStatus,
    /// Horizontal and vertical flip/scale factors.
    pub scale: [f64; 2],
}

/// Kind-specific content of a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveKind {
    /// Rectangle.
    Rectangle,
    /// Ellipse.
    Ellipse,
    /// Diamond.
    Diamond,
    /// Non-directional connector.
    Line(LinearData),
    /// Directional connector.
    Arrow(ArrowData),
    /// Text label.
    Text(TextData),
    /// Embedded image.
    Image(ImageData),
    /// Unknown kind, serialized under its original name.
    Other(String),
}

impl PrimitiveKind {
    /// The `type` discriminator for this kind.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Rectangle => ElementType::Rectangle,
            Self::Ellipse => ElementType::Ellipse,
            Self::Diamond => ElementType::Diamond,
            Self::Line(_) => ElementType::Line,
            Self::Arrow(_) => ElementType::Arrow,
            Self::Text(_) => ElementType::Text,
            Self::Image(_) => ElementType::Image,
            Self::Other(name) => ElementType::Other(name.clone()),
        }
    }

    /// Path data for lines and arrows.
    #[must_use]
    pub fn path(&self) -> Option<&LinearData> {
        match self {
            Self::Line(path) | Self::Arrow(ArrowData { path, .. }) => Some(path),
            _ => None,
        }
    }

    /// Mutable path data for lines and arrows.
    pub fn path_mut(&mut self) -> Option<&mut LinearData> {
        match self {
            Self::Line(path) | Self::Arrow(ArrowData { path, .. }) => Some(path),
            _ => None,
        }
    }

    /// Text data for text primitives.
    #[must_use]
    pub fn text(&self) -> Option<&TextData> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Wire shape of the known kinds; the tag lands next to the common fields.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum TaggedKind<'a> {
    Rectangle,
    Ellipse,
    Diamond,
    Line(&'a LinearData),
    Arrow(&'a ArrowData),
    Text(&'a TextData),
    Image(&'a ImageData),
}

impl Serialize for PrimitiveKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tagged = match self {
            Self::Rectangle => TaggedKind::Rectangle,
            Self::Ellipse => TaggedKind::Ellipse,
            Self::Diamond => TaggedKind::Diamond,
            Self::Line(path) => TaggedKind::Line(path),
            Self::Arrow(arrow) => TaggedKind::Arrow(arrow),
            Self::Text(text) => TaggedKind::Text(text),
            Self::Image(image) => TaggedKind::Image(image),
            Self::Other(name) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("type", name)?;
                return map.end();
            }
        };
        tagged.serialize(serializer)
    }
}

/// A fully-populated drawing element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    /// Unique within its document.
    pub id: String,
    /// Kind and kind-specific attributes.
    #[serde(flatten)]
    pub kind: PrimitiveKind,
    /// Left edge of the anchor.
    pub x: f64,
    /// Top edge of the anchor.
    pub y: f64,
    /// Horizontal extent. Positive for shapes, non-negative for lines and arrows.
    pub width: f64,
    /// Vertical extent. Positive for shapes, non-negative for lines and arrows.
    pub height: f64,
    /// Rotation in radians.
    pub angle: f64,
    /// Stroke and fill.
    #[serde(flatten)]
    pub style: Style,
    /// Corner rounding, `None` for sharp corners.
    pub roundness: Option<Roundness>,
    /// Random seed for the host's sketchy rendering.
    pub seed: u32,
    /// Edit counter.
    pub version: u32,
    /// Random value changed on every edit, used for reconciliation.
    pub version_nonce: u32,
    /// Soft-delete marker.
    pub is_deleted: bool,
    /// Ids of the groups this primitive belongs to, innermost first.
    pub group_ids: Vec<String>,
    /// Frame containing this primitive.
    pub frame_id: Option<String>,
    /// Fractional ordering key, assigned when the document is assembled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    /// Primitives bound to this one.
    pub bound_elements: Vec<BoundElement>,
    /// Last update, in milliseconds since the Unix epoch.
    pub updated: u64,
    /// External hyperlink.
    pub link: Option<String>,
    /// Whether the host prevents edits.
    pub locked: bool,
}

impl Primitive {
    /// The `type` discriminator of this primitive.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.kind.element_type()
    }

    /// Whether this primitive is a line or arrow.
    #[must_use]
    pub const fn is_linear(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Line(_) | PrimitiveKind::Arrow(_))
    }

    /// The extent as a path offset, i.e. where a straight path must end.
    #[must_use]
    pub const fn extent_point(&self) -> Point {
        Point(self.width, self.height)
    }
}
