//! Element sanitizer: raw mapping in, fully-populated [`Primitive`] out.
//!
//! Every attribute the document schema requires is filled from the
//! [`defaults`](crate::defaults) table when it is missing or unusable.
//! Sanitization never fails for an element that is a JSON object.
//!
//! One [`Sanitizer`] covers one document: ids, seeds and version nonces are
//! unique across everything it has produced.

use std::collections::HashSet;

use rand::Rng;
use serde_json::Value;

use crate::defaults::{self, KindDefaults};
use crate::element::{
    ArrowData, Binding, BoundElement, ElementType, ImageData, LinearData, Point, Primitive,
    PrimitiveKind, Roundness, RoundnessType, Style, TextData,
};
use crate::raw::{as_number, RawElement};
use crate::repair;
use crate::SketchResult;

/// Result of sanitizing a list of raw elements.
#[derive(Debug, Clone)]
pub struct SanitizeOutcome {
    /// The sanitized primitives, in input order.
    pub primitives: Vec<Primitive>,
    /// Supplied values that had to be replaced or dropped.
    pub warnings: Vec<String>,
}

/// Sanitize a list of raw elements with a fresh [`Sanitizer`].
///
/// # Errors
///
/// Returns [`SketchError::MalformedDocument`](crate::SketchError::MalformedDocument)
/// if any element is not a JSON object.
pub fn sanitize_elements<R: Rng>(raw: &[Value], rng: R) -> SketchResult<SanitizeOutcome> {
    let mut sanitizer = Sanitizer::new(rng);
    let primitives = sanitizer.sanitize_all(raw)?;
    Ok(SanitizeOutcome {
        primitives,
        warnings: sanitizer.into_warnings(),
    })
}

/// Builds primitives from raw mappings, keeping identities unique.
#[derive(Debug)]
pub struct Sanitizer<R> {
    rng: R,
    updated: u64,
    ids: HashSet<String>,
    seeds: HashSet<u32>,
    nonces: HashSet<u32>,
    warnings: Vec<String>,
}

impl<R: Rng> Sanitizer<R> {
    /// Create a sanitizer drawing ids, seeds and nonces from `rng`.
    ///
    /// The `updated` default is the current time, read once.
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            updated: defaults::now_millis(),
            ids: HashSet::new(),
            seeds: HashSet::new(),
            nonces: HashSet::new(),
            warnings: Vec::new(),
        }
    }

    /// Use a fixed `updated` timestamp (milliseconds since the Unix epoch).
    #[must_use]
    pub fn with_timestamp(mut self, updated: u64) -> Self {
        self.updated = updated;
        self
    }

    /// Warnings collected so far.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Consume the sanitizer, returning its warnings.
    #[must_use]
    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }

    /// Sanitize every element, in order.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`](crate::SketchError::MalformedDocument)
    /// naming the first element that is not a JSON object.
    pub fn sanitize_all(&mut self, raw: &[Value]) -> SketchResult<Vec<Primitive>> {
        raw.iter()
            .enumerate()
            .map(|(index, value)| self.sanitize(value, index))
            .collect()
    }

    /// Sanitize a single element found at `index` of its input list.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`](crate::SketchError::MalformedDocument)
    /// naming `index` if `value` is not a JSON object.
    pub fn sanitize(&mut self, value: &Value, index: usize) -> SketchResult<Primitive> {
        let raw = RawElement::new(value, index)?;
        Ok(self.build(&raw))
    }

    fn build(&mut self, raw: &RawElement<'_>) -> Primitive {
        let element_type = raw.string("type").map(ElementType::parse).unwrap_or_default();
        let defaults = KindDefaults::for_type(&element_type);

        let id = self.claim_id(raw.string("id"));
        let seed = self.claim_nonce(raw.unsigned("seed"), Identity::Seed, &id);
        let version_nonce = self.claim_nonce(raw.unsigned("versionNonce"), Identity::Nonce, &id);

        if raw.contains("label") && element_type != ElementType::Text {
            tracing::debug!(%id, kind = %element_type, "dropping inline label");
        }

        let kind = self.build_kind(&element_type, raw, &defaults, &id);
        let roundness = raw
            .nullable("roundness", read_roundness)
            .unwrap_or(defaults.roundness);

        let mut primitive = Primitive {
            id,
            kind,
            x: raw.number("x").unwrap_or(0.0),
            y: raw.number("y").unwrap_or(0.0),
            width: 0.0,
            height: 0.0,
            angle: raw.number("angle").unwrap_or(0.0),
            style: read_style(raw),
            roundness,
            seed,
            version: raw.unsigned("version").filter(|v| *v > 0).unwrap_or(defaults::VERSION),
            version_nonce,
            is_deleted: raw.boolean("isDeleted").unwrap_or(false),
            group_ids: raw.strings("groupIds").unwrap_or_default(),
            frame_id: raw.nullable("frameId", read_string).flatten(),
            index: None,
            bound_elements: read_bound_elements(raw),
            updated: raw.timestamp("updated").unwrap_or(self.updated),
            link: raw.nullable("link", read_string).flatten(),
            locked: raw.boolean("locked").unwrap_or(false),
        };
        apply_extent(&mut primitive, raw, &defaults);
        primitive
    }

    fn build_kind(
        &mut self,
        element_type: &ElementType,
        raw: &RawElement<'_>,
        defaults: &KindDefaults,
        id: &str,
    ) -> PrimitiveKind {
        match element_type {
            ElementType::Rectangle => PrimitiveKind::Rectangle,
            ElementType::Ellipse => PrimitiveKind::Ellipse,
            ElementType::Diamond => PrimitiveKind::Diamond,
            ElementType::Line => PrimitiveKind::Line(self.read_path(raw, defaults, id)),
            ElementType::Arrow => PrimitiveKind::Arrow(ArrowData {
                path: self.read_path(raw, defaults, id),
                elbowed: raw.boolean("elbowed").unwrap_or(false),
            }),
            ElementType::Text => PrimitiveKind::Text(read_text(raw)),
            ElementType::Image => PrimitiveKind::Image(read_image(raw)),
            ElementType::Other(name) => PrimitiveKind::Other(name.clone()),
        }
    }

    /// Path attributes. `points` is left as supplied; [`apply_extent`] makes
    /// it agree with the extent.
    fn read_path(&mut self, raw: &RawElement<'_>, defaults: &KindDefaults, id: &str) -> LinearData {
        LinearData {
            points: raw.points("points").unwrap_or_default(),
            last_committed_point: raw.point("lastCommittedPoint"),
            start_binding: self.read_binding(raw, "startBinding", id),
            end_binding: self.read_binding(raw, "endBinding", id),
            start_arrowhead: raw
                .nullable("startArrowhead", read_enum)
                .unwrap_or(defaults.start_arrowhead),
            end_arrowhead: raw
                .nullable("endArrowhead", read_enum)
                .unwrap_or(defaults.end_arrowhead),
        }
    }

    fn read_binding(&mut self, raw: &RawElement<'_>, key: &str, id: &str) -> Option<Binding> {
        let binding = raw.object(key)?;
        let Some(element_id) = binding.string("elementId").filter(|s| !s.is_empty()) else {
            self.warn(format!("{id}: dropped {key} without an elementId"));
            return None;
        };
        Some(Binding {
            element_id: element_id.to_string(),
            focus: binding.number("focus").unwrap_or(0.0),
            gap: binding.number("gap").unwrap_or(1.0),
        })
    }

    fn claim_id(&mut self, supplied: Option<&str>) -> String {
        if let Some(id) = supplied.filter(|id| !id.is_empty()) {
            if self.ids.insert(id.to_string()) {
                return id.to_string();
            }
            self.warn(format!("duplicate id `{id}` replaced"));
        }
        loop {
            let id = defaults::random_id(&mut self.rng);
            if self.ids.insert(id.clone()) {
                return id;
            }
        }
    }

    fn claim_nonce(&mut self, supplied: Option<u32>, identity: Identity, id: &str) -> u32 {
        let used = match identity {
            Identity::Seed => &mut self.seeds,
            Identity::Nonce => &mut self.nonces,
        };
        if let Some(value) = supplied.filter(|v| *v > 0) {
            if used.insert(value) {
                return value;
            }
            let message = format!("{id}: duplicate {} {value} replaced", identity.name());
            tracing::warn!("{message}");
            self.warnings.push(message);
        }
        loop {
            let value = defaults::random_nonce(&mut self.rng);
            if used.insert(value) {
                return value;
            }
        }
    }

    fn warn(&mut self, message: String) {
        tracing::warn!("{message}");
        self.warnings.push(message);
    }
}

#[derive(Debug, Clone, Copy)]
enum Identity {
    Seed,
    Nonce,
}

impl Identity {
    const fn name(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::Nonce => "versionNonce",
        }
    }
}

/// Settle `width`, `height` and, for lines and arrows, `points`.
fn apply_extent(primitive: &mut Primitive, raw: &RawElement<'_>, defaults: &KindDefaults) {
    let width = raw.number("width");
    let height = raw.number("height");

    match &mut primitive.kind {
        PrimitiveKind::Line(path) | PrimitiveKind::Arrow(ArrowData { path, .. }) => {
            let end = path.points.last().copied();
            primitive.width = width
                .or(end.map(Point::dx))
                .unwrap_or(if height.is_some() { 0.0 } else { defaults.width });
            primitive.height = height.or(end.map(Point::dy)).unwrap_or(defaults.height);
            if path.points.is_empty() {
                path.points = repair::straight_path(primitive.width, primitive.height);
            }
        }
        PrimitiveKind::Text(text) => {
            let (estimated_width, estimated_height) = repair::estimate_text_extent(text);
            primitive.width = width.unwrap_or(estimated_width);
            primitive.height = height.unwrap_or(estimated_height);
        }
        _ => {
            primitive.width = width.unwrap_or(defaults.width);
            primitive.height = height.unwrap_or(defaults.height);
        }
    }

    repair::absorb_negative_extent(primitive);
    repair::fill_empty_extent(primitive);
}

fn read_style(raw: &RawElement<'_>) -> Style {
    let mut style = defaults::style();
    if let Some(color) = raw.string("strokeColor") {
        style.stroke_color = color.to_string();
    }
    if let Some(color) = raw.string("backgroundColor") {
        style.background_color = color.to_string();
    }
    if let Some(fill) = raw.parse("fillStyle") {
        style.fill_style = fill;
    }
    if let Some(width) = raw.number("strokeWidth").filter(|w| *w > 0.0) {
        style.stroke_width = width;
    }
    if let Some(stroke) = raw.parse("strokeStyle") {
        style.stroke_style = stroke;
    }
    if let Some(roughness) = raw.number("roughness") {
        style.roughness = clamp_to_u8(roughness, defaults::MAX_ROUGHNESS);
    }
    if let Some(opacity) = raw.number("opacity") {
        style.opacity = clamp_to_u8(opacity, defaults::OPACITY);
    }
    style
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=max first
fn clamp_to_u8(value: f64, max: u8) -> u8 {
    value.round().clamp(0.0, f64::from(max)) as u8
}

fn read_text(raw: &RawElement<'_>) -> TextData {
    let content = raw
        .string("text")
        .filter(|text| !text.is_empty())
        .or_else(|| raw.object("label").and_then(|label| label.string("text")))
        .unwrap_or("");
    let mut text = defaults::text(content);
    if let Some(original) = raw.string("originalText") {
        text.original_text = original.to_string();
    }
    if let Some(size) = raw.number("fontSize").filter(|s| *s > 0.0) {
        text.font_size = size;
    }
    if let Some(family) = raw.unsigned("fontFamily").filter(|f| *f > 0) {
        text.font_family = family;
    }
    if let Some(align) = raw.parse("textAlign") {
        text.text_align = align;
    }
    if let Some(align) = raw.parse("verticalAlign") {
        text.vertical_align = align;
    }
    text.container_id = raw.nullable("containerId", read_string).flatten();
    if let Some(line_height) = raw.number("lineHeight").filter(|h| *h > 0.0) {
        text.line_height = line_height;
    }
    if let Some(auto_resize) = raw.boolean("autoResize") {
        text.auto_resize = auto_resize;
    }
    text
}

fn read_image(raw: &RawElement<'_>) -> ImageData {
    let mut image = defaults::image();
    image.file_id = raw.nullable("fileId", read_string).flatten();
    if let Some(status) = raw.parse("status") {
        image.status = status;
    }
    if let Some(Point(sx, sy)) = raw.point("scale") {
        image.scale = [sx, sy];
    }
    image
}

fn read_bound_elements(raw: &RawElement<'_>) -> Vec<BoundElement> {
    raw.get("boundElements")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_object)
                .map(RawElement::from_map)
                .filter_map(|item| {
                    Some(BoundElement {
                        id: item.string("id")?.to_string(),
                        kind: item.string("type")?.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn read_roundness(value: &Value) -> Option<Roundness> {
    let descriptor = RawElement::from_map(value.as_object()?);
    let code = descriptor.get("type")?.as_u64()?;
    Some(Roundness {
        kind: RoundnessType::from_code(code)?,
        value: descriptor.get("value").and_then(as_number),
    })
}

fn read_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

fn read_enum<T: serde::de::DeserializeOwned>(value: &Value) -> Option<T> {
    serde_json::from_value(value.clone()).ok()
}
