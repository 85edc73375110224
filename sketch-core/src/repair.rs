//! Geometry repair: cross-field consistency fixes over sanitized primitives.
//!
//! Each rule is a small named function that reports whether it changed
//! anything. [`repair`] applies them in one pass, preserving order:
//!
//! 1. [`absorb_negative_extent`] and [`fill_empty_extent`]
//! 2. [`reclassify_steep_arrow`] (optional, see [`RepairOptions`])
//! 3. [`resync_path`]
//! 4. [`echo_text`]
//!
//! Running the pass twice gives the same result as running it once.

use crate::defaults::{self, KindDefaults};
use crate::element::{ArrowData, Point, Primitive, PrimitiveKind, TextData};

/// Switches for the heuristic rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairOptions {
    /// Turn arrows taller than they are wide into plain vertical lines.
    pub reclassify_steep_arrows: bool,
}

impl Default for RepairOptions {
    fn default() -> Self {
        Self {
            reclassify_steep_arrows: true,
        }
    }
}

/// How many times each rule fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairReport {
    /// Negative, zero or missing extents corrected.
    pub extents_normalized: usize,
    /// Arrows turned into lines.
    pub arrows_reclassified: usize,
    /// Paths regenerated to match the extent.
    pub paths_resynced: usize,
    /// Texts whose `originalText` was overwritten.
    pub texts_echoed: usize,
}

impl RepairReport {
    /// Total number of fixes applied.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.extents_normalized + self.arrows_reclassified + self.paths_resynced + self.texts_echoed
    }
}

/// Repaired primitives plus what was done to them.
#[derive(Debug, Clone)]
pub struct Repaired {
    /// Primitives in their original order.
    pub primitives: Vec<Primitive>,
    /// Rule counters.
    pub report: RepairReport,
}

/// Run every repair rule over the sequence.
#[must_use]
pub fn repair(primitives: Vec<Primitive>, options: RepairOptions) -> Repaired {
    let mut report = RepairReport::default();
    let primitives = primitives
        .into_iter()
        .map(|mut primitive| {
            repair_one(&mut primitive, options, &mut report);
            primitive
        })
        .collect();
    Repaired { primitives, report }
}

fn repair_one(primitive: &mut Primitive, options: RepairOptions, report: &mut RepairReport) {
    let absorbed = absorb_negative_extent(primitive);
    let filled = fill_empty_extent(primitive);
    if absorbed || filled {
        report.extents_normalized += 1;
    }
    if options.reclassify_steep_arrows && reclassify_steep_arrow(primitive) {
        report.arrows_reclassified += 1;
    }
    if resync_path(primitive) {
        report.paths_resynced += 1;
    }
    if echo_text(primitive) {
        report.texts_echoed += 1;
    }
}

/// The two-point path from the origin to `(width, height)`.
#[must_use]
pub fn straight_path(width: f64, height: f64) -> Vec<Point> {
    vec![Point::ORIGIN, Point::new(width, height)]
}

/// Approximate the box a text needs: widest line by line count.
#[must_use]
#[allow(clippy::cast_precision_loss)] // glyph counts are small
pub fn estimate_text_extent(text: &TextData) -> (f64, f64) {
    let lines: Vec<&str> = text.text.split('\n').collect();
    let widest = lines
        .iter()
        .map(|line| line.chars().count())
        .max()
        .unwrap_or(0)
        .max(1);
    let width = widest as f64 * text.font_size * defaults::GLYPH_WIDTH_RATIO;
    let height = lines.len() as f64 * text.font_size * text.line_height;
    (saturate(width), saturate(height))
}

/// Pull an overflowed coordinate back to the largest finite value of its sign.
///
/// Inputs are finite, but sums and products of large ones are not; JSON has
/// no infinity and would write `null`.
#[must_use]
pub fn saturate(value: f64) -> f64 {
    value.clamp(f64::MIN, f64::MAX)
}

/// Move negative extent components into the position.
///
/// The anchor shifts by the negative delta, the extent becomes its absolute
/// value, and lines and arrows get a fresh straight path, so the drawn
/// endpoints stay where they were.
pub fn absorb_negative_extent(primitive: &mut Primitive) -> bool {
    if primitive.width >= 0.0 && primitive.height >= 0.0 {
        return false;
    }
    if primitive.width < 0.0 {
        primitive.x = saturate(primitive.x + primitive.width);
        primitive.width = -primitive.width;
    }
    if primitive.height < 0.0 {
        primitive.y = saturate(primitive.y + primitive.height);
        primitive.height = -primitive.height;
    }
    if let Some(path) = primitive.kind.path_mut() {
        path.points = straight_path(primitive.width, primitive.height);
    }
    tracing::debug!(id = %primitive.id, "absorbed negative extent");
    true
}

/// Give shapes a positive extent. Lines and arrows may be zero in one axis.
pub fn fill_empty_extent(primitive: &mut Primitive) -> bool {
    if primitive.is_linear() || (primitive.width > 0.0 && primitive.height > 0.0) {
        return false;
    }
    let (width, height) = match &primitive.kind {
        PrimitiveKind::Text(text) => estimate_text_extent(text),
        kind => {
            let defaults = KindDefaults::for_type(&kind.element_type());
            (defaults.width, defaults.height)
        }
    };
    if primitive.width <= 0.0 {
        primitive.width = width;
    }
    if primitive.height <= 0.0 {
        primitive.height = height;
    }
    tracing::debug!(id = %primitive.id, "filled empty extent");
    true
}

/// Whether an arrow is taller than it is wide.
///
/// This is a heuristic: generators often tag vertical connectors (sequence
/// diagram lifelines, for one) as arrows. It also matches genuinely steep
/// directional arrows, which is why [`RepairOptions`] can turn it off.
#[must_use]
pub fn is_steep_arrow(primitive: &Primitive) -> bool {
    matches!(primitive.kind, PrimitiveKind::Arrow(_)) && primitive.height > primitive.width
}

/// Turn a steep arrow into a vertical line without arrowheads.
///
/// The width collapses to zero and the path becomes `[[0, 0], [0, height]]`.
pub fn reclassify_steep_arrow(primitive: &mut Primitive) -> bool {
    if !is_steep_arrow(primitive) {
        return false;
    }
    primitive.kind = match std::mem::replace(&mut primitive.kind, PrimitiveKind::Rectangle) {
        PrimitiveKind::Arrow(ArrowData { mut path, .. }) => {
            path.start_arrowhead = None;
            path.end_arrowhead = None;
            path.points = straight_path(0.0, primitive.height);
            primitive.width = 0.0;
            PrimitiveKind::Line(path)
        }
        other => other,
    };
    tracing::debug!(id = %primitive.id, height = primitive.height, "reclassified steep arrow as line");
    true
}

/// Regenerate a line or arrow path whose last point is not the extent.
pub fn resync_path(primitive: &mut Primitive) -> bool {
    let end = primitive.extent_point();
    let Some(path) = primitive.kind.path_mut() else {
        return false;
    };
    if path.points.len() >= 2 && path.points.last() == Some(&end) {
        return false;
    }
    path.points = straight_path(end.dx(), end.dy());
    tracing::debug!(id = %primitive.id, "resynced path to extent");
    true
}

/// Copy `text` over `originalText`.
pub fn echo_text(primitive: &mut Primitive) -> bool {
    match &mut primitive.kind {
        PrimitiveKind::Text(text) if text.original_text != text.text => {
            text.original_text.clone_from(&text.text);
            true
        }
        _ => false,
    }
}
