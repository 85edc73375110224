//! Untrusted generator output.
//!
//! The generator is free to emit anything. This module only insists on the
//! outer structure (a list of JSON objects); below that, every accessor on
//! [`RawElement`] answers `None` for missing, mistyped or non-finite values
//! so callers can fall back to defaults.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::element::Point;
use crate::{SketchError, SketchResult};

/// Raw elements plus any app state carried by a wrapping document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInput {
    /// Element mappings, in z-order.
    pub elements: Vec<Value>,
    /// `appState` of a wrapping document, if the input was one.
    pub app_state: Option<Map<String, Value>>,
}

impl RawInput {
    /// Parse generator text. Markdown code fences around the JSON are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`] if the text is not JSON, or
    /// not an array or a document object with an `elements` array.
    pub fn parse(text: &str) -> SketchResult<Self> {
        let body = strip_code_fences(text);
        let value: Value = serde_json::from_str(body)
            .map_err(|e| SketchError::malformed(format!("invalid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Accept a bare element array, or a document object with `elements`.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`] for any other shape.
    pub fn from_value(value: Value) -> SketchResult<Self> {
        match value {
            Value::Array(elements) => Ok(Self {
                elements,
                app_state: None,
            }),
            Value::Object(mut document) => {
                let elements = match document.remove("elements") {
                    Some(Value::Array(elements)) => elements,
                    Some(_) => {
                        return Err(SketchError::malformed("`elements` is not an array"));
                    }
                    None => {
                        return Err(SketchError::malformed(
                            "expected an element array or a document with `elements`",
                        ));
                    }
                };
                let app_state = match document.remove("appState") {
                    Some(Value::Object(state)) => Some(state),
                    _ => None,
                };
                Ok(Self {
                    elements,
                    app_state,
                })
            }
            other => Err(SketchError::malformed(format!(
                "expected an element array, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

/// Remove a surrounding markdown code fence (```` ``` ```` or ```` ```json ````).
#[must_use]
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // The info string runs to the end of the opening fence line.
    let rest = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Read-only, permissive view over one untrusted element mapping.
#[derive(Debug, Clone, Copy)]
pub struct RawElement<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> RawElement<'a> {
    /// View the element at `index` of the input list.
    ///
    /// # Errors
    ///
    /// Returns [`SketchError::MalformedDocument`] if the value is not an object.
    pub fn new(value: &'a Value, index: usize) -> SketchResult<Self> {
        value.as_object().map(Self::from_map).ok_or_else(|| {
            SketchError::malformed(format!(
                "element {index} is {}, expected an object",
                json_type_name(value)
            ))
        })
    }

    /// View an already-checked mapping.
    #[must_use]
    pub const fn from_map(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// Whether the key is present at all (even as `null`).
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// The raw value under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key)
    }

    /// A finite number. Numeric strings such as `"120"` are accepted.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(as_number)
    }

    /// A whole number that fits in `u32`.
    #[must_use]
    pub fn unsigned(&self, key: &str) -> Option<u32> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// A whole number that fits in `u64`.
    #[must_use]
    pub fn timestamp(&self, key: &str) -> Option<u64> {
        match self.get(key)? {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    /// A string.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&'a str> {
        self.get(key).and_then(Value::as_str)
    }

    /// A boolean.
    #[must_use]
    pub fn boolean(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// A nested mapping.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<RawElement<'a>> {
        self.get(key).and_then(Value::as_object).map(Self::from_map)
    }

    /// Any value that deserializes into `T` (enum names and the like).
    #[must_use]
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// A list of strings. Non-string entries are skipped.
    #[must_use]
    pub fn strings(&self, key: &str) -> Option<Vec<String>> {
        let items = self.get(key)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        )
    }

    /// A `[dx, dy]` pair.
    #[must_use]
    pub fn point(&self, key: &str) -> Option<Point> {
        self.get(key).and_then(as_point)
    }

    /// A list of `[dx, dy]` pairs. One malformed pair invalidates the path.
    #[must_use]
    pub fn points(&self, key: &str) -> Option<Vec<Point>> {
        self.get(key)?.as_array()?.iter().map(as_point).collect()
    }

    /// Tri-state lookup for nullable attributes.
    ///
    /// - `None`: missing or unusable, the caller should apply its default.
    /// - `Some(None)`: explicitly `null`.
    /// - `Some(Some(v))`: a usable value.
    #[must_use]
    pub fn nullable<T>(
        &self,
        key: &str,
        read: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<Option<T>> {
        match self.get(key)? {
            Value::Null => Some(None),
            value => read(value).map(Some),
        }
    }
}

/// Interpret a JSON value as a finite number.
#[must_use]
pub fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn as_point(value: &Value) -> Option<Point> {
    match value.as_array()?.as_slice() {
        [dx, dy] => Some(Point::new(as_number(dx)?, as_number(dy)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::element::Arrowhead;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
        assert_eq!(strip_code_fences("```\n[]\n```\n"), "[]");
        assert_eq!(strip_code_fences("  [3]  "), "[3]");
        assert_eq!(strip_code_fences("```json[]```"), "[]");
    }

    #[test]
    fn test_parse_fenced_array() {
        let input = RawInput::parse("```json\n[{\"type\": \"rectangle\"}]\n```")
            .expect("fenced array parses");
        assert_eq!(input.elements.len(), 1);
        assert!(input.app_state.is_none());
    }

    #[test]
    fn test_parse_document_object() {
        let input = RawInput::parse(
            r##"{"type": "excalidraw", "elements": [], "appState": {"viewBackgroundColor": "#000"}}"##,
        )
        .expect("document parses");
        assert!(input.elements.is_empty());
        let state = input.app_state.expect("app state kept");
        assert_eq!(state["viewBackgroundColor"], "#000");
    }

    #[test]
    fn test_parse_rejects_structural_errors() {
        assert!(matches!(
            RawInput::parse("not json"),
            Err(SketchError::MalformedDocument(_))
        ));
        assert!(matches!(
            RawInput::parse("42"),
            Err(SketchError::MalformedDocument(_))
        ));
        assert!(matches!(
            RawInput::parse(r#"{"elements": {}}"#),
            Err(SketchError::MalformedDocument(_))
        ));
        assert!(matches!(
            RawInput::parse(r#"{"type": "excalidraw"}"#),
            Err(SketchError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_raw_element_requires_object() {
        let value = json!("rectangle");
        let err = RawElement::new(&value, 4).expect_err("string is not an element");
        assert!(err.to_string().contains("element 4 is a string"));
    }

    #[test]
    fn test_number_accessor_is_permissive() {
        let value = json!({ "a": 12.5, "b": "40", "c": "wide", "d": true, "e": null });
        let raw = RawElement::new(&value, 0).expect("object");
        assert_eq!(raw.number("a"), Some(12.5));
        assert_eq!(raw.number("b"), Some(40.0));
        assert_eq!(raw.number("c"), None);
        assert_eq!(raw.number("d"), None);
        assert_eq!(raw.number("e"), None);
        assert_eq!(raw.number("missing"), None);
    }

    #[test]
    fn test_number_rejects_non_finite_strings() {
        let value = json!({ "w": "NaN", "h": "inf" });
        let raw = RawElement::new(&value, 0).expect("object");
        assert_eq!(raw.number("w"), None);
        assert_eq!(raw.number("h"), None);
    }

    #[test]
    fn test_unsigned_accessor() {
        let value = json!({ "a": 7, "b": -1, "c": 1.5, "d": 5_000_000_000_u64 });
        let raw = RawElement::new(&value, 0).expect("object");
        assert_eq!(raw.unsigned("a"), Some(7));
        assert_eq!(raw.unsigned("b"), None);
        assert_eq!(raw.unsigned("c"), None);
        assert_eq!(raw.unsigned("d"), None);
    }

    #[test]
    fn test_points_accessor() {
        let value = json!({
            "ok": [[0, 0], [20, "5"]],
            "bad": [[0, 0], [1]],
            "empty": []
        });
        let raw = RawElement::new(&value, 0).expect("object");
        assert_eq!(
            raw.points("ok"),
            Some(vec![Point::new(0.0, 0.0), Point::new(20.0, 5.0)])
        );
        assert_eq!(raw.points("bad"), None);
        assert_eq!(raw.points("empty"), Some(Vec::new()));
    }

    #[test]
    fn test_nullable_distinguishes_null_from_missing() {
        let value = json!({ "start": null, "end": "bar", "odd": "spiral" });
        let raw = RawElement::new(&value, 0).expect("object");
        let parse = |v: &Value| serde_json::from_value::<Arrowhead>(v.clone()).ok();
        assert_eq!(raw.nullable("start", parse), Some(None));
        assert_eq!(raw.nullable("end", parse), Some(Some(Arrowhead::Bar)));
        assert_eq!(raw.nullable("odd", parse), None);
        assert_eq!(raw.nullable("missing", parse), None);
    }

    #[test]
    fn test_strings_skips_non_strings() {
        let value = json!({ "groupIds": ["g1", 3, "g2"] });
        let raw = RawElement::new(&value, 0).expect("object");
        assert_eq!(
            raw.strings("groupIds"),
            Some(vec!["g1".to_string(), "g2".to_string()])
        );
    }
}
