//! Fractional ordering keys for the `index` attribute.
//!
//! Keys are base-62 integers with a length prefix: `a` keys have one digit,
//! `b` keys two, and so on up to `z`. They sort lexicographically in the
//! same order as the elements they belong to, which lets the rendering host
//! insert between two elements without renumbering.

/// Base-62 digits in ascending byte order.
const DIGITS: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Key of the first element in a document.
pub const FIRST_KEY: &str = "a0";

/// The integer key that follows `key`, or `None` once the key space is exhausted.
#[must_use]
pub fn key_after(key: &str) -> Option<String> {
    let mut bytes = key.as_bytes().to_vec();
    let head = *bytes.first()?;
    if !head.is_ascii_lowercase() || bytes.len() != usize::from(head - b'a') + 2 {
        return None;
    }

    for position in (1..bytes.len()).rev() {
        let digit = DIGITS.iter().position(|&d| d == bytes[position])?;
        if let Some(&next) = DIGITS.get(digit + 1) {
            bytes[position] = next;
            return String::from_utf8(bytes).ok();
        }
        bytes[position] = DIGITS[0];
    }

    // Every digit wrapped: move to the next, one digit longer, prefix.
    if head == b'z' {
        return None;
    }
    let next_head = head + 1;
    let mut key = String::with_capacity(usize::from(next_head - b'a') + 2);
    key.push(char::from(next_head));
    key.extend(std::iter::repeat('0').take(usize::from(next_head - b'a') + 1));
    Some(key)
}

/// Ascending keys starting at [`FIRST_KEY`].
#[derive(Debug, Clone)]
pub struct OrderingKeys {
    next: Option<String>,
}

impl OrderingKeys {
    /// Start a new key sequence.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next: Some(FIRST_KEY.to_string()),
        }
    }
}

impl Default for OrderingKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for OrderingKeys {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = key_after(&current);
        Some(current)
    }
}
