use crate::constants::*;
use crate::surface::{ElementId, Surface};

/// Settings read from the container's attributes at initialization.
#[derive(Debug, Clone, PartialEq)]
pub struct SlideshowConfig {
    pub id: String,
    pub fx: String,
    pub timeout_ms: u64,
    pub autoheight: bool,
    pub meta: bool,
}

impl SlideshowConfig {
    /// Reads `data-slide-*` attributes off `container`. The id is supplied by
    /// the caller since generating one depends on the live registry.
    pub fn from_container(surface: &dyn Surface, container: ElementId, id: String) -> Self {
        let fx = surface
            .attribute(container, ATTR_FX)
            .filter(|fx| !fx.is_empty())
            .unwrap_or_else(|| DEFAULT_FX.to_string());
        let timeout_ms = surface
            .attribute(container, ATTR_TIMEOUT)
            .and_then(|raw| parse_int(&raw))
            .map(|ms| ms.max(0) as u64) // negative delays behave as zero
            .unwrap_or(DEFAULT_TIMEOUT_MS);

        Self {
            id,
            fx,
            timeout_ms,
            autoheight: surface.attribute(container, ATTR_AUTOHEIGHT).as_deref() == Some("true"),
            meta: surface.attribute(container, ATTR_META).as_deref() == Some("true"),
        }
    }
}

/// Integer prefix of `raw` the way `parseInt(raw, 10)` reads it:
/// leading whitespace, an optional sign, then digits up to the first non-digit.
pub fn parse_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}
