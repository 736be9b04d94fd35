//! Attribute value parsing for layout documents.
//!
//! Every helper takes the element label used in error messages, the attribute
//! name and the raw value (if the attribute was present).

use super::model::{Color, Pos};
use crate::error::{Error, Result};

/// Parse an integer literal: decimal, or `0x`/`0o`/`0b` prefixed.
fn parse_int_literal(raw: &str) -> Option<i64> {
    let s = raw.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let lower = digits.to_ascii_lowercase();
    let magnitude = if let Some(hex) = lower.strip_prefix("0x") {
        i64::from_str_radix(hex, 16).ok()?
    } else if let Some(oct) = lower.strip_prefix("0o") {
        i64::from_str_radix(oct, 8).ok()?
    } else if let Some(bin) = lower.strip_prefix("0b") {
        i64::from_str_radix(bin, 2).ok()?
    } else {
        lower.parse::<i64>().ok()?
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Integer attribute with a default, checked against the target type's range.
pub(crate) fn int<T>(element: &str, attr: &str, value: Option<&str>, default: T) -> Result<T>
where
    T: TryFrom<i64>,
{
    let Some(raw) = value else {
        return Ok(default);
    };
    let parsed = parse_int_literal(raw)
        .ok_or_else(|| Error::schema(element, format!("{attr}='{raw}' is not an integer")))?;
    T::try_from(parsed)
        .map_err(|_| Error::schema(element, format!("{attr}={parsed} is out of range")))
}

pub(crate) fn float(element: &str, attr: &str, value: Option<&str>, default: f32) -> Result<f32> {
    let Some(raw) = value else {
        return Ok(default);
    };
    raw.trim()
        .parse()
        .map_err(|_| Error::schema(element, format!("{attr}='{raw}' is not a number")))
}

/// Boolean attribute. Only the literals `True` and `False` are accepted.
pub(crate) fn boolean(element: &str, attr: &str, value: Option<&str>, default: bool) -> Result<bool> {
    match value {
        None => Ok(default),
        Some("True") => Ok(true),
        Some("False") => Ok(false),
        Some(other) => Err(Error::schema(
            element,
            format!("{attr}='{other}' must be 'True' or 'False'"),
        )),
    }
}

pub(crate) fn color(element: &str, attr: &str, value: Option<&str>) -> Result<Color> {
    let packed = int::<i64>(element, attr, value, 0)?;
    Ok(Color::unpack(packed))
}

/// Required, non-empty string attribute.
pub(crate) fn required(element: &str, attr: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::schema(element, format!("missing {attr}"))),
    }
}

/// `x;y` position pair. Exactly two components are accepted.
pub(crate) fn pos(element: &str, attr: &str, raw: &str) -> Result<Pos> {
    let parts: Vec<&str> = raw.split(';').collect();
    match parts.as_slice() {
        [x, y] => Ok(Pos::new(
            int(element, attr, Some(*x), 0)?,
            int(element, attr, Some(*y), 0)?,
        )),
        _ if parts.len() > 2 => Err(Error::schema(
            element,
            format!("{attr}='{raw}' has more than 2 components (X;Y)"),
        )),
        _ => Err(Error::schema(
            element,
            format!("{attr}='{raw}' needs 2 components (X;Y)"),
        )),
    }
}
