//! Number formatting and comparison helpers shared by the book and chart models.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};

use crate::errors::{AppError, Result};
use crate::models::PriceSplit;

/// Anything the formatter accepts: plain numbers or numeric strings.
///
/// Strings are trimmed and parsed as `f64` (so `"12.34e+4"` works). An empty
/// string is zero; anything unparsable becomes NaN and is rejected by
/// [`format_number`].
pub trait AsNumber {
    fn as_number(&self) -> f64;
}

impl AsNumber for f64 {
    fn as_number(&self) -> f64 {
        *self
    }
}

impl AsNumber for f32 {
    fn as_number(&self) -> f64 {
        f64::from(*self)
    }
}

impl AsNumber for i64 {
    fn as_number(&self) -> f64 {
        *self as f64
    }
}

impl AsNumber for i32 {
    fn as_number(&self) -> f64 {
        f64::from(*self)
    }
}

impl AsNumber for u64 {
    fn as_number(&self) -> f64 {
        *self as f64
    }
}

impl AsNumber for str {
    fn as_number(&self) -> f64 {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return 0.0;
        }
        trimmed.parse().unwrap_or(f64::NAN)
    }
}

impl AsNumber for String {
    fn as_number(&self) -> f64 {
        self.as_str().as_number()
    }
}

impl<T: AsNumber + ?Sized> AsNumber for &T {
    fn as_number(&self) -> f64 {
        (**self).as_number()
    }
}

/// Formats `value` as a fixed-point decimal with exactly `fraction_digits`
/// digits after the point.
///
/// No digit grouping and no exponent, whatever the magnitude. The value is
/// taken at its shortest round-trip decimal representation and rounded half
/// away from zero from there.
///
/// ```
/// use orderbook_depth::numeric::format_number;
///
/// assert_eq!(format_number(123.456789, 2).unwrap(), "123.46");
/// assert_eq!(format_number("12.34e+4", 1).unwrap(), "123400.0");
/// ```
pub fn format_number(value: impl AsNumber, fraction_digits: usize) -> Result<String> {
    let number = value.as_number();
    if !number.is_finite() {
        return Err(AppError::Format(number));
    }

    // `{:e}` renders the shortest representation that round-trips.
    let decimal = BigDecimal::from_str(&format!("{number:e}"))?;
    let rounded = decimal
        .with_scale_round(fraction_digits as i64, RoundingMode::HalfUp)
        .to_plain_string();

    // A negative input that rounds to zero keeps its sign.
    if number < 0.0 && !rounded.starts_with('-') {
        Ok(format!("-{rounded}"))
    } else {
        Ok(rounded)
    }
}

/// Splits `current` at the first character that differs from `previous`.
///
/// Used to dim the unchanged leading digits of a price and emphasize the
/// changed tail. When `current` is longer than `previous` nothing is
/// compared and the whole value is the suffix.
///
/// ```
/// use orderbook_depth::numeric::diff_numeric_strings;
///
/// let split = diff_numeric_strings("1234", "1244");
/// assert_eq!((split.prefix.as_str(), split.suffix.as_str()), ("12", "44"));
/// ```
pub fn diff_numeric_strings(previous: &str, current: &str) -> PriceSplit {
    let (prefix, suffix) = if current.chars().count() > previous.chars().count() {
        ("", current)
    } else {
        let mut prev = previous.chars();
        let split_at = current
            .char_indices()
            .find(|&(_, c)| prev.next() != Some(c))
            .map(|(idx, _)| idx);
        match split_at {
            Some(idx) => current.split_at(idx),
            None => (current, current),
        }
    };

    if prefix == suffix {
        PriceSplit::new(prefix, "")
    } else {
        PriceSplit::new(prefix, suffix)
    }
}

/// Index of the element of an ascending slice closest to `target`.
///
/// Ties go to the lower index. Returns `None` for an empty slice.
pub fn closest_index(target: f64, sorted: &[f64]) -> Option<usize> {
    if sorted.is_empty() {
        return None;
    }
    let mut lo = 0;
    let mut hi = sorted.len() - 1;
    while hi - lo > 1 {
        let mid = (lo + hi) / 2;
        if sorted[mid] < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    if target - sorted[lo] <= sorted[hi] - target {
        Some(lo)
    } else {
        Some(hi)
    }
}
