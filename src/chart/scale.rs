use crate::errors::{AppError, Result};

/// Affine mapping between a data domain and a pixel range.
///
/// Either interval may be given in decreasing order; a range such as
/// `(width, reserved_width)` flips the axis on purpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Result<Self> {
        if domain.0 == domain.1 {
            return Err(AppError::DomainDegenerate(domain.0));
        }
        Ok(Self { domain, range })
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Unrounded range value for `value`.
    pub fn map(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// Range value for `value`, rounded half up to a whole pixel.
    pub fn forward(&self, value: f64) -> i32 {
        (self.map(value) + 0.5).floor() as i32
    }

    /// Domain value for a range position, unrounded.
    ///
    /// A collapsed range maps everything to the middle of the domain.
    pub fn inverse(&self, position: f64) -> f64 {
        let span = self.range.1 - self.range.0;
        let t = if span == 0.0 {
            0.5
        } else {
            (position - self.range.0) / span
        };
        self.domain.0 + t * (self.domain.1 - self.domain.0)
    }
}
