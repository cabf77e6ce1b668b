//! The box type stored for every object.
use crate::errors::*;

/// An axis-aligned box given by its top-left corner and a width/height.
///
/// The grid never stores a box unless it passed [Bbox::new]: width and height are strictly positive and every
/// component is finite.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Bbox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bbox {
    /// Build a box, rejecting empty, inverted, or non-finite input.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Result<Bbox> {
        // Written as negations so that NaN fails the size checks.
        let sized = w > 0.0 && h > 0.0;
        let finite = x.is_finite() && y.is_finite() && w.is_finite() && h.is_finite();
        if !(sized && finite) {
            return Err(Error::InvalidDimensions { w, h });
        }

        Ok(Bbox { x, y, w, h })
    }

    /// The corner opposite `(x, y)`.
    pub fn get_p2(&self) -> (f64, f64) {
        (self.x + self.w, self.y + self.h)
    }

    /// Whether the interiors of two boxes overlap.
    ///
    /// The grid itself only ever answers "which objects share a cell with this box"; callers wanting exact
    /// collisions run this (or something better) over the candidates.
    pub fn intersects(&self, other: &Bbox) -> bool {
        let (sx2, sy2) = self.get_p2();
        let (ox2, oy2) = other.get_p2();
        self.x < ox2 && other.x < sx2 && self.y < oy2 && other.y < sy2
    }
}

impl From<Bbox> for (f64, f64, f64, f64) {
    fn from(b: Bbox) -> Self {
        (b.x, b.y, b.w, b.h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_boxes() {
        for (w, h) in [(0.0, 1.0), (1.0, 0.0), (-1.0, 5.0), (f64::NAN, 1.0), (1.0, f64::INFINITY)] {
            assert!(
                matches!(Bbox::new(0.0, 0.0, w, h), Err(Error::InvalidDimensions { .. })),
                "{} x {} should be rejected",
                w,
                h
            );
        }

        assert!(Bbox::new(f64::NEG_INFINITY, 0.0, 1.0, 1.0).is_err());
        assert!(Bbox::new(0.0, f64::NAN, 1.0, 1.0).is_err());
    }

    #[test]
    fn intersection_excludes_touching_edges() -> anyhow::Result<()> {
        let a = Bbox::new(0.0, 0.0, 10.0, 10.0)?;
        let b = Bbox::new(5.0, 5.0, 10.0, 10.0)?;
        let touching = Bbox::new(10.0, 0.0, 5.0, 5.0)?;
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&touching));
        Ok(())
    }
}
