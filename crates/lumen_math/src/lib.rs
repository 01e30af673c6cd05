// Re-export glam for convenience
pub use glam::{DVec2, DVec3};

/// Double-precision 3-component vector used for points, directions and colors.
///
/// `+`, `-`, `*` (component-wise), scalar scaling, `dot`, `cross` and
/// `normalize` all come from glam.
pub type Vec3 = DVec3;

/// Double-precision 2-component vector, used for film-plane offsets.
pub type Vec2 = DVec2;

// Lumen math types
mod frame;
mod interval;
mod ray;

pub use frame::Frame;
pub use interval::Interval;
pub use ray::Ray;

/// Normalization with the zero-length precondition made explicit.
pub trait UnitVector {
    /// Scale to unit length.
    ///
    /// The caller guarantees a nonzero, finite length. Violations are
    /// programming errors and panic in debug builds.
    fn unit(self) -> Self;
}

impl UnitVector for Vec3 {
    #[inline]
    fn unit(self) -> Self {
        let len_sq = self.length_squared();
        debug_assert!(
            len_sq > 0.0 && len_sq.is_finite(),
            "cannot normalize degenerate vector {self:?}"
        );
        self * (1.0 / len_sq.sqrt())
    }
}
