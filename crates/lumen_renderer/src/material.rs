//! Surface transport models.
//!
//! A sphere carries one of three material tags. The estimator matches on the
//! tag and uses the helpers below to build the continuation ray.

use lumen_math::{Frame, UnitVector, Vec3};
use std::f64::consts::PI;

/// Color type alias (linear RGB radiance or albedo)
pub type Color = Vec3;

/// Index of refraction outside dielectric objects.
pub const AIR_IOR: f64 = 1.0;

/// Index of refraction of the glass material.
pub const GLASS_IOR: f64 = 1.5;

/// How light leaves a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Ideal Lambertian reflector, sampled with a cosine-weighted lobe.
    Diffuse,
    /// Perfect mirror.
    Specular,
    /// Smooth glass with Fresnel-weighted reflection and refraction.
    Dielectric,
}

/// Outcome of refracting through a dielectric interface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Refraction {
    /// Unit direction of the transmitted ray
    pub direction: Vec3,
    /// Fresnel reflectance `Re` from Schlick's approximation
    pub reflectance: f64,
}

impl Refraction {
    /// Fraction of energy carried by the transmitted ray.
    #[inline]
    pub fn transmittance(&self) -> f64 {
        1.0 - self.reflectance
    }
}

/// Cosine-weighted direction in the hemisphere around `nl`.
///
/// `r1` and `r2` are uniform draws in [0, 1). `r1` selects the azimuth and
/// `r2` the squared sine of the polar angle.
pub fn diffuse_direction(nl: Vec3, r1: f64, r2: f64) -> Vec3 {
    let phi = 2.0 * PI * r1;
    let r2s = r2.sqrt();
    let frame = Frame::from_normal(nl);
    frame
        .to_world(Vec3::new(phi.cos() * r2s, phi.sin() * r2s, (1.0 - r2).sqrt()))
        .unit()
}

/// Reflect a vector about a normal.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - n * (2.0 * n.dot(v))
}

/// Schlick's approximation for reflectance.
#[inline]
pub fn schlick(r0: f64, c: f64) -> f64 {
    r0 + (1.0 - r0) * c.powi(5)
}

/// Refract `d` through the glass surface with outward normal `n`.
///
/// `nl` is the normal oriented against `d`; it tells whether the ray is
/// entering or leaving the glass. Returns `None` on total internal
/// reflection.
pub fn refract(d: Vec3, n: Vec3, nl: Vec3) -> Option<Refraction> {
    let into = n.dot(nl) > 0.0;
    let nnt = if into {
        AIR_IOR / GLASS_IOR
    } else {
        GLASS_IOR / AIR_IOR
    };
    let ddn = d.dot(nl);
    let cos2t = 1.0 - nnt * nnt * (1.0 - ddn * ddn);
    if cos2t < 0.0 {
        return None;
    }

    let sign = if into { 1.0 } else { -1.0 };
    let direction = (d * nnt - n * (sign * (ddn * nnt + cos2t.sqrt()))).unit();

    let a = GLASS_IOR - AIR_IOR;
    let b = GLASS_IOR + AIR_IOR;
    let r0 = (a * a) / (b * b);
    let c = 1.0 - if into { -ddn } else { direction.dot(n) };

    Some(Refraction {
        direction,
        reflectance: schlick(r0, c),
    })
}
