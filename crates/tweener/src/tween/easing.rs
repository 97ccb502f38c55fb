// tween/easing.rs
//
// Pure easing functions for tween interpolation.
// No dependencies on Entity/Scene, just math.

use std::f32::consts::PI;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use super::curve::Curve;

/// Shape of a tween's progress curve.
/// `In` kinds accelerate from rest, `Out` kinds decelerate into the end value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    Linear,
    QuadIn,
    QuadOut,
    QuadInOut,
    CubicIn,
    CubicOut,
    CubicInOut,
    SineIn,
    SineOut,
    SineInOut,
    /// Sampled from an author-supplied curve. May leave [0, 1].
    Custom(Curve),
}

impl Easing {
    /// Eased progress for normalized time `t`.
    #[inline]
    pub fn apply(&self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,

            // Quadratic
            Easing::QuadIn => t * t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }

            // Cubic
            Easing::CubicIn => t * t * t,
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    (t - 1.0) * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }

            // Sine
            Easing::SineIn => 1.0 - (t * PI / 2.0).cos(),
            Easing::SineOut => (t * PI / 2.0).sin(),
            Easing::SineInOut => -((PI * t).cos() - 1.0) / 2.0,

            Easing::Custom(curve) => curve.evaluate(t),
        }
    }

    /// The opposite member of an in/out pair. InOut, Linear and Custom map to themselves.
    pub fn mirrored(&self) -> Easing {
        match self {
            Easing::QuadIn => Easing::QuadOut,
            Easing::QuadOut => Easing::QuadIn,
            Easing::CubicIn => Easing::CubicOut,
            Easing::CubicOut => Easing::CubicIn,
            Easing::SineIn => Easing::SineOut,
            Easing::SineOut => Easing::SineIn,
            other => other.clone(),
        }
    }

    /// Eased progress, optionally mirrored for playback in reverse.
    /// A mirrored custom curve is reflected through (0.5, 0.5): `1 - curve(1 - t)`.
    #[inline]
    pub fn ease(&self, t: f32, mirror: bool) -> f32 {
        if !mirror {
            return self.apply(t);
        }
        match self {
            Easing::Custom(curve) => 1.0 - curve.evaluate(1.0 - t),
            _ => self.mirrored().apply(t),
        }
    }

    /// Whether this is an author-supplied curve.
    pub fn is_custom(&self) -> bool {
        matches!(self, Easing::Custom(_))
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────
// None of these clamp `t`: custom curves are allowed to overshoot.

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: Vec2, b: Vec2, t: f32) -> Vec2 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec3(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t
}
