// tween/curve.rs
//
// Author-supplied easing curve: a list of keyframes evaluated with cubic
// Hermite segments. Used by `Easing::Custom`.

use serde::{Deserialize, Serialize};

/// One control point of a [`Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
    /// Slope arriving at this key.
    #[serde(default)]
    pub in_tangent: f32,
    /// Slope leaving this key.
    #[serde(default)]
    pub out_tangent: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value, in_tangent: 0.0, out_tangent: 0.0 }
    }

    pub fn with_tangents(mut self, in_tangent: f32, out_tangent: f32) -> Self {
        self.in_tangent = in_tangent;
        self.out_tangent = out_tangent;
        self
    }
}

/// Keyframed curve mapping normalized progress to eased progress.
/// Keys are kept sorted by time. Outside the key range the curve holds the
/// first/last value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Curve {
    keys: Vec<Keyframe>,
}

impl Curve {
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keys }
    }

    /// Straight line from (0, 0) to (1, 1).
    pub fn linear() -> Self {
        Self::new(vec![
            Keyframe::new(0.0, 0.0).with_tangents(1.0, 1.0),
            Keyframe::new(1.0, 1.0).with_tangents(1.0, 1.0),
        ])
    }

    pub fn keys(&self) -> &[Keyframe] {
        &self.keys
    }

    /// Sample the curve at `time`. An empty curve evaluates to 0.
    pub fn evaluate(&self, time: f32) -> f32 {
        let (Some(first), Some(last)) = (self.keys.first(), self.keys.last()) else {
            return 0.0;
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        // First key strictly after `time`; guaranteed in 1..len by the checks above.
        let next = self.keys.partition_point(|k| k.time <= time);
        let k0 = &self.keys[next - 1];
        let k1 = &self.keys[next];

        let dt = k1.time - k0.time;
        if dt <= 1e-6 {
            return k1.value;
        }
        let t = ((time - k0.time) / dt).clamp(0.0, 1.0);
        hermite(k0.value, k0.out_tangent * dt, k1.in_tangent * dt, k1.value, t)
    }
}

impl Default for Curve {
    fn default() -> Self {
        Self::linear()
    }
}

impl From<Vec<Keyframe>> for Curve {
    fn from(keys: Vec<Keyframe>) -> Self {
        Self::new(keys)
    }
}

impl From<Curve> for Vec<Keyframe> {
    fn from(curve: Curve) -> Self {
        curve.keys
    }
}

#[inline]
fn hermite(v0: f32, m0: f32, m1: f32, v1: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;

    let s2 = -2.0 * t3 + 3.0 * t2;
    let s3 = t3 - t2;
    let s0 = 1.0 - s2;
    let s1 = s3 - t2 + t;

    s0 * v0 + s1 * m0 + s2 * v1 + s3 * m1
}
