// tween/descriptor.rs
//
// Author-supplied animation definitions. Immutable at runtime; everything
// that changes during playback lives in `tween::state`.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use crate::api::types::{Color, TargetId};
use super::easing::Easing;

/// Per-axis ignore flags. An ignored axis keeps its start value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisMask {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisMask {
    pub const NONE: AxisMask = AxisMask { x: false, y: false, z: false };

    pub fn new(x: bool, y: bool, z: bool) -> Self {
        Self { x, y, z }
    }

    /// Take `end`, except ignored axes which come from `keep`.
    pub fn pin_vec2(self, end: Vec2, keep: Vec2) -> Vec2 {
        Vec2::new(
            if self.x { keep.x } else { end.x },
            if self.y { keep.y } else { end.y },
        )
    }

    /// Take `end`, except ignored axes which come from `keep`.
    pub fn pin_vec3(self, end: Vec3, keep: Vec3) -> Vec3 {
        Vec3::new(
            if self.x { keep.x } else { end.x },
            if self.y { keep.y } else { end.y },
            if self.z { keep.z } else { end.z },
        )
    }
}

/// What property an animation drives, with only the payload that kind needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TweenOp {
    /// Anchored (parent-relative) position.
    Move { target: Vec2 },
    /// World position toward another object. With `chase`, the goal is
    /// re-read every tick.
    MoveToTarget {
        goal: Option<TargetId>,
        #[serde(default)]
        chase: bool,
    },
    /// Local scale.
    Scale {
        #[serde(default = "default_scale")]
        target: Vec3,
    },
    /// Local euler angles in degrees.
    Rotate { target: Vec3 },
    /// Opacity channel.
    Fade {
        #[serde(default = "default_alpha")]
        target_alpha: f32,
    },
    /// Host-defined float, delivered through listeners.
    CustomFloat { start: f32, end: f32 },
    /// Host-defined color, delivered through listeners.
    CustomColor {
        #[serde(default)]
        start: Color,
        #[serde(default)]
        end: Color,
    },
}

impl TweenOp {
    /// Whether this op writes to listeners instead of a scene target.
    pub fn is_custom(&self) -> bool {
        matches!(self, TweenOp::CustomFloat { .. } | TweenOp::CustomColor { .. })
    }
}

/// One named animation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweenAnimation {
    /// Unique key within the owning tweener.
    pub name: String,
    /// Group key. Empty means ungrouped.
    #[serde(default)]
    pub group: String,
    /// Disabled animations are never started and do not count toward group timing.
    #[serde(default = "default_true")]
    pub enabled: bool,
    pub op: TweenOp,
    /// Seconds.
    #[serde(default = "default_duration")]
    pub duration: f32,
    /// Seconds before interpolation begins.
    #[serde(default)]
    pub delay: f32,
    #[serde(default)]
    pub easing: Easing,
    #[serde(default)]
    pub mirror_ease_on_rewind: bool,
    #[serde(default)]
    pub unrewindable: bool,
    #[serde(default = "default_true")]
    pub snap_to_end_state: bool,
    #[serde(default)]
    pub ignore: AxisMask,
    /// Write to this object instead of the tweener's owner.
    #[serde(default)]
    pub target_override: Option<TargetId>,
}

impl TweenAnimation {
    /// New animation with default timing (1 s, no delay, linear, snapping).
    pub fn new(name: impl Into<String>, op: TweenOp) -> Self {
        Self {
            name: name.into(),
            group: String::new(),
            enabled: true,
            op,
            duration: 1.0,
            delay: 0.0,
            easing: Easing::Linear,
            mirror_ease_on_rewind: false,
            unrewindable: false,
            snap_to_end_state: true,
            ignore: AxisMask::NONE,
            target_override: None,
        }
    }

    pub fn move_to(name: impl Into<String>, target: Vec2) -> Self {
        Self::new(name, TweenOp::Move { target })
    }

    pub fn move_to_target(name: impl Into<String>, goal: TargetId, chase: bool) -> Self {
        Self::new(name, TweenOp::MoveToTarget { goal: Some(goal), chase })
    }

    pub fn scale(name: impl Into<String>, target: Vec3) -> Self {
        Self::new(name, TweenOp::Scale { target })
    }

    pub fn rotate(name: impl Into<String>, target: Vec3) -> Self {
        Self::new(name, TweenOp::Rotate { target })
    }

    pub fn fade(name: impl Into<String>, target_alpha: f32) -> Self {
        Self::new(name, TweenOp::Fade { target_alpha })
    }

    pub fn custom_float(name: impl Into<String>, start: f32, end: f32) -> Self {
        Self::new(name, TweenOp::CustomFloat { start, end })
    }

    pub fn custom_color(name: impl Into<String>, start: Color, end: Color) -> Self {
        Self::new(name, TweenOp::CustomColor { start, end })
    }

    // -- Builder methods --

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_mirror_ease_on_rewind(mut self, mirror: bool) -> Self {
        self.mirror_ease_on_rewind = mirror;
        self
    }

    pub fn with_snap(mut self, snap: bool) -> Self {
        self.snap_to_end_state = snap;
        self
    }

    pub fn with_ignore(mut self, ignore: AxisMask) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_target(mut self, target: TargetId) -> Self {
        self.target_override = Some(target);
        self
    }

    pub fn unrewindable(mut self) -> Self {
        self.unrewindable = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Whether this animation belongs to `group`. The empty group matches nothing.
    pub fn in_group(&self, group: &str) -> bool {
        !group.is_empty() && self.group == group
    }
}

fn default_true() -> bool {
    true
}

fn default_duration() -> f32 {
    1.0
}

fn default_scale() -> Vec3 {
    Vec3::ONE
}

fn default_alpha() -> f32 {
    1.0
}
