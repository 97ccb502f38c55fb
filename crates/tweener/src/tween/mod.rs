// tween/mod.rs
//
// The tween engine proper: immutable descriptors, the easing library,
// resumable runners, per-animation playback state, and the named controller
// that ties them together.
//
// Playback never mutates descriptors; everything mutable lives in
// `state` and is owned by the `Tweener`.

pub mod controller;
pub mod curve;
pub mod descriptor;
pub mod easing;
pub mod listener;
pub mod runner;
pub mod state;

pub use controller::{plan_group_rewind, MemberTiming, RewindSlot, Tweener};
pub use curve::{Curve, Keyframe};
pub use descriptor::{AxisMask, TweenAnimation, TweenOp};
pub use easing::{Easing, lerp, lerp_vec2, lerp_vec3};
pub use listener::{ColorListener, FloatListener, ValueListeners};
pub use runner::{RunnerStatus, Track, TweenRunner};
pub use state::{ActiveRun, Direction, LastKnown, PlaybackState, Snapshot, StartTimes};
