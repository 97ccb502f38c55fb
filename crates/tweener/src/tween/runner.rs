// tween/runner.rs
//
// One in-flight interpolation as a resumable task.
// The controller creates it with fixed endpoints, then `tick` is called once
// per host frame until it reports completion. Dropping a runner cancels it;
// nothing it wrote is undone.
//
//   let mut runner = TweenRunner::new(id, Track::Alpha { from: 0.0, to: 1.0 }, 1.0, 0.0, false);
//   runner.tick(dt, &anim, &mut scene, &mut last_known, &mut listeners);

use glam::{Vec2, Vec3};
use crate::api::types::{Color, TargetId};
use crate::core::scene::Scene;
use super::descriptor::{AxisMask, TweenAnimation};
use super::easing::{lerp, lerp_vec2, lerp_vec3};
use super::listener::ValueListeners;
use super::state::LastKnown;

/// Slack on phase boundaries, in seconds.
const TIME_EPSILON: f32 = 1e-5;

/// Which property a runner writes and between which values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Track {
    /// Entity.anchored_pos
    Anchored { from: Vec2, to: Vec2 },
    /// Entity.pos
    World { from: Vec3, to: Vec3 },
    /// Entity.pos, blending from a fixed start toward `goal`'s live position.
    Follow { from: Vec3, goal: TargetId, ignore: AxisMask },
    /// Entity.scale
    Scale { from: Vec3, to: Vec3 },
    /// Entity.rotation
    Rotation { from: Vec3, to: Vec3 },
    /// Entity.opacity
    Alpha { from: f32, to: f32 },
    /// Custom float listeners
    Float { from: f32, to: f32 },
    /// Custom color listeners
    Color { from: Color, to: Color },
}

/// Result of advancing a runner by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerStatus {
    /// Still waiting out the delay or interpolating.
    Running,
    /// Reached the end (and snapped, if configured).
    Finished,
    /// The target or goal disappeared; no further writes.
    Aborted,
}

/// Where on the track to write.
#[derive(Clone, Copy)]
enum Sample {
    /// Eased progress, possibly outside [0, 1].
    At(f32),
    /// Exactly the end value.
    End,
}

#[derive(Debug, Clone)]
pub struct TweenRunner {
    target: TargetId,
    track: Track,
    duration: f32,
    delay: f32,
    /// Use the mirrored easing (rewinds of `mirror_ease_on_rewind` animations).
    mirror: bool,
    /// Run time so far, delay included.
    time: f32,
    /// Set once the delay is over and the start value has been emitted.
    started: bool,
}

impl TweenRunner {
    pub fn new(target: TargetId, track: Track, duration: f32, delay: f32, mirror: bool) -> Self {
        let delay = delay.max(0.0);
        Self {
            target,
            track,
            duration,
            delay,
            mirror,
            time: 0.0,
            started: false,
        }
    }

    pub fn target(&self) -> TargetId {
        self.target
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn delay(&self) -> f32 {
        self.delay
    }

    /// Whether the delay is still running.
    pub fn is_waiting(&self) -> bool {
        !self.started
    }

    /// Advance by `dt` seconds and write this frame's value.
    pub fn tick(
        &mut self,
        dt: f32,
        anim: &TweenAnimation,
        scene: &mut Scene,
        last_known: &mut LastKnown,
        listeners: &mut ValueListeners,
    ) -> RunnerStatus {
        self.time += dt.max(0.0);

        if !self.started {
            if self.time < self.delay - TIME_EPSILON {
                return RunnerStatus::Running;
            }
            self.started = true;
            self.emit_start(last_known, listeners);
        }

        // Within TIME_EPSILON of `delay + duration` counts as the end.
        let finished = self.time >= self.delay + self.duration - TIME_EPSILON;
        let raw_t = if finished || self.duration <= 0.0 {
            1.0
        } else {
            ((self.time - self.delay) / self.duration).clamp(0.0, 1.0)
        };
        let eased_t = anim.easing.ease(raw_t, self.mirror);

        if !self.write(Sample::At(eased_t), scene, last_known, listeners) {
            return RunnerStatus::Aborted;
        }

        if finished {
            if anim.snap_to_end_state && !self.write(Sample::End, scene, last_known, listeners) {
                return RunnerStatus::Aborted;
            }
            return RunnerStatus::Finished;
        }

        RunnerStatus::Running
    }

    /// Custom tracks report their start value as soon as interpolation begins.
    fn emit_start(&self, last_known: &mut LastKnown, listeners: &mut ValueListeners) {
        match self.track {
            Track::Float { from, .. } => {
                last_known.float = Some(from);
                listeners.emit_float(from);
            }
            Track::Color { from, .. } => {
                last_known.color = Some(from);
                listeners.emit_color(from);
            }
            _ => {}
        }
    }

    /// Returns false when the target (or follow goal) is gone.
    fn write(
        &self,
        sample: Sample,
        scene: &mut Scene,
        last_known: &mut LastKnown,
        listeners: &mut ValueListeners,
    ) -> bool {
        match self.track {
            Track::Float { from, to } => {
                let v = match sample {
                    Sample::At(t) => lerp(from, to, t),
                    Sample::End => to,
                };
                last_known.float = Some(v);
                listeners.emit_float(v);
                true
            }
            Track::Color { from, to } => {
                let c = match sample {
                    Sample::At(t) => from.lerp(to, t),
                    Sample::End => to,
                };
                last_known.color = Some(c);
                listeners.emit_color(c);
                true
            }
            Track::Follow { from, goal, ignore } => {
                let Some(goal_pos) = scene.get(goal).map(|g| g.pos) else {
                    return false;
                };
                let Some(e) = scene.get_mut(self.target) else {
                    return false;
                };
                e.pos = match sample {
                    Sample::At(t) => lerp_vec3(from, ignore.pin_vec3(goal_pos, from), t),
                    Sample::End => ignore.pin_vec3(goal_pos, e.pos),
                };
                true
            }
            track => {
                let Some(e) = scene.get_mut(self.target) else {
                    return false;
                };
                match (track, sample) {
                    (Track::Anchored { from, to }, Sample::At(t)) => e.anchored_pos = lerp_vec2(from, to, t),
                    (Track::Anchored { to, .. }, Sample::End) => e.anchored_pos = to,
                    (Track::World { from, to }, Sample::At(t)) => e.pos = lerp_vec3(from, to, t),
                    (Track::World { to, .. }, Sample::End) => e.pos = to,
                    (Track::Scale { from, to }, Sample::At(t)) => e.scale = lerp_vec3(from, to, t),
                    (Track::Scale { to, .. }, Sample::End) => e.scale = to,
                    (Track::Rotation { from, to }, Sample::At(t)) => e.rotation = lerp_vec3(from, to, t),
                    (Track::Rotation { to, .. }, Sample::End) => e.rotation = to,
                    (Track::Alpha { from, to }, sample) => {
                        let Some(alpha) = e.opacity.as_mut() else {
                            return false;
                        };
                        *alpha = match sample {
                            Sample::At(t) => lerp(from, to, t),
                            Sample::End => to,
                        };
                    }
                    // Handled above.
                    (Track::Float { .. } | Track::Color { .. } | Track::Follow { .. }, _) => {}
                }
                true
            }
        }
    }
}
