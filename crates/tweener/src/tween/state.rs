// tween/state.rs
//
// Runtime playback state, kept apart from the immutable descriptors.
// One `PlaybackState` per descriptor, indexed the same way.

use std::collections::HashMap;
use glam::{Vec2, Vec3};
use crate::api::types::Color;
use crate::components::entity::Entity;
use crate::core::scene::Scene;
use super::descriptor::{AxisMask, TweenAnimation, TweenOp};
use super::listener::ValueListeners;
use super::runner::{RunnerStatus, TweenRunner};

/// Which way an animation is currently playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Nothing running.
    #[default]
    Idle,
    Forward,
    Rewind,
}

/// Property values recorded before the first forward play.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Snapshot {
    /// Move / MoveToTarget record both position spaces.
    Position { anchored: Vec2, world: Vec3 },
    Scale(Vec3),
    Rotation(Vec3),
    Alpha(f32),
    /// Custom kinds restore to their descriptor start value.
    Custom,
    /// The target was absent when capture ran; restore and rewind do nothing.
    Unavailable,
}

impl Snapshot {
    /// Record the values `op` would animate on `entity`.
    pub fn capture(op: &TweenOp, entity: Option<&Entity>) -> Snapshot {
        if op.is_custom() {
            return Snapshot::Custom;
        }
        let Some(e) = entity else {
            return Snapshot::Unavailable;
        };
        match op {
            TweenOp::Move { .. } | TweenOp::MoveToTarget { .. } => Snapshot::Position {
                anchored: e.anchored_pos,
                world: e.pos,
            },
            TweenOp::Scale { .. } => Snapshot::Scale(e.scale),
            TweenOp::Rotate { .. } => Snapshot::Rotation(e.rotation),
            TweenOp::Fade { .. } => match e.opacity {
                Some(alpha) => Snapshot::Alpha(alpha),
                None => Snapshot::Unavailable,
            },
            TweenOp::CustomFloat { .. } | TweenOp::CustomColor { .. } => Snapshot::Custom,
        }
    }

    /// Write the recorded values back. Ignored axes keep their current value.
    pub fn restore(&self, op: &TweenOp, ignore: AxisMask, e: &mut Entity) {
        match (self, op) {
            (Snapshot::Position { anchored, .. }, TweenOp::Move { .. }) => {
                e.anchored_pos = ignore.pin_vec2(*anchored, e.anchored_pos);
            }
            (Snapshot::Position { world, .. }, TweenOp::MoveToTarget { .. }) => {
                e.pos = ignore.pin_vec3(*world, e.pos);
            }
            (Snapshot::Scale(scale), _) => e.scale = ignore.pin_vec3(*scale, e.scale),
            (Snapshot::Rotation(rot), _) => e.rotation = ignore.pin_vec3(*rot, e.rotation),
            (Snapshot::Alpha(alpha), _) => {
                if e.opacity.is_some() {
                    e.opacity = Some(*alpha);
                }
            }
            _ => {}
        }
    }

    /// Distance between the recorded and current values, if comparable.
    pub fn distance(&self, op: &TweenOp, e: &Entity) -> Option<f32> {
        match (self, op) {
            (Snapshot::Position { anchored, .. }, TweenOp::Move { .. }) => {
                Some(e.anchored_pos.distance(*anchored))
            }
            (Snapshot::Position { world, .. }, TweenOp::MoveToTarget { .. }) => {
                Some(e.pos.distance(*world))
            }
            (Snapshot::Scale(scale), _) => Some(e.scale.distance(*scale)),
            (Snapshot::Rotation(rot), _) => Some(e.rotation.distance(*rot)),
            (Snapshot::Alpha(alpha), _) => e.opacity.map(|a| (a - alpha).abs()),
            _ => None,
        }
    }
}

/// Most recent values written by custom float/color runs, so a later run
/// resumes from the live value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LastKnown {
    pub float: Option<f32>,
    pub color: Option<Color>,
}

/// A registered run and the direction it plays in.
#[derive(Debug)]
pub struct ActiveRun {
    pub direction: Direction,
    pub runner: TweenRunner,
}

/// Mutable state attached to one descriptor.
#[derive(Debug, Default)]
pub struct PlaybackState {
    snapshot: Option<Snapshot>,
    pub last_known: LastKnown,
    active: Option<ActiveRun>,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_captured(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    pub fn set_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = Some(snapshot);
    }

    /// `Idle` exactly when no runner is registered.
    pub fn direction(&self) -> Direction {
        self.active.as_ref().map_or(Direction::Idle, |run| run.direction)
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveRun> {
        self.active.as_ref()
    }

    /// Advance the registered run, if any. The runner records custom values
    /// into `last_known`.
    pub(crate) fn tick(
        &mut self,
        dt: f32,
        anim: &TweenAnimation,
        scene: &mut Scene,
        listeners: &mut ValueListeners,
    ) -> Option<RunnerStatus> {
        let run = self.active.as_mut()?;
        Some(run.runner.tick(dt, anim, scene, &mut self.last_known, listeners))
    }

    /// Register a new run, replacing any previous one.
    pub fn begin(&mut self, direction: Direction, runner: TweenRunner) {
        self.active = Some(ActiveRun { direction, runner });
    }

    /// Unregister the current run (clearing the direction with it).
    pub fn take_run(&mut self) -> Option<ActiveRun> {
        self.active.take()
    }

    /// Forget everything: run, snapshot and last-known values.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// When each animation and group was last played.
#[derive(Debug, Default)]
pub struct StartTimes {
    animations: HashMap<String, f64>,
    groups: HashMap<String, f64>,
}

impl StartTimes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_animation(&mut self, name: &str, now: f64) {
        self.animations.insert(name.to_string(), now);
    }

    pub fn record_group(&mut self, group: &str, now: f64) {
        self.groups.insert(group.to_string(), now);
    }

    pub fn animation(&self, name: &str) -> Option<f64> {
        self.animations.get(name).copied()
    }

    pub fn group(&self, group: &str) -> Option<f64> {
        self.groups.get(group).copied()
    }

    pub fn clear(&mut self) {
        self.animations.clear();
        self.groups.clear();
    }
}
