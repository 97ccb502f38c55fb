// tween/controller.rs
//
// The playback surface: named and grouped play / rewind / toggle.
// Owns the runtime state table, the per-name and per-group start times, and
// the frame clock. Unknown names, early rewinds and the like are logged and
// ignored; nothing here returns an error to the caller.
//
// Usage:
//   let mut tweener = Tweener::new(owner_id, manifest.animations);
//   tweener.play_group("menu", &mut scene);
//   tweener.advance(dt, &mut scene);   // once per frame

use crate::api::types::{Color, TargetId};
use crate::assets::manifest::TweenManifest;
use crate::core::scene::Scene;
use crate::core::time::Clock;
use crate::error::{Result, TweenError};
use crate::input::queue::TweenCommand;
use super::descriptor::{TweenAnimation, TweenOp};
use super::listener::ValueListeners;
use super::runner::{RunnerStatus, Track, TweenRunner};
use super::state::{ActiveRun, Direction, PlaybackState, Snapshot, StartTimes};

/// Tolerance for `is_at_initial_state`.
const AT_REST_TOLERANCE: f32 = 0.001;

/// Forward timing of one group member, as seen by the group rewind planner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberTiming {
    pub delay: f32,
    pub duration: f32,
    pub enabled: bool,
    pub rewindable: bool,
}

impl From<&TweenAnimation> for MemberTiming {
    fn from(anim: &TweenAnimation) -> Self {
        Self {
            delay: anim.delay,
            duration: anim.duration,
            enabled: anim.enabled,
            rewindable: !anim.unrewindable,
        }
    }
}

/// When and for how long one member rewinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewindSlot {
    pub delay: f32,
    pub duration: f32,
}

/// Plan a group rewind triggered `elapsed` seconds after the group started.
///
/// The trigger time is capped at the group's full length (the longest
/// `delay + duration` among enabled members). A member rewinds only for as
/// long as it had been animating, and waits out whatever part of the trigger
/// time came after it finished, so the reverse run mirrors the forward stagger.
/// Disabled, unrewindable and not-yet-started members get `None`.
pub fn plan_group_rewind(members: &[MemberTiming], elapsed: f32) -> Vec<Option<RewindSlot>> {
    let total = members
        .iter()
        .filter(|m| m.enabled)
        .fold(0.0_f32, |acc, m| acc.max(m.delay + m.duration));
    let trigger = elapsed.min(total);

    members
        .iter()
        .map(|m| {
            if !m.enabled || !m.rewindable || trigger < m.delay {
                return None;
            }
            let active = trigger - m.delay;
            let duration = active.min(m.duration);
            Some(RewindSlot {
                delay: trigger - (m.delay + duration),
                duration,
            })
        })
        .collect()
}

/// Named tween controller for one owner object.
#[derive(Debug)]
pub struct Tweener {
    /// Object written to when an animation has no target override.
    owner: TargetId,
    animations: Vec<TweenAnimation>,
    /// Parallel to `animations`.
    states: Vec<PlaybackState>,
    /// Parallel to `animations`.
    listeners: Vec<ValueListeners>,
    start_times: StartTimes,
    clock: Clock,
}

impl Tweener {
    pub fn new(owner: TargetId, animations: Vec<TweenAnimation>) -> Self {
        let states = animations.iter().map(|_| PlaybackState::new()).collect();
        let listeners = animations.iter().map(|_| ValueListeners::new()).collect();
        Self {
            owner,
            animations,
            states,
            listeners,
            start_times: StartTimes::new(),
            clock: Clock::new(),
        }
    }

    pub fn from_manifest(owner: TargetId, manifest: TweenManifest) -> Self {
        Self::new(owner, manifest.animations)
    }

    /// Add an animation. An existing animation with the same name is replaced
    /// and its runtime state dropped.
    pub fn add(&mut self, anim: TweenAnimation) {
        match self.index_of(&anim.name) {
            Some(idx) => {
                self.animations[idx] = anim;
                self.states[idx].reset();
            }
            None => {
                self.animations.push(anim);
                self.states.push(PlaybackState::new());
                self.listeners.push(ValueListeners::new());
            }
        }
    }

    pub fn animations(&self) -> &[TweenAnimation] {
        &self.animations
    }

    pub fn animation(&self, name: &str) -> Option<&TweenAnimation> {
        self.index_of(name).map(|idx| &self.animations[idx])
    }

    /// Runtime state for `name`.
    pub fn state(&self, name: &str) -> Option<&PlaybackState> {
        self.index_of(name).map(|idx| &self.states[idx])
    }

    /// The run currently registered for `name`, if any.
    pub fn active_run(&self, name: &str) -> Option<&ActiveRun> {
        self.state(name).and_then(PlaybackState::active)
    }

    pub fn direction(&self, name: &str) -> Direction {
        self.state(name).map_or(Direction::Idle, PlaybackState::direction)
    }

    pub fn is_playing(&self, name: &str) -> bool {
        self.direction(name) != Direction::Idle
    }

    /// Number of registered runs.
    pub fn active_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_running()).count()
    }

    /// Current controller time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    /// Register a listener for a custom float animation.
    pub fn on_float(&mut self, name: &str, listener: impl FnMut(f32) + 'static) {
        match self.index_of(name) {
            Some(idx) => self.listeners[idx].add_float(Box::new(listener)),
            None => TweenError::NotFound(name.to_string()).log(),
        }
    }

    /// Register a listener for a custom color animation.
    pub fn on_color(&mut self, name: &str, listener: impl FnMut(Color) + 'static) {
        match self.index_of(name) {
            Some(idx) => self.listeners[idx].add_color(Box::new(listener)),
            None => TweenError::NotFound(name.to_string()).log(),
        }
    }

    // -- Playback --

    /// Play one animation forward after its own delay.
    pub fn play(&mut self, name: &str, scene: &mut Scene) {
        if let Err(err) = self.try_play(name, scene) {
            err.log();
        }
    }

    /// Play every member of `group` forward, each after its own delay.
    pub fn play_group(&mut self, group: &str, scene: &mut Scene) {
        if let Err(err) = self.try_play_group(group, scene) {
            err.log();
        }
    }

    /// Reverse one animation back to its captured initial state, for as long
    /// as it had been visibly animating.
    pub fn rewind(&mut self, name: &str, scene: &mut Scene) {
        if let Err(err) = self.try_rewind(name, scene) {
            err.log();
        }
    }

    /// Reverse a whole group, preserving the members' relative stagger.
    pub fn rewind_group(&mut self, group: &str, scene: &mut Scene) {
        if let Err(err) = self.try_rewind_group(group, scene) {
            err.log();
        }
    }

    pub fn toggle(&mut self, name: &str, forward: bool, scene: &mut Scene) {
        if self.index_of(name).is_none() {
            TweenError::NotFound(name.to_string()).log();
            return;
        }
        if forward {
            self.play(name, scene);
        } else {
            self.rewind(name, scene);
        }
    }

    pub fn toggle_group(&mut self, group: &str, forward: bool, scene: &mut Scene) {
        if forward {
            self.play_group(group, scene);
        } else {
            self.rewind_group(group, scene);
        }
    }

    /// Start every configured animation forward.
    pub fn play_all(&mut self, scene: &mut Scene) {
        let now = self.clock.now();
        for idx in 0..self.animations.len() {
            self.start_times.record_animation(&self.animations[idx].name, now);
            let delay = self.animations[idx].delay;
            if let Err(err) = self.start_forward(idx, delay, scene) {
                err.log();
            }
        }
    }

    /// Stop every running animation and restore its initial state.
    pub fn stop_all(&mut self, scene: &mut Scene) {
        for idx in 0..self.animations.len() {
            self.stop(idx, true, scene);
        }
    }

    /// Execute one host command.
    pub fn apply(&mut self, command: &TweenCommand, scene: &mut Scene) {
        match command {
            TweenCommand::Play(name) => self.play(name, scene),
            TweenCommand::PlayGroup(group) => self.play_group(group, scene),
            TweenCommand::Rewind(name) => self.rewind(name, scene),
            TweenCommand::RewindGroup(group) => self.rewind_group(group, scene),
            TweenCommand::Toggle { name, forward } => self.toggle(name, *forward, scene),
            TweenCommand::ToggleGroup { group, forward } => self.toggle_group(group, *forward, scene),
            TweenCommand::PlayAll => self.play_all(scene),
            TweenCommand::StopAll => self.stop_all(scene),
        }
    }

    /// Advance the clock and every running animation by one frame.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) {
        let dt = self.clock.advance(dt);

        let entries = self
            .animations
            .iter()
            .zip(self.states.iter_mut())
            .zip(self.listeners.iter_mut());

        for ((anim, state), listeners) in entries {
            match state.tick(dt, anim, scene, listeners) {
                Some(RunnerStatus::Finished) => {
                    let direction = state.direction();
                    state.take_run();
                    log::debug!("Tweener: '{}' finished ({:?})", anim.name, direction);
                }
                Some(RunnerStatus::Aborted) => {
                    let target = state.active().map(|run| run.runner.target());
                    state.take_run();
                    TweenError::MissingTarget { name: anim.name.clone(), target }.log();
                }
                Some(RunnerStatus::Running) | None => {}
            }
        }
    }

    /// Whether `name`'s target still holds its captured initial value
    /// (within 0.001). Uncaptured, custom and unknown animations count as at rest.
    pub fn is_at_initial_state(&self, name: &str, scene: &Scene) -> bool {
        let Some(idx) = self.index_of(name) else {
            TweenError::NotFound(name.to_string()).log();
            return true;
        };
        let anim = &self.animations[idx];
        let Some(snapshot) = self.states[idx].snapshot() else {
            return true;
        };
        scene
            .get(anim.target_override.unwrap_or(self.owner))
            .and_then(|e| snapshot.distance(&anim.op, e))
            .map_or(true, |d| d < AT_REST_TOLERANCE)
    }

    /// Drop every run, captured snapshot, last-known value and start time.
    /// Nothing is restored. Listeners stay registered.
    pub fn reset(&mut self) {
        for state in self.states.iter_mut() {
            state.reset();
        }
        self.start_times.clear();
    }

    // -- Internals --

    fn index_of(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }

    fn group_indices(&self, group: &str) -> Vec<usize> {
        self.animations
            .iter()
            .enumerate()
            .filter(|(_, a)| a.in_group(group))
            .map(|(idx, _)| idx)
            .collect()
    }

    pub(crate) fn try_play(&mut self, name: &str, scene: &mut Scene) -> Result<()> {
        let idx = self
            .index_of(name)
            .ok_or_else(|| TweenError::NotFound(name.to_string()))?;
        self.start_times.record_animation(name, self.clock.now());
        let delay = self.animations[idx].delay;
        self.start_forward(idx, delay, scene)
    }

    pub(crate) fn try_play_group(&mut self, group: &str, scene: &mut Scene) -> Result<()> {
        let members = self.group_indices(group);
        if members.is_empty() {
            return Err(TweenError::GroupNotFound(group.to_string()));
        }
        self.start_times.record_group(group, self.clock.now());
        for idx in members {
            let delay = self.animations[idx].delay;
            if let Err(err) = self.start_forward(idx, delay, scene) {
                err.log();
            }
        }
        Ok(())
    }

    pub(crate) fn try_rewind(&mut self, name: &str, scene: &mut Scene) -> Result<()> {
        let started = self
            .start_times
            .animation(name)
            .ok_or_else(|| TweenError::NotYetPlayed(name.to_string()))?;
        let idx = self
            .index_of(name)
            .ok_or_else(|| TweenError::NotFound(name.to_string()))?;

        let anim = &self.animations[idx];
        if anim.unrewindable {
            return Err(TweenError::Unrewindable(name.to_string()));
        }

        let elapsed = self.clock.since(started);
        if elapsed < anim.delay {
            log::debug!("Tweener: '{}' had not started yet; nothing to rewind", name);
            return Ok(());
        }
        let duration = (elapsed - anim.delay).min(anim.duration);
        self.start_rewind(idx, 0.0, duration, scene)
    }

    pub(crate) fn try_rewind_group(&mut self, group: &str, scene: &mut Scene) -> Result<()> {
        let started = self
            .start_times
            .group(group)
            .ok_or_else(|| TweenError::GroupNotYetPlayed(group.to_string()))?;
        let members = self.group_indices(group);
        if members.is_empty() {
            return Err(TweenError::GroupNotFound(group.to_string()));
        }

        // The rewind starts from wherever each member is right now.
        for &idx in &members {
            self.stop(idx, false, scene);
        }

        let timings: Vec<MemberTiming> = members
            .iter()
            .map(|&idx| MemberTiming::from(&self.animations[idx]))
            .collect();
        let plan = plan_group_rewind(&timings, self.clock.since(started));

        for (idx, slot) in members.into_iter().zip(plan) {
            let Some(slot) = slot else { continue };
            if !self.states[idx].is_captured() {
                TweenError::NotCaptured(self.animations[idx].name.clone()).log();
                continue;
            }
            if let Err(err) = self.start_rewind(idx, slot.delay, slot.duration, scene) {
                err.log();
            }
        }
        Ok(())
    }

    /// Unregister `idx`'s run, optionally restoring its initial state.
    fn stop(&mut self, idx: usize, restore: bool, scene: &mut Scene) {
        if self.states[idx].take_run().is_some() && restore {
            restore_initial(
                &self.animations[idx],
                self.owner,
                &mut self.states[idx],
                &mut self.listeners[idx],
                scene,
            );
        }
    }

    fn start_forward(&mut self, idx: usize, delay: f32, scene: &mut Scene) -> Result<()> {
        let owner = self.owner;
        let anim = &self.animations[idx];
        if !anim.enabled {
            return Err(TweenError::Disabled(anim.name.clone()));
        }
        let state = &mut self.states[idx];

        // Re-playing a forward run restarts it from the true start; a rewind
        // being interrupted is left where it is.
        let restore = state.direction() == Direction::Forward;
        if state.take_run().is_some() && restore {
            restore_initial(anim, owner, state, &mut self.listeners[idx], scene);
        }

        let target = anim.target_override.unwrap_or(owner);
        if !state.is_captured() {
            state.set_snapshot(Snapshot::capture(&anim.op, scene.get(target)));
            log::debug!("Tweener: captured initial state of '{}'", anim.name);
        }

        let missing = |id: TargetId| TweenError::MissingTarget {
            name: anim.name.clone(),
            target: Some(id),
        };
        let ignore = anim.ignore;

        let track = match &anim.op {
            TweenOp::Move { target: end } => {
                let from = scene.get(target).ok_or_else(|| missing(target))?.anchored_pos;
                Track::Anchored { from, to: ignore.pin_vec2(*end, from) }
            }
            TweenOp::MoveToTarget { goal, chase } => {
                let goal = goal.ok_or_else(|| TweenError::MissingTarget {
                    name: anim.name.clone(),
                    target: None,
                })?;
                let goal_pos = scene.get(goal).ok_or_else(|| missing(goal))?.pos;
                let from = scene.get(target).ok_or_else(|| missing(target))?.pos;
                if *chase {
                    Track::Follow { from, goal, ignore }
                } else {
                    Track::World { from, to: ignore.pin_vec3(goal_pos, from) }
                }
            }
            TweenOp::Scale { target: end } => {
                let from = scene.get(target).ok_or_else(|| missing(target))?.scale;
                Track::Scale { from, to: ignore.pin_vec3(*end, from) }
            }
            TweenOp::Rotate { target: end } => {
                let from = scene.get(target).ok_or_else(|| missing(target))?.rotation;
                Track::Rotation { from, to: ignore.pin_vec3(*end, from) }
            }
            TweenOp::Fade { target_alpha } => {
                let from = scene
                    .get(target)
                    .and_then(|e| e.opacity)
                    .ok_or_else(|| missing(target))?;
                Track::Alpha { from, to: *target_alpha }
            }
            TweenOp::CustomFloat { start, end } => Track::Float {
                from: state.last_known.float.unwrap_or(*start),
                to: *end,
            },
            TweenOp::CustomColor { start, end } => Track::Color {
                from: state.last_known.color.unwrap_or(*start),
                to: *end,
            },
        };

        let runner = TweenRunner::new(target, track, anim.duration, delay, false);
        state.begin(Direction::Forward, runner);
        log::debug!("Tweener: '{}' forward (delay {:.3}s)", anim.name, delay);
        Ok(())
    }

    fn start_rewind(&mut self, idx: usize, delay: f32, duration: f32, scene: &mut Scene) -> Result<()> {
        let owner = self.owner;
        let anim = &self.animations[idx];
        if !anim.enabled {
            return Err(TweenError::Disabled(anim.name.clone()));
        }
        if anim.unrewindable {
            return Err(TweenError::Unrewindable(anim.name.clone()));
        }
        let state = &mut self.states[idx];

        // Never restore here: the rewind continues from the in-flight value.
        state.take_run();

        let Some(snapshot) = state.snapshot().copied() else {
            return Err(TweenError::NotCaptured(anim.name.clone()));
        };

        let target = anim.target_override.unwrap_or(owner);
        let missing = || TweenError::MissingTarget {
            name: anim.name.clone(),
            target: Some(target),
        };

        let track = match (&anim.op, snapshot) {
            (TweenOp::Move { .. }, Snapshot::Position { anchored, .. }) => Track::Anchored {
                from: scene.get(target).ok_or_else(missing)?.anchored_pos,
                to: anchored,
            },
            (TweenOp::MoveToTarget { .. }, Snapshot::Position { world, .. }) => Track::World {
                from: scene.get(target).ok_or_else(missing)?.pos,
                to: world,
            },
            (TweenOp::Scale { .. }, Snapshot::Scale(initial)) => Track::Scale {
                from: scene.get(target).ok_or_else(missing)?.scale,
                to: initial,
            },
            (TweenOp::Rotate { .. }, Snapshot::Rotation(initial)) => Track::Rotation {
                from: scene.get(target).ok_or_else(missing)?.rotation,
                to: initial,
            },
            (TweenOp::Fade { .. }, Snapshot::Alpha(initial)) => Track::Alpha {
                from: scene.get(target).and_then(|e| e.opacity).ok_or_else(missing)?,
                to: initial,
            },
            (TweenOp::CustomFloat { start, end }, _) => Track::Float {
                from: state.last_known.float.unwrap_or(*end),
                to: *start,
            },
            (TweenOp::CustomColor { start, end }, _) => Track::Color {
                from: state.last_known.color.unwrap_or(*end),
                to: *start,
            },
            // Captured while the target was absent.
            _ => return Err(missing()),
        };

        let runner = TweenRunner::new(target, track, duration, delay, anim.mirror_ease_on_rewind);
        state.begin(Direction::Rewind, runner);
        log::debug!(
            "Tweener: '{}' rewind over {:.3}s (delay {:.3}s)",
            anim.name,
            duration,
            delay
        );
        Ok(())
    }
}

/// Put `anim`'s target back to its captured snapshot. Custom kinds reset their
/// last-known value to the descriptor start and notify listeners.
fn restore_initial(
    anim: &TweenAnimation,
    owner: TargetId,
    state: &mut PlaybackState,
    listeners: &mut ValueListeners,
    scene: &mut Scene,
) {
    let Some(snapshot) = state.snapshot().copied() else {
        return;
    };
    match &anim.op {
        TweenOp::CustomFloat { start, .. } => {
            state.last_known.float = Some(*start);
            listeners.emit_float(*start);
        }
        TweenOp::CustomColor { start, .. } => {
            state.last_known.color = Some(*start);
            listeners.emit_color(*start);
        }
        op => {
            if let Some(e) = scene.get_mut(anim.target_override.unwrap_or(owner)) {
                snapshot.restore(op, anim.ignore, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use glam::{Vec2, Vec3};
    use crate::components::entity::Entity;
    use crate::tween::descriptor::AxisMask;
    use crate::tween::easing::Easing;

    const OWNER: TargetId = TargetId(1);

    fn scene() -> Scene {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(OWNER).with_opacity(0.0));
        scene
    }

    fn alpha(scene: &Scene) -> f32 {
        scene.get(OWNER).unwrap().opacity.unwrap()
    }

    fn step(tweener: &mut Tweener, scene: &mut Scene, dt: f32, times: usize) {
        for _ in 0..times {
            tweener.advance(dt, scene);
        }
    }

    #[test]
    fn fade_in_reaches_half_then_exact_end() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);

        tweener.play("fadeIn", &mut scene);
        assert_eq!(tweener.direction("fadeIn"), Direction::Forward);

        tweener.advance(0.5, &mut scene);
        assert!((alpha(&scene) - 0.5).abs() < 1e-5);

        tweener.advance(0.5, &mut scene);
        assert_eq!(alpha(&scene), 1.0);
        assert_eq!(tweener.direction("fadeIn"), Direction::Idle);
        assert_eq!(tweener.active_count(), 0);
    }

    #[test]
    fn delay_plus_duration_snaps_exactly() {
        let mut scene = scene();
        let end = Vec3::new(1.7, 0.3, 2.9);
        let anim = TweenAnimation::scale("grow", end)
            .with_delay(0.5)
            .with_duration(1.5)
            .with_easing(Easing::SineInOut);
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("grow", &mut scene);
        step(&mut tweener, &mut scene, 0.25, 2);
        assert_eq!(scene.get(OWNER).unwrap().scale, Vec3::ONE);
        step(&mut tweener, &mut scene, 0.25, 6);
        assert_eq!(scene.get(OWNER).unwrap().scale, end);
        assert!(!tweener.is_playing("grow"));
    }

    #[test]
    fn inexact_delay_and_duration_still_snap() {
        let end = Vec3::new(1.7, 0.3, 2.9);
        for i in 0..10 {
            for j in 1..=10 {
                let (w, d) = (i as f32 * 0.1, j as f32 * 0.1);
                let anim = TweenAnimation::scale("grow", end).with_delay(w).with_duration(d);

                // One frame spanning the whole run.
                let mut scene = scene();
                let mut tweener = Tweener::new(OWNER, vec![anim.clone()]);
                tweener.play("grow", &mut scene);
                tweener.advance(w + d, &mut scene);
                assert!(!tweener.is_playing("grow"), "single w={w} d={d}");
                assert_eq!(scene.get(OWNER).unwrap().scale, end, "single w={w} d={d}");

                // 0.1s frames summing to the same length.
                let mut scene = self::scene();
                let mut tweener = Tweener::new(OWNER, vec![anim]);
                tweener.play("grow", &mut scene);
                let frames = ((w + d) / 0.1).round() as usize;
                step(&mut tweener, &mut scene, 0.1, frames);
                assert!(!tweener.is_playing("grow"), "stepped w={w} d={d}");
                assert_eq!(scene.get(OWNER).unwrap().scale, end, "stepped w={w} d={d}");
            }
        }
    }

    #[test]
    fn sixty_hz_frames_finish_on_time() {
        let mut scene = scene();
        let anim = TweenAnimation::fade("fadeIn", 1.0).with_delay(0.3).with_duration(0.1);
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("fadeIn", &mut scene);
        step(&mut tweener, &mut scene, 1.0 / 60.0, 23);
        assert!(tweener.is_playing("fadeIn"));
        tweener.advance(1.0 / 60.0, &mut scene);
        assert!((tweener.now() - 0.4).abs() < 1e-5);
        assert!(!tweener.is_playing("fadeIn"));
        assert_eq!(alpha(&scene), 1.0);

        // A finished run is not an interruption: replaying starts from the end value.
        tweener.play("fadeIn", &mut scene);
        assert_eq!(alpha(&scene), 1.0);
    }

    #[test]
    fn play_then_rewind_round_trips() {
        let mut scene = Scene::new();
        let start = Vec2::new(5.0, 5.0);
        scene.spawn(Entity::new(OWNER).with_anchored_pos(start));
        let anim = TweenAnimation::move_to("slide", Vec2::new(100.0, 0.0)).with_easing(Easing::CubicOut);
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("slide", &mut scene);
        step(&mut tweener, &mut scene, 0.25, 4);
        assert_eq!(scene.get(OWNER).unwrap().anchored_pos, Vec2::new(100.0, 0.0));

        tweener.rewind("slide", &mut scene);
        assert_eq!(tweener.direction("slide"), Direction::Rewind);
        assert_eq!(tweener.active_run("slide").unwrap().runner.duration(), 1.0);
        step(&mut tweener, &mut scene, 0.25, 4);
        assert!(scene.get(OWNER).unwrap().anchored_pos.distance(start) < 1e-4);
        assert!(tweener.is_at_initial_state("slide", &scene));
    }

    #[test]
    fn replaying_forward_restarts_from_true_start() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);

        tweener.play("fadeIn", &mut scene);
        tweener.advance(0.5, &mut scene);
        assert!((alpha(&scene) - 0.5).abs() < 1e-5);

        tweener.play("fadeIn", &mut scene);
        assert_eq!(alpha(&scene), 0.0);

        tweener.advance(0.25, &mut scene);
        assert!((alpha(&scene) - 0.25).abs() < 1e-5);
    }

    #[test]
    fn rewind_mid_flight_continues_from_current_value() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);

        tweener.play("fadeIn", &mut scene);
        tweener.advance(0.5, &mut scene);
        tweener.rewind("fadeIn", &mut scene);

        // No restore on a direction change.
        assert!((alpha(&scene) - 0.5).abs() < 1e-5);
        let run = tweener.active_run("fadeIn").unwrap();
        assert_eq!(run.direction, Direction::Rewind);
        assert_eq!(run.runner.duration(), 0.5);

        tweener.advance(0.25, &mut scene);
        assert!((alpha(&scene) - 0.25).abs() < 1e-5);
        tweener.advance(0.25, &mut scene);
        assert_eq!(alpha(&scene), 0.0);
        assert_eq!(tweener.direction("fadeIn"), Direction::Idle);
    }

    #[test]
    fn forward_after_rewind_does_not_restore() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);

        tweener.play("fadeIn", &mut scene);
        step(&mut tweener, &mut scene, 0.5, 2);
        tweener.rewind("fadeIn", &mut scene);
        tweener.advance(0.5, &mut scene);
        assert!((alpha(&scene) - 0.5).abs() < 1e-5);

        tweener.play("fadeIn", &mut scene);
        assert!((alpha(&scene) - 0.5).abs() < 1e-5);
        let run = tweener.active_run("fadeIn").unwrap();
        assert_eq!(run.runner.track(), &Track::Alpha { from: 0.5, to: 1.0 });
    }

    #[test]
    fn rewind_before_delay_elapsed_is_noop() {
        let mut scene = scene();
        let anim = TweenAnimation::fade("late", 1.0).with_delay(1.0);
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("late", &mut scene);
        tweener.advance(0.5, &mut scene);
        assert!(tweener.try_rewind("late", &mut scene).is_ok());
        assert_eq!(tweener.direction("late"), Direction::Forward);
    }

    #[test]
    fn rewind_without_play_is_rejected() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        assert!(matches!(
            tweener.try_rewind("fadeIn", &mut scene),
            Err(TweenError::NotYetPlayed(_))
        ));
        assert!(matches!(
            tweener.try_rewind_group("menu", &mut scene),
            Err(TweenError::GroupNotYetPlayed(_))
        ));
        tweener.rewind("fadeIn", &mut scene);
        assert_eq!(alpha(&scene), 0.0);
    }

    #[test]
    fn unrewindable_is_left_untouched() {
        let mut scene = scene();
        let anim = TweenAnimation::fade("stamp", 1.0).unrewindable();
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("stamp", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert_eq!(alpha(&scene), 1.0);

        assert!(matches!(
            tweener.try_rewind("stamp", &mut scene),
            Err(TweenError::Unrewindable(_))
        ));
        tweener.rewind("stamp", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert_eq!(alpha(&scene), 1.0);
        assert_eq!(tweener.direction("stamp"), Direction::Idle);
    }

    #[test]
    fn unknown_names_are_noops() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        assert!(matches!(tweener.try_play("nope", &mut scene), Err(TweenError::NotFound(_))));
        assert!(matches!(
            tweener.try_play_group("nope", &mut scene),
            Err(TweenError::GroupNotFound(_))
        ));
        tweener.play("nope", &mut scene);
        tweener.toggle("nope", true, &mut scene);
        tweener.toggle_group("", true, &mut scene);
        assert_eq!(tweener.active_count(), 0);
    }

    #[test]
    fn group_rewind_plan_preserves_stagger() {
        let members = [
            MemberTiming { delay: 0.0, duration: 1.0, enabled: true, rewindable: true },
            MemberTiming { delay: 2.0, duration: 1.0, enabled: true, rewindable: true },
        ];
        let plan = plan_group_rewind(&members, 2.5);
        // First finished long ago: full-length rewind, after the second is done.
        assert_eq!(plan[0], Some(RewindSlot { delay: 1.5, duration: 1.0 }));
        // Second was half way: rewinds immediately for the time it had been active.
        assert_eq!(plan[1], Some(RewindSlot { delay: 0.0, duration: 0.5 }));
    }

    #[test]
    fn group_rewind_plan_caps_and_skips() {
        let members = [
            MemberTiming { delay: 0.0, duration: 1.0, enabled: true, rewindable: true },
            MemberTiming { delay: 2.0, duration: 1.0, enabled: true, rewindable: true },
            MemberTiming { delay: 0.0, duration: 9.0, enabled: false, rewindable: true },
            MemberTiming { delay: 0.0, duration: 1.0, enabled: true, rewindable: false },
        ];
        // Not yet started member is skipped.
        let plan = plan_group_rewind(&members, 1.0);
        assert_eq!(plan[0], Some(RewindSlot { delay: 0.0, duration: 1.0 }));
        assert_eq!(plan[1], None);
        assert_eq!(plan[2], None);
        assert_eq!(plan[3], None);

        // Trigger time is capped at the enabled group length (3s), not 9s.
        let plan = plan_group_rewind(&members, 10.0);
        assert_eq!(plan[0], Some(RewindSlot { delay: 2.0, duration: 1.0 }));
        assert_eq!(plan[1], Some(RewindSlot { delay: 0.0, duration: 1.0 }));
    }

    #[test]
    fn group_rewind_schedules_members() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(OWNER).with_opacity(0.0));
        scene.spawn(Entity::new(TargetId(2)));
        let a = TweenAnimation::fade("a", 1.0).with_group("menu");
        let b = TweenAnimation::move_to("b", Vec2::new(10.0, 0.0))
            .with_group("menu")
            .with_delay(2.0)
            .with_target(TargetId(2));
        let mut tweener = Tweener::new(OWNER, vec![a, b]);

        tweener.play_group("menu", &mut scene);
        step(&mut tweener, &mut scene, 0.5, 5);
        assert_eq!(tweener.direction("a"), Direction::Idle);
        assert_eq!(tweener.direction("b"), Direction::Forward);
        assert!((scene.get(TargetId(2)).unwrap().anchored_pos.x - 5.0).abs() < 1e-4);

        tweener.rewind_group("menu", &mut scene);
        let a_run = tweener.active_run("a").unwrap();
        assert_eq!(a_run.direction, Direction::Rewind);
        assert_eq!(a_run.runner.delay(), 1.5);
        assert_eq!(a_run.runner.duration(), 1.0);
        let b_run = tweener.active_run("b").unwrap();
        assert_eq!(b_run.runner.delay(), 0.0);
        assert_eq!(b_run.runner.duration(), 0.5);
        // Stopped without restore.
        assert!((scene.get(TargetId(2)).unwrap().anchored_pos.x - 5.0).abs() < 1e-4);

        step(&mut tweener, &mut scene, 0.5, 5);
        assert_eq!(scene.get(TargetId(2)).unwrap().anchored_pos, Vec2::ZERO);
        assert_eq!(alpha(&scene), 0.0);
        assert_eq!(tweener.active_count(), 0);
    }

    #[test]
    fn group_rewind_ignores_members_still_waiting() {
        let mut scene = scene();
        let a = TweenAnimation::fade("a", 1.0).with_group("menu");
        let b = TweenAnimation::scale("b", Vec3::splat(2.0)).with_group("menu").with_delay(2.0);
        let mut tweener = Tweener::new(OWNER, vec![a, b]);

        tweener.play_group("menu", &mut scene);
        tweener.advance(1.0, &mut scene);
        tweener.rewind_group("menu", &mut scene);

        assert_eq!(tweener.direction("a"), Direction::Rewind);
        // b was stopped before it started and is not rewound.
        assert_eq!(tweener.direction("b"), Direction::Idle);
        assert_eq!(scene.get(OWNER).unwrap().scale, Vec3::ONE);
    }

    #[test]
    fn group_rewind_skips_member_never_captured() {
        let mut scene = scene();
        let a = TweenAnimation::fade("a", 1.0).with_group("menu");
        let b = TweenAnimation::scale("b", Vec3::splat(2.0)).with_group("menu");
        let mut tweener = Tweener::new(OWNER, vec![a, b]);

        tweener.play_group("menu", &mut scene);
        tweener.advance(0.5, &mut scene);

        // Replacing a member drops its run and captured state.
        tweener.add(TweenAnimation::scale("b", Vec3::splat(3.0)).with_group("menu"));
        assert!(!tweener.state("b").unwrap().is_captured());

        tweener.rewind_group("menu", &mut scene);
        assert_eq!(tweener.direction("a"), Direction::Rewind);
        assert_eq!(tweener.direction("b"), Direction::Idle);
        assert!(!tweener.state("b").unwrap().is_captured());

        let scale = scene.get(OWNER).unwrap().scale;
        tweener.advance(0.5, &mut scene);
        assert_eq!(alpha(&scene), 0.0);
        assert_eq!(scene.get(OWNER).unwrap().scale, scale);
    }

    #[test]
    fn stop_all_restores_initial_state() {
        let mut scene = scene();
        let anims = vec![
            TweenAnimation::fade("fade", 1.0),
            TweenAnimation::rotate("spin", Vec3::new(0.0, 0.0, 180.0)),
        ];
        let mut tweener = Tweener::new(OWNER, anims);
        tweener.play_all(&mut scene);
        tweener.advance(0.5, &mut scene);
        assert!(scene.get(OWNER).unwrap().rotation.z > 0.0);

        tweener.stop_all(&mut scene);
        assert_eq!(tweener.active_count(), 0);
        assert_eq!(alpha(&scene), 0.0);
        assert_eq!(scene.get(OWNER).unwrap().rotation, Vec3::ZERO);
    }

    #[test]
    fn custom_float_notifies_and_resumes_from_last_known() {
        let mut scene = scene();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::custom_float("glow", 0.0, 10.0)]);
        let sink = Rc::clone(&seen);
        tweener.on_float("glow", move |v| sink.borrow_mut().push(v));

        tweener.play("glow", &mut scene);
        tweener.advance(0.5, &mut scene);
        assert_eq!(*seen.borrow(), vec![0.0, 5.0]);

        tweener.rewind("glow", &mut scene);
        let run = tweener.active_run("glow").unwrap();
        assert_eq!(run.runner.track(), &Track::Float { from: 5.0, to: 0.0 });

        tweener.advance(0.5, &mut scene);
        assert_eq!(seen.borrow().last().copied(), Some(0.0));
        assert_eq!(tweener.state("glow").unwrap().last_known.float, Some(0.0));
    }

    #[test]
    fn custom_color_restores_start_on_stop() {
        let mut scene = scene();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let anim = TweenAnimation::custom_color("tint", Color::BLACK, Color::WHITE);
        let mut tweener = Tweener::new(OWNER, vec![anim]);
        let sink = Rc::clone(&seen);
        tweener.on_color("tint", move |c| sink.borrow_mut().push(c));

        tweener.play("tint", &mut scene);
        tweener.advance(0.5, &mut scene);
        tweener.stop_all(&mut scene);
        assert_eq!(seen.borrow().last().copied(), Some(Color::BLACK));
        assert_eq!(tweener.state("tint").unwrap().last_known.color, Some(Color::BLACK));
    }

    #[test]
    fn mirrored_ease_on_rewind() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(OWNER));
        let anim = TweenAnimation::move_to("slide", Vec2::new(100.0, 0.0))
            .with_easing(Easing::QuadIn)
            .with_mirror_ease_on_rewind(true);
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("slide", &mut scene);
        tweener.advance(1.0, &mut scene);
        tweener.rewind("slide", &mut scene);
        tweener.advance(0.5, &mut scene);
        // QuadOut(0.5) = 0.75 of the way back.
        assert!((scene.get(OWNER).unwrap().anchored_pos.x - 25.0).abs() < 1e-3);
    }

    #[test]
    fn ignored_axes_keep_start_value() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(OWNER).with_anchored_pos(Vec2::new(7.0, 0.0)));
        let anim = TweenAnimation::move_to("drop", Vec2::new(50.0, -40.0))
            .with_ignore(AxisMask::new(true, false, false));
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("drop", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert_eq!(scene.get(OWNER).unwrap().anchored_pos, Vec2::new(7.0, -40.0));
    }

    #[test]
    fn target_override_writes_other_entity() {
        let mut scene = scene();
        scene.spawn(Entity::new(TargetId(5)).with_opacity(1.0));
        let anim = TweenAnimation::fade("dim", 0.0).with_target(TargetId(5));
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("dim", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert_eq!(scene.get(TargetId(5)).unwrap().opacity, Some(0.0));
        assert_eq!(alpha(&scene), 0.0);
    }

    #[test]
    fn missing_fade_target_starts_nothing() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(OWNER).without_opacity());
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        assert!(matches!(
            tweener.try_play("fadeIn", &mut scene),
            Err(TweenError::MissingTarget { .. })
        ));
        assert!(!tweener.is_playing("fadeIn"));
    }

    #[test]
    fn despawned_target_aborts_run() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        tweener.play("fadeIn", &mut scene);
        scene.despawn(OWNER);
        tweener.advance(0.1, &mut scene);
        assert_eq!(tweener.direction("fadeIn"), Direction::Idle);
    }

    #[test]
    fn disabled_animation_never_starts() {
        let mut scene = scene();
        let anims = vec![
            TweenAnimation::fade("on", 1.0).with_group("g"),
            TweenAnimation::rotate("off", Vec3::Z).with_group("g").disabled(),
        ];
        let mut tweener = Tweener::new(OWNER, anims);
        assert!(matches!(tweener.try_play("off", &mut scene), Err(TweenError::Disabled(_))));
        tweener.play_group("g", &mut scene);
        assert!(tweener.is_playing("on"));
        assert!(!tweener.is_playing("off"));
    }

    #[test]
    fn toggle_dispatches_by_direction() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0).with_group("g")]);

        tweener.toggle("fadeIn", true, &mut scene);
        assert_eq!(tweener.direction("fadeIn"), Direction::Forward);
        tweener.advance(0.5, &mut scene);
        tweener.toggle("fadeIn", false, &mut scene);
        assert_eq!(tweener.direction("fadeIn"), Direction::Rewind);

        tweener.toggle_group("g", true, &mut scene);
        assert_eq!(tweener.direction("fadeIn"), Direction::Forward);
    }

    #[test]
    fn commands_apply_like_calls() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        tweener.apply(&TweenCommand::Play("fadeIn".into()), &mut scene);
        tweener.advance(0.5, &mut scene);
        tweener.apply(&TweenCommand::StopAll, &mut scene);
        assert_eq!(alpha(&scene), 0.0);
        assert_eq!(tweener.active_count(), 0);
    }

    #[test]
    fn move_to_target_reaches_goal() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(OWNER));
        scene.spawn(Entity::new(TargetId(3)).with_pos(Vec3::new(4.0, 8.0, 1.0)));
        let anim = TweenAnimation::move_to_target("fly", TargetId(3), false)
            .with_ignore(AxisMask::new(false, false, true));
        let mut tweener = Tweener::new(OWNER, vec![anim]);

        tweener.play("fly", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert_eq!(scene.get(OWNER).unwrap().pos, Vec3::new(4.0, 8.0, 0.0));

        tweener.rewind("fly", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert_eq!(scene.get(OWNER).unwrap().pos, Vec3::ZERO);
    }

    #[test]
    fn reset_forgets_captured_state() {
        let mut scene = scene();
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        tweener.play("fadeIn", &mut scene);
        tweener.advance(1.0, &mut scene);
        assert!(!tweener.is_at_initial_state("fadeIn", &scene));

        tweener.reset();
        assert!(!tweener.state("fadeIn").unwrap().is_captured());
        assert!(tweener.is_at_initial_state("fadeIn", &scene));
        assert!(matches!(
            tweener.try_rewind("fadeIn", &mut scene),
            Err(TweenError::NotYetPlayed(_))
        ));
    }

    #[test]
    fn add_replaces_same_name() {
        let mut tweener = Tweener::new(OWNER, vec![TweenAnimation::fade("fadeIn", 1.0)]);
        tweener.add(TweenAnimation::fade("fadeIn", 0.5));
        tweener.add(TweenAnimation::fade("fadeOut", 0.0));
        assert_eq!(tweener.animations().len(), 2);
        assert_eq!(tweener.animation("fadeIn").unwrap().op, TweenOp::Fade { target_alpha: 0.5 });
    }
}
