use tweener::{
    CommandQueue, Entity, PropertyInstance, Scene, TargetId,
    ToggleBinding, TweenCommand, TweenManifest, Tweener,
};

/// Wires one `Tweener` to a scene and a command queue.
///
/// The page keeps a `thread_local!` TweenerRunner and drives it through the
/// free `#[wasm_bindgen]` functions in `lib.rs`. JS pushes commands at any
/// time; they are applied at the start of the next tick, in arrival order.
pub struct TweenerRunner {
    scene: Scene,
    tweener: Tweener,
    commands: CommandQueue,
    bindings: Vec<ToggleBinding>,
    /// Flat property snapshot for SharedArrayBuffer reads.
    instances: Vec<PropertyInstance>,
}

impl TweenerRunner {
    /// Build a runner whose animations default to writing `owner`.
    /// The owner entity is spawned immediately.
    pub fn new(owner: TargetId, manifest: TweenManifest) -> Self {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(owner));
        let bindings = manifest.bindings.clone();
        Self {
            scene,
            tweener: Tweener::from_manifest(owner, manifest),
            commands: CommandQueue::new(),
            bindings,
            instances: Vec::with_capacity(16),
        }
    }

    pub fn tweener(&self) -> &Tweener {
        &self.tweener
    }

    pub fn tweener_mut(&mut self) -> &mut Tweener {
        &mut self.tweener
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Queue a command for the next tick.
    pub fn push_command(&mut self, command: TweenCommand) {
        self.commands.push(command);
    }

    /// A bound toggle changed value.
    pub fn binding_toggle(&mut self, index: usize, is_on: bool) {
        match self.bindings.get(index) {
            Some(binding) => {
                if let Some(command) = binding.on_toggle(is_on) {
                    self.commands.push(command);
                }
            }
            None => log::warn!("TweenerRunner: no binding at index {}", index),
        }
    }

    /// A bound object became enabled.
    pub fn binding_enable(&mut self, index: usize) {
        match self.bindings.get(index) {
            Some(binding) => {
                if let Some(command) = binding.on_enable() {
                    self.commands.push(command);
                }
            }
            None => log::warn!("TweenerRunner: no binding at index {}", index),
        }
    }

    /// Run one frame: apply queued commands, advance tweens, pack instances.
    pub fn tick(&mut self, dt: f32) {
        for command in self.commands.drain() {
            self.tweener.apply(&command, &mut self.scene);
        }

        self.tweener.advance(dt, &mut self.scene);

        self.scene.write_instances(&mut self.instances);
    }

    // ---- Pointer accessors for SharedArrayBuffer reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn instance_floats(&self) -> u32 {
        PropertyInstance::FLOATS as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
        "animations": [
            { "name": "fadeIn", "group": "panel", "op": { "kind": "Fade", "target_alpha": 1.0 } }
        ],
        "bindings": [
            { "target": "AnimationGroup", "group": "panel" }
        ]
    }"#;

    fn runner() -> TweenerRunner {
        let manifest = TweenManifest::from_json(MANIFEST).unwrap();
        let mut runner = TweenerRunner::new(TargetId(1), manifest);
        runner.scene_mut().get_mut(TargetId(1)).unwrap().opacity = Some(0.0);
        runner
    }

    #[test]
    fn commands_apply_on_next_tick() {
        let mut runner = runner();
        runner.push_command(TweenCommand::Play("fadeIn".into()));
        assert!(!runner.tweener().is_playing("fadeIn"));

        runner.tick(0.5);
        assert!(runner.tweener().is_playing("fadeIn"));
        assert_eq!(runner.instance_count(), 1);
    }

    #[test]
    fn binding_drives_group() {
        let mut runner = runner();
        runner.binding_enable(0);
        runner.tick(1.0);
        assert_eq!(runner.scene().get(TargetId(1)).unwrap().opacity, Some(1.0));

        runner.binding_toggle(0, false);
        runner.tick(0.5);
        let alpha = runner.scene().get(TargetId(1)).unwrap().opacity.unwrap();
        assert!((alpha - 0.5).abs() < 1e-5);

        // Out of range is logged, not fatal.
        runner.binding_toggle(7, true);
    }
}
