use crate::api::types::TargetId;
use crate::components::entity::{Entity, PropertyInstance};

/// Tweenable objects owned by the host, addressed by `TargetId`.
/// A flat Vec: UI scenes hold dozens of targets, not thousands.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(64),
        }
    }

    /// Insert `entity`, returning the one it replaced (same id), if any.
    pub fn spawn(&mut self, entity: Entity) -> Option<Entity> {
        match self.entities.iter_mut().find(|e| e.id == entity.id) {
            Some(slot) => Some(std::mem::replace(slot, entity)),
            None => {
                self.entities.push(entity);
                None
            }
        }
    }

    /// Take a target out of the scene. Runs writing to it abort on their next tick.
    pub fn despawn(&mut self, id: TargetId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.swap_remove(idx))
    }

    pub fn get(&self, id: TargetId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// First target carrying `tag`.
    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        self.iter().find(|e| e.tag == tag)
    }

    /// Pack every target into `out` for the host renderer.
    pub fn write_instances(&self, out: &mut Vec<PropertyInstance>) {
        out.clear();
        out.extend(self.entities.iter().map(PropertyInstance::from));
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
