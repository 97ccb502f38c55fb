use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use crate::api::types::TargetId;

/// Property bag for one tweenable host object.
/// The tween engine only reads and writes these fields; what they mean on
/// screen is up to the host renderer.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: TargetId,
    /// String tag for finding entities by name.
    pub tag: String,
    /// Position relative to the parent's anchor.
    pub anchored_pos: Vec2,
    /// Position in world space.
    pub pos: Vec3,
    /// Local scale.
    pub scale: Vec3,
    /// Local rotation as euler angles in degrees.
    pub rotation: Vec3,
    /// Opacity channel. `None` means the object has nothing to fade.
    pub opacity: Option<f32>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin, fully opaque.
    pub fn new(id: TargetId) -> Self {
        Self {
            id,
            tag: String::new(),
            anchored_pos: Vec2::ZERO,
            pos: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: Vec3::ZERO,
            opacity: Some(1.0),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_anchored_pos(mut self, pos: Vec2) -> Self {
        self.anchored_pos = pos;
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Remove the opacity channel (fade tweens will find no target).
    pub fn without_opacity(mut self) -> Self {
        self.opacity = None;
        self
    }
}

/// Flat, GPU/JS-friendly snapshot of an entity's tweenable properties.
/// 16 floats per entity. `alpha` is -1.0 when the entity has no opacity.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct PropertyInstance {
    pub id: f32,
    pub anchored: [f32; 2],
    pub pos: [f32; 3],
    pub scale: [f32; 3],
    pub rotation: [f32; 3],
    pub alpha: f32,
    pub _pad: [f32; 3],
}

impl PropertyInstance {
    pub const FLOATS: usize = 16;
}

impl From<&Entity> for PropertyInstance {
    fn from(e: &Entity) -> Self {
        Self {
            id: e.id.0 as f32,
            anchored: e.anchored_pos.to_array(),
            pos: e.pos.to_array(),
            scale: e.scale.to_array(),
            rotation: e.rotation.to_array(),
            alpha: e.opacity.unwrap_or(-1.0),
            _pad: [0.0; 3],
        }
    }
}
