pub mod api;
pub mod core;
pub mod components;
pub mod tween;
pub mod input;
pub mod assets;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::types::{TargetId, Color};
pub use components::entity::{Entity, PropertyInstance};
pub use core::scene::Scene;
pub use core::time::Clock;
pub use input::queue::{TweenCommand, CommandQueue};
pub use input::binding::{BindingTarget, ToggleBinding};
pub use assets::manifest::TweenManifest;
pub use error::{TweenError, Result};

pub use tween::{
    Tweener, TweenAnimation, TweenOp, AxisMask,
    Easing, Curve, Keyframe, lerp, lerp_vec2, lerp_vec3,
    Direction, PlaybackState, Snapshot,
    TweenRunner, Track, RunnerStatus,
};
