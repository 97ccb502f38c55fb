use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::input::binding::ToggleBinding;
use crate::tween::descriptor::TweenAnimation;

/// Tween manifest: the ordered animation list for one tweener, plus any
/// UI bindings that drive it. Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TweenManifest {
    /// Animations in declaration order. Names should be unique.
    #[serde(default)]
    pub animations: Vec<TweenAnimation>,
    /// Optional toggle/enable bindings.
    #[serde(default)]
    pub bindings: Vec<ToggleBinding>,
}

impl TweenManifest {
    /// Parse a manifest from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let manifest: TweenManifest = serde_json::from_str(json)?;
        manifest.warn_duplicates();
        Ok(manifest)
    }

    /// Serialize back to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn warn_duplicates(&self) {
        for (i, anim) in self.animations.iter().enumerate() {
            if self.animations[..i].iter().any(|a| a.name == anim.name) {
                log::warn!("TweenManifest: duplicate animation name '{}'; the first one wins", anim.name);
            }
        }
    }
}
