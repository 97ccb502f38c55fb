//! UI glue: turns toggle and enable events into tween commands.
//!
//! A binding names either a single animation or a group. It does nothing
//! when its target is `None` or the relevant name is empty.

use serde::{Deserialize, Serialize};
use super::queue::TweenCommand;

/// What a binding drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BindingTarget {
    #[default]
    None,
    SingleAnimation,
    AnimationGroup,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToggleBinding {
    pub target: BindingTarget,
    pub animation: String,
    pub group: String,
}

impl ToggleBinding {
    pub fn animation(name: impl Into<String>) -> Self {
        Self {
            target: BindingTarget::SingleAnimation,
            animation: name.into(),
            group: String::new(),
        }
    }

    pub fn group(group: impl Into<String>) -> Self {
        Self {
            target: BindingTarget::AnimationGroup,
            animation: String::new(),
            group: group.into(),
        }
    }

    /// A toggle changed value: play forward when on, rewind when off.
    pub fn on_toggle(&self, is_on: bool) -> Option<TweenCommand> {
        match self.target {
            BindingTarget::None => None,
            BindingTarget::SingleAnimation if !self.animation.is_empty() => Some(TweenCommand::Toggle {
                name: self.animation.clone(),
                forward: is_on,
            }),
            BindingTarget::AnimationGroup if !self.group.is_empty() => Some(TweenCommand::ToggleGroup {
                group: self.group.clone(),
                forward: is_on,
            }),
            _ => None,
        }
    }

    /// The bound object became enabled: play forward.
    pub fn on_enable(&self) -> Option<TweenCommand> {
        match self.target {
            BindingTarget::None => None,
            BindingTarget::SingleAnimation if !self.animation.is_empty() => {
                Some(TweenCommand::Play(self.animation.clone()))
            }
            BindingTarget::AnimationGroup if !self.group.is_empty() => {
                Some(TweenCommand::PlayGroup(self.group.clone()))
            }
            _ => None,
        }
    }
}
