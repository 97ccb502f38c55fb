//! Error types for the tween engine.
//!
//! Playback requests are routinely speculative (a toggle may fire for a panel
//! that has no matching animation), so the controller never hands these back
//! to its caller: they are logged and the request becomes a no-op. Only
//! manifest parsing returns an error.

use thiserror::Error;
use crate::api::types::TargetId;

#[derive(Error, Debug)]
pub enum TweenError {
    /// No descriptor with this name.
    #[error("animation '{0}' not found")]
    NotFound(String),

    /// No descriptor in this group.
    #[error("animation group '{0}' not found")]
    GroupNotFound(String),

    /// Rewind requested before any play.
    #[error("cannot rewind '{0}': it has not been played")]
    NotYetPlayed(String),

    /// Group rewind requested before any group play.
    #[error("cannot rewind group '{0}': it has not been played")]
    GroupNotYetPlayed(String),

    /// Descriptor is flagged unrewindable.
    #[error("cannot rewind '{0}': animation is unrewindable")]
    Unrewindable(String),

    /// Rewind requested but no initial state was ever captured.
    #[error("cannot rewind '{0}': initial state was not captured")]
    NotCaptured(String),

    /// Descriptor is disabled.
    #[error("animation '{0}' is disabled")]
    Disabled(String),

    /// Target (or move-to goal) is absent or has no matching property.
    #[error("animation '{name}': target {target:?} is missing")]
    MissingTarget { name: String, target: Option<TargetId> },

    /// Malformed manifest JSON.
    #[error("invalid tween manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl TweenError {
    /// Log at the level this failure deserves.
    pub(crate) fn log(&self) {
        match self {
            TweenError::Disabled(_) => log::debug!("Tweener: {}", self),
            _ => log::warn!("Tweener: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, TweenError>;
